//! JWT authentication middleware.
//!
//! Validates Bearer access tokens and enforces the admin role where required.
//! Authenticated user information is stored in request extensions for use by
//! downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use domain::models::Role;
use shared::jwt::JwtSigner;

use crate::app::AppState;

/// Authenticated user information extracted from a JWT access token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// Email from the token claims.
    pub email: String,
    /// Role from the token claims.
    pub role: Role,
    /// JWT ID (jti) for log correlation.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and returns user authentication info.
    ///
    /// Refresh tokens are rejected here; they are only accepted by the
    /// refresh endpoint.
    pub fn validate(signer: &JwtSigner, token: &str) -> Result<Self, String> {
        let claims = signer
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| "Invalid role in token".to_string())?;

        Ok(UserAuth {
            user_id,
            email: claims.email,
            role,
            jti: claims.jti,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Middleware that requires a valid JWT access token.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth = match authenticate(&state, &req) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    req.extensions_mut().insert(auth);
    next.run(req).await
}

/// Middleware that requires a valid access token with the ADMIN role.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth = match authenticate(&state, &req) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    if !auth.is_admin() {
        return forbidden_response("Admin access required");
    }

    req.extensions_mut().insert(auth);
    next.run(req).await
}

fn authenticate(state: &AppState, req: &Request<Body>) -> Result<UserAuth, Response> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => {
            return Err(unauthorized_response(
                "Missing or invalid Authorization header",
            ))
        }
    };

    UserAuth::validate(&state.jwt, token).map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        unauthorized_response("Invalid or expired token")
    })
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer() -> JwtSigner {
        JwtSigner::from_secret("test_secret_key_for_jwt_testing_12345", 900, 7200, 0).unwrap()
    }

    #[test]
    fn test_validate_access_token() {
        let signer = test_signer();
        let user_id = Uuid::new_v4();
        let (token, _) = signer
            .generate_access_token(user_id, "reader@example.com", "USER")
            .unwrap();

        let auth = UserAuth::validate(&signer, &token).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.email, "reader@example.com");
        assert_eq!(auth.role, Role::User);
        assert!(!auth.is_admin());
    }

    #[test]
    fn test_validate_admin_token() {
        let signer = test_signer();
        let (token, _) = signer
            .generate_access_token(Uuid::new_v4(), "admin@example.com", "ADMIN")
            .unwrap();

        let auth = UserAuth::validate(&signer, &token).unwrap();
        assert_eq!(auth.role, Role::Admin);
        assert!(auth.is_admin());
    }

    #[test]
    fn test_refresh_token_rejected() {
        let signer = test_signer();
        let (token, _) = signer
            .generate_refresh_token(Uuid::new_v4(), "reader@example.com", "USER")
            .unwrap();

        assert!(UserAuth::validate(&signer, &token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let signer = test_signer();
        assert!(UserAuth::validate(&signer, "not-a-jwt").is_err());
    }

    #[test]
    fn test_unauthorized_response_status() {
        let response = unauthorized_response("Missing or invalid Authorization header");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_response_status() {
        let response = forbidden_response("Admin access required");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
