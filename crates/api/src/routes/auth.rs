//! Authentication routes for signup, login, and token refresh.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_user_registered;
use crate::services::auth::{AuthError, AuthService};

/// Request body for signup and login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// User's password (min 8 chars, 1 upper, 1 lower, 1 digit)
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Response body for successful signup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: String,
    pub email: String,
    pub role: String,
}

/// Response body for successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub role: String,
    pub expires_in: i64,
}

/// Response body for successful token refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

fn map_auth_error(e: AuthError) -> ApiError {
    match e {
        AuthError::EmailAlreadyExists => ApiError::Conflict("Email already registered".to_string()),
        AuthError::WeakPassword(msg) => ApiError::Validation(msg),
        AuthError::InvalidCredentials => {
            ApiError::Unauthorized("Invalid email or password".to_string())
        }
        AuthError::InvalidRefreshToken => {
            ApiError::Unauthorized("Invalid or expired refresh token".to_string())
        }
        AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
        AuthError::DatabaseError(db_err) => ApiError::from(db_err),
        AuthError::PasswordError(e) => ApiError::from(e),
        AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
    }
}

/// Register a new user with email and password.
///
/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), state.jwt.clone());

    let user = auth_service
        .register(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    record_user_registered();

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            id: user.id.to_string(),
            email: user.email,
            role: user.role.as_str().to_string(),
        }),
    ))
}

/// Login with email and password.
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), state.jwt.clone());

    let result = auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(LoginResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        role: result.user.role.as_str().to_string(),
        expires_in: result.expires_in,
    }))
}

/// Exchange a refresh token for a new access token.
///
/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), state.jwt.clone());

    let (access_token, expires_in) = auth_service
        .refresh(&request.refresh_token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_request_validation() {
        let request = CredentialsRequest {
            email: "reader@example.com".to_string(),
            password: "SecureP4ss".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_credentials_request_invalid_email() {
        let request = CredentialsRequest {
            email: "not-an-email".to_string(),
            password: "SecureP4ss".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_credentials_request_empty_password() {
        let request = CredentialsRequest {
            email: "reader@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_refresh_request_empty_token() {
        let request = RefreshRequest {
            refresh_token: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_map_auth_error_statuses() {
        use axum::response::IntoResponse;

        let conflict = map_auth_error(AuthError::EmailAlreadyExists).into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let unauthorized = map_auth_error(AuthError::InvalidCredentials).into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let bad_refresh = map_auth_error(AuthError::InvalidRefreshToken).into_response();
        assert_eq!(bad_refresh.status(), StatusCode::UNAUTHORIZED);

        let not_found = map_auth_error(AuthError::UserNotFound).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    }
}
