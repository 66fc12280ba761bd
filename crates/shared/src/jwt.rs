//! JWT token utilities using HS256 signing.
//!
//! Tokens are signed with a symmetric secret configured as base64 (raw bytes
//! are accepted as a fallback). Access tokens are short-lived; refresh tokens
//! carry a longer expiry and are only accepted by the refresh endpoint.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email of the token holder
    pub email: String,
    /// Role of the token holder ("USER" or "ADMIN")
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID (unique token identifier)
    pub jti: String,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Type of JWT token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Default access token expiry: 15 minutes.
pub const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 900;

/// Default refresh token expiry: 2 hours.
pub const DEFAULT_REFRESH_EXPIRY_SECS: i64 = 7200;

/// Default leeway in seconds for clock skew tolerance.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Access token expiration in seconds
    pub access_token_expiry_secs: i64,
    /// Refresh token expiration in seconds
    pub refresh_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.refresh_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

impl JwtSigner {
    /// Creates a new signer from the configured secret.
    ///
    /// The secret is decoded from base64 when possible; otherwise its raw
    /// bytes are used directly. An empty secret is rejected.
    pub fn from_secret(
        secret: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret("secret must not be empty".into()));
        }

        let key_bytes = BASE64
            .decode(secret)
            .unwrap_or_else(|_| secret.as_bytes().to_vec());

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&key_bytes),
            decoding_key: DecodingKey::from_secret(&key_bytes),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            leeway_secs,
        })
    }

    /// Generates an access token for the given user.
    ///
    /// Returns the encoded token and its `jti`.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<(String, String), JwtError> {
        self.generate_token(
            user_id,
            email,
            role,
            TokenType::Access,
            self.access_token_expiry_secs,
        )
    }

    /// Generates a refresh token for the given user.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<(String, String), JwtError> {
        self.generate_token(
            user_id,
            email,
            role,
            TokenType::Refresh,
            self.refresh_token_expiry_secs,
        )
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
        token_type: TokenType,
        expiry_secs: i64,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            token_type,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validates an access token specifically.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validates a refresh token specifically.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }
}

/// Extracts the user ID from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    fn create_test_signer() -> JwtSigner {
        // Strict for testing - no leeway
        JwtSigner::from_secret("test_secret_key_for_jwt_testing_12345", 900, 7200, 0).unwrap()
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = JwtSigner::from_secret("", 900, 7200, 30);
        assert!(matches!(result, Err(JwtError::InvalidSecret(_))));
    }

    #[test]
    fn test_base64_secret_accepted() {
        // The original deployment configured the secret as base64
        let result = JwtSigner::from_secret("+pu/Q8KgBbnGUJ/MKA/meHBAAekvMt+Y+CzD+GHI/fw=", 900, 7200, 30);
        assert!(result.is_ok());
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let signer = create_test_signer();
        let user_id = Uuid::new_v4();

        let (token, jti) = signer
            .generate_access_token(user_id, "user@example.com", "USER")
            .unwrap();
        let claims = signer.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, "USER");
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_generate_and_validate_refresh_token() {
        let signer = create_test_signer();
        let user_id = Uuid::new_v4();

        let (token, _) = signer
            .generate_refresh_token(user_id, "user@example.com", "ADMIN")
            .unwrap();
        let claims = signer.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.role, "ADMIN");
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let signer = create_test_signer();
        let (token, _) = signer
            .generate_refresh_token(Uuid::new_v4(), "user@example.com", "USER")
            .unwrap();

        let result = signer.validate_access_token(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let signer = create_test_signer();
        let (token, _) = signer
            .generate_access_token(Uuid::new_v4(), "user@example.com", "USER")
            .unwrap();

        let result = signer.validate_refresh_token(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let mut signer = create_test_signer();
        signer.access_token_expiry_secs = 1;

        let (token, _) = signer
            .generate_access_token(Uuid::new_v4(), "user@example.com", "USER")
            .unwrap();

        sleep(StdDuration::from_secs(2));

        let result = signer.validate_access_token(&token);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = create_test_signer();
        let other = JwtSigner::from_secret("a_completely_different_secret", 900, 7200, 0).unwrap();

        let (token, _) = signer
            .generate_access_token(Uuid::new_v4(), "user@example.com", "USER")
            .unwrap();

        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_malformed_token() {
        let signer = create_test_signer();
        assert!(signer.validate_token("not_a_jwt").is_err());
        assert!(signer.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_extract_user_id() {
        let signer = create_test_signer();
        let user_id = Uuid::new_v4();

        let (token, _) = signer
            .generate_access_token(user_id, "user@example.com", "USER")
            .unwrap();
        let claims = signer.validate_access_token(&token).unwrap();

        assert_eq!(extract_user_id(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_unique_jti_per_token() {
        let signer = create_test_signer();
        let user_id = Uuid::new_v4();

        let (_, jti1) = signer
            .generate_access_token(user_id, "user@example.com", "USER")
            .unwrap();
        let (_, jti2) = signer
            .generate_access_token(user_id, "user@example.com", "USER")
            .unwrap();

        assert_ne!(jti1, jti2);
    }

    #[test]
    fn test_claims_timestamps() {
        let signer = create_test_signer();

        let before = Utc::now().timestamp();
        let (token, _) = signer
            .generate_access_token(Uuid::new_v4(), "user@example.com", "USER")
            .unwrap();
        let after = Utc::now().timestamp();

        let claims = signer.validate_access_token(&token).unwrap();

        assert!(claims.iat >= before && claims.iat <= after);
        assert_eq!(claims.exp - claims.iat, signer.access_token_expiry_secs);
    }

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenType::Access).unwrap(),
            "\"access\""
        );
        assert_eq!(
            serde_json::to_string(&TokenType::Refresh).unwrap(),
            "\"refresh\""
        );
    }
}
