//! Authentication service for user registration, login, and token refresh.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use domain::models::{Role, User};
use persistence::repositories::{UserBookRepository, UserRepository};
use shared::jwt::{extract_user_id, JwtError, JwtSigner};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::validate_password_strength;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    user_books: UserBookRepository,
    jwt: JwtSigner,
}

impl AuthService {
    /// Creates a new AuthService over the given pool and token signer.
    pub fn new(pool: PgPool, jwt: JwtSigner) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            user_books: UserBookRepository::new(pool),
            jwt,
        }
    }

    /// Register a new user with email and password.
    ///
    /// Seeds an unread row for every existing book so the new user's
    /// unread list starts complete.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_password_strength(password).map_err(|e| {
            let message = e
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string());
            AuthError::WeakPassword(message)
        })?;

        let password_hash = hash_password(password)?;
        let email = email.to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let created = self
            .users
            .create_user(&email, &password_hash, Role::User.as_str())
            .await;

        // Unique violation means a concurrent registration won the race
        if let Err(sqlx::Error::Database(db_err)) = &created {
            if db_err.code().as_deref() == Some("23505") {
                return Err(AuthError::EmailAlreadyExists);
            }
        }
        let user: User = created?.into();

        self.user_books.seed_for_user(user.id).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Returns the same error for unknown email and wrong password so the
    /// endpoint does not leak which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let entity = self
            .users
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let user: User = entity.into();

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, _) =
            self.jwt
                .generate_access_token(user.id, &user.email, user.role.as_str())?;
        let (refresh_token, _) =
            self.jwt
                .generate_refresh_token(user.id, &user.email, user.role.as_str())?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResult {
            expires_in: self.jwt.access_token_expiry_secs,
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a valid refresh token for a fresh access token.
    ///
    /// The user is re-read from the database so a deleted account or a
    /// changed role invalidates outstanding refresh tokens.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(String, i64), AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user_id: Uuid =
            extract_user_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;

        let entity = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let user: User = entity.into();

        let (access_token, _) =
            self.jwt
                .generate_access_token(user.id, &user.email, user.role.as_str())?;

        Ok((access_token, self.jwt.access_token_expiry_secs))
    }
}
