//! Admin bootstrap service for initial setup.
//!
//! Creates the default admin account on startup if configured. Idempotent:
//! when the account already exists nothing happens.

use sqlx::PgPool;
use tracing::{info, warn};

use domain::models::Role;
use persistence::repositories::{UserBookRepository, UserRepository};
use shared::password::{hash_password, PasswordError};

use crate::config::AdminBootstrapConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// Bootstrap the default admin account if configured.
///
/// Called after migrations on startup.
pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &AdminBootstrapConfig,
) -> Result<(), BootstrapError> {
    if config.email.is_empty() {
        warn!("EBL__ADMIN__EMAIL not set - skipping default admin bootstrap");
        return Ok(());
    }

    if config.password.is_empty() {
        warn!("EBL__ADMIN__EMAIL is set but EBL__ADMIN__PASSWORD is empty - skipping bootstrap");
        return Ok(());
    }

    let users = UserRepository::new(pool.clone());
    let email = config.email.to_lowercase();

    if users.find_by_email(&email).await?.is_some() {
        info!(email = %email, "Default admin already exists - skipping bootstrap");
        return Ok(());
    }

    let password_hash = hash_password(&config.password)?;

    let admin = users
        .create_user(&email, &password_hash, Role::Admin.as_str())
        .await?;

    // Admins track read status too
    UserBookRepository::new(pool.clone())
        .seed_for_user(admin.id)
        .await?;

    info!(
        email = %email,
        user_id = %admin.id,
        "Default admin account created"
    );

    warn!(
        "SECURITY: Change the default admin password and remove EBL__ADMIN__PASSWORD \
         from configuration after initial setup."
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_error_display() {
        let err = BootstrapError::Database(sqlx::Error::RowNotFound);
        assert!(err.to_string().contains("Database error"));
    }
}
