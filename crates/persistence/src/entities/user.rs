//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            // The role column carries a CHECK constraint, so parse failures
            // indicate an out-of-band schema change; fall back to User.
            role: domain::models::Role::from_str(&entity.role)
                .unwrap_or(domain::models::Role::User),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_domain_role_parsing() {
        let entity = UserEntity {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$x".to_string(),
            role: "ADMIN".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let user: domain::models::User = entity.into();
        assert!(user.is_admin());
    }
}
