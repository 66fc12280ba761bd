//! User-book entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the user_books table.
#[derive(Debug, Clone, FromRow)]
pub struct UserBookEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub is_read: bool,
}

impl From<UserBookEntity> for domain::models::UserBook {
    fn from(entity: UserBookEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            book_id: entity.book_id,
            is_read: entity.is_read,
        }
    }
}
