//! Book entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the books table.
#[derive(Debug, Clone, FromRow)]
pub struct BookEntity {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: String,
    pub pdf_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookEntity> for domain::models::Book {
    fn from(entity: BookEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            author: entity.author,
            description: entity.description,
            cover_url: entity.cover_url,
            pdf_url: entity.pdf_url,
            created_at: entity.created_at,
        }
    }
}
