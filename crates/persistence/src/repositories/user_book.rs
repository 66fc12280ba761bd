//! User-book repository for per-user read tracking.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BookEntity;
use crate::metrics::QueryTimer;

/// Repository for user_books database operations.
#[derive(Clone)]
pub struct UserBookRepository {
    pool: PgPool,
}

impl UserBookRepository {
    /// Creates a new UserBookRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Seed unread rows for a freshly registered user covering every
    /// existing book.
    pub async fn seed_for_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("seed_user_books_for_user");
        sqlx::query(
            r#"
            INSERT INTO user_books (user_id, book_id, is_read)
            SELECT $1, id, FALSE FROM books
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Seed unread rows for a freshly added book covering every existing
    /// user.
    pub async fn seed_for_book(&self, book_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("seed_user_books_for_book");
        sqlx::query(
            r#"
            INSERT INTO user_books (user_id, book_id, is_read)
            SELECT id, $1, FALSE FROM users
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(book_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Set the read status of a book for a user, inserting the row if the
    /// pair was never seeded.
    pub async fn set_read_status(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        is_read: bool,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_read_status");
        sqlx::query(
            r#"
            INSERT INTO user_books (user_id, book_id, is_read)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, book_id) DO UPDATE SET is_read = EXCLUDED.is_read
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(is_read)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// List the books a user has marked with the given read status.
    pub async fn list_books_by_status(
        &self,
        user_id: Uuid,
        is_read: bool,
    ) -> Result<Vec<BookEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_books_by_read_status");
        let result = sqlx::query_as::<_, BookEntity>(
            r#"
            SELECT b.id, b.title, b.author, b.description, b.cover_url, b.pdf_url, b.created_at
            FROM books b
            INNER JOIN user_books ub ON ub.book_id = b.id
            WHERE ub.user_id = $1 AND ub.is_read = $2
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(is_read)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
