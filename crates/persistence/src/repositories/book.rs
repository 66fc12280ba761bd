//! Book repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BookEntity;
use crate::metrics::QueryTimer;

/// Repository for catalog database operations.
#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Creates a new BookRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all books in the catalog, newest first.
    pub async fn list_all(&self) -> Result<Vec<BookEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_books");
        let result = sqlx::query_as::<_, BookEntity>(
            r#"
            SELECT id, title, author, description, cover_url, pdf_url, created_at
            FROM books
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a book by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BookEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_book_by_id");
        let result = sqlx::query_as::<_, BookEntity>(
            r#"
            SELECT id, title, author, description, cover_url, pdf_url, created_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new book into the catalog.
    pub async fn create_book(
        &self,
        title: &str,
        author: &str,
        description: Option<&str>,
        cover_url: &str,
        pdf_url: &str,
    ) -> Result<BookEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_book");
        let result = sqlx::query_as::<_, BookEntity>(
            r#"
            INSERT INTO books (title, author, description, cover_url, pdf_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author, description, cover_url, pdf_url, created_at
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(description)
        .bind(cover_url)
        .bind(pdf_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a book. Associated user_books rows cascade.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete_book(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_book");
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }
}
