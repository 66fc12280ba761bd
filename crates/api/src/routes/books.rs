//! Book catalog routes.
//!
//! Browsing is public. Read-status tracking requires authentication.
//! Adding and deleting books requires the admin role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::events::BookAdded;
use domain::models::Book;
use persistence::repositories::{BookRepository, UserBookRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_book_added;
use crate::middleware::UserAuth;
use crate::services::upload::UploadService;

/// Request body for adding a book.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: String,

    pub description: Option<String>,

    #[validate(length(min = 1, message = "Cover URL is required"))]
    pub cover_url: String,

    #[validate(length(min = 1, message = "PDF URL is required"))]
    pub pdf_url: String,
}

/// List all books in the catalog.
///
/// GET /books
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = BookRepository::new(state.pool.clone())
        .list_all()
        .await?
        .into_iter()
        .map(Book::from)
        .collect();

    Ok(Json(books))
}

/// Fetch a single book by ID.
///
/// GET /books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Book>, ApiError> {
    let book = BookRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    Ok(Json(Book::from(book)))
}

/// List the current user's read books.
///
/// GET /books/read
pub async fn list_read(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<Vec<Book>>, ApiError> {
    list_by_status(state, auth, true).await
}

/// List the current user's unread books.
///
/// GET /books/unread
pub async fn list_unread(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<Vec<Book>>, ApiError> {
    list_by_status(state, auth, false).await
}

async fn list_by_status(
    state: AppState,
    auth: UserAuth,
    is_read: bool,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = UserBookRepository::new(state.pool.clone())
        .list_books_by_status(auth.user_id, is_read)
        .await?
        .into_iter()
        .map(Book::from)
        .collect();

    Ok(Json(books))
}

/// Mark a book as read for the current user.
///
/// PUT /books/{id}/mark-read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth): Extension<UserAuth>,
) -> Result<StatusCode, ApiError> {
    set_read_status(state, auth, id, true).await
}

/// Mark a book as unread for the current user.
///
/// PUT /books/{id}/mark-unread
pub async fn mark_unread(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth): Extension<UserAuth>,
) -> Result<StatusCode, ApiError> {
    set_read_status(state, auth, id, false).await
}

async fn set_read_status(
    state: AppState,
    auth: UserAuth,
    book_id: Uuid,
    is_read: bool,
) -> Result<StatusCode, ApiError> {
    // Upserting against a deleted book must 404, not silently insert
    BookRepository::new(state.pool.clone())
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    UserBookRepository::new(state.pool.clone())
        .set_read_status(auth.user_id, book_id, is_read)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add a new book to the catalog. Admin only.
///
/// Seeds an unread row for every existing user and publishes the new-book
/// event for the WebSocket and FCM fan-out.
///
/// POST /books
pub async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    request.validate()?;

    let entity = BookRepository::new(state.pool.clone())
        .create_book(
            &request.title,
            &request.author,
            request.description.as_deref(),
            &request.cover_url,
            &request.pdf_url,
        )
        .await?;
    let book = Book::from(entity);

    UserBookRepository::new(state.pool.clone())
        .seed_for_book(book.id)
        .await?;

    record_book_added();
    tracing::info!(book_id = %book.id, title = %book.title, "Book added to catalog");

    state.events.publish(BookAdded::new(book.clone()));

    Ok((StatusCode::CREATED, Json(book)))
}

/// Delete a book from the catalog. Admin only.
///
/// Removes the stored cover and PDF files before the row; the row delete
/// cascades to per-user read-status entries.
///
/// DELETE /books/{id}
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = BookRepository::new(state.pool.clone());

    let book = repo
        .find_by_id(id)
        .await?
        .map(Book::from)
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    let uploads = UploadService::new(&state.config.upload);
    for url in [&book.cover_url, &book.pdf_url] {
        if let Err(e) = uploads.delete_by_url(url).await {
            tracing::warn!(book_id = %id, url = %url, error = %e, "Failed to delete stored file");
        }
    }

    repo.delete_book(id).await?;
    tracing::info!(book_id = %id, title = %book.title, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateBookRequest {
        CreateBookRequest {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: Some("Sand.".to_string()),
            cover_url: "/files/dune.jpg".to_string(),
            pdf_url: "/files/dune.pdf".to_string(),
        }
    }

    #[test]
    fn test_create_book_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_book_request_empty_title() {
        let mut request = valid_request();
        request.title = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_book_request_empty_author() {
        let mut request = valid_request();
        request.author = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_book_request_missing_description_ok() {
        let mut request = valid_request();
        request.description = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_book_request_empty_urls() {
        let mut request = valid_request();
        request.pdf_url = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.cover_url = String::new();
        assert!(request.validate().is_err());
    }
}
