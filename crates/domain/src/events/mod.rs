//! Domain events.
//!
//! Events decouple catalog changes from their notification side effects
//! (WebSocket broadcast, FCM topic push).

use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Emitted when a new book is added to the catalog.
#[derive(Debug, Clone)]
pub struct BookAdded {
    pub book: Book,
}

impl BookAdded {
    pub fn new(book: Book) -> Self {
        Self { book }
    }
}

/// Notification payload delivered to WebSocket clients for a new book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookNotification {
    pub title: String,
    pub author: String,
    pub message: String,
}

impl From<&BookAdded> for BookNotification {
    fn from(event: &BookAdded) -> Self {
        Self {
            title: event.book.title.clone(),
            author: event.book.author.clone(),
            message: "A new book has been added!".to_string(),
        }
    }
}

/// Push notification title for a new book.
pub fn push_title(event: &BookAdded) -> String {
    format!("New Book: {}", event.book.title)
}

/// Push notification body for a new book.
pub fn push_body(event: &BookAdded) -> String {
    format!("By {} - now in the library!", event.book.author)
}
