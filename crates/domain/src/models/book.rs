//! Book catalog model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A book in the library catalog.
///
/// `cover_url` and `pdf_url` point at files served under the public file
/// route; the upload service produces them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: String,
    pub pdf_url: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_serializes_camel_case() {
        let book = Book {
            id: Uuid::new_v4(),
            title: "The Cat Wizard".to_string(),
            author: "A. Sorcerer".to_string(),
            description: None,
            cover_url: "/files/cat_wizard.jpg".to_string(),
            pdf_url: "/files/cat_wizard.pdf".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("coverUrl").is_some());
        assert!(json.get("pdfUrl").is_some());
        assert!(json.get("cover_url").is_none());
    }
}
