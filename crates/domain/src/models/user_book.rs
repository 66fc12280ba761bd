//! Per-user reading status.

use serde::Serialize;
use uuid::Uuid;

/// Tracks whether a given user has marked a given book as read.
///
/// One row exists per (user, book) pair; rows are seeded as unread when a
/// user registers or a book is added.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBook {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub is_read: bool,
}
