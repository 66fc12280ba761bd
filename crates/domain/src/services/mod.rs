//! Domain services.

pub mod notification;

pub use notification::{
    MockNotificationService, NotificationResult, NotificationService, SentNotification,
    NEW_BOOKS_TOPIC,
};
