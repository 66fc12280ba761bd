//! Push notification service abstraction.
//!
//! The API crate provides an FCM-backed implementation; tests use the mock.

/// FCM topic that clients subscribe to for new-book announcements.
pub const NEW_BOOKS_TOPIC: &str = "new_books";

/// Result of a notification send attempt.
///
/// Notification delivery is best-effort: failures are reported but must not
/// fail the operation that triggered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Notification was accepted by the push service.
    Sent,
    /// The target device token is no longer valid.
    InvalidToken,
    /// Sending failed for another reason.
    Failed(String),
}

/// Service trait for sending push notifications.
#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    /// Send a notification to a single device by its registration token.
    async fn send_to_device(&self, token: &str, title: &str, body: &str) -> NotificationResult;

    /// Broadcast a notification to all devices subscribed to a topic.
    async fn send_to_topic(&self, topic: &str, title: &str, body: &str) -> NotificationResult;
}

/// Mock notification service that records calls, for unit tests.
#[derive(Debug, Default)]
pub struct MockNotificationService {
    sent: std::sync::Mutex<Vec<SentNotification>>,
}

/// A notification recorded by [`MockNotificationService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// Device token or topic name.
    pub target: String,
    pub title: String,
    pub body: String,
    pub is_topic: bool,
}

impl MockNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all notifications recorded so far.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NotificationService for MockNotificationService {
    async fn send_to_device(&self, token: &str, title: &str, body: &str) -> NotificationResult {
        self.sent.lock().unwrap().push(SentNotification {
            target: token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            is_topic: false,
        });
        NotificationResult::Sent
    }

    async fn send_to_topic(&self, topic: &str, title: &str, body: &str) -> NotificationResult {
        self.sent.lock().unwrap().push(SentNotification {
            target: topic.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            is_topic: true,
        });
        NotificationResult::Sent
    }
}
