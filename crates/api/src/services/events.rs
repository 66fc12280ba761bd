//! In-process event bus for new-book announcements.
//!
//! Adding a book publishes a [`BookAdded`] event. Two sinks consume it:
//! the WebSocket route forwards a JSON payload to every connected client,
//! and a background task pushes an FCM notification to the `new_books`
//! topic. Delivery is best-effort; a failed sink never fails the insert.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use domain::events::{push_body, push_title, BookAdded};
use domain::services::{NotificationResult, NotificationService, NEW_BOOKS_TOPIC};

use crate::middleware::metrics::record_notification_sent;

const DEFAULT_BUS_CAPACITY: usize = 64;

/// Broadcast bus carrying catalog events.
#[derive(Clone)]
pub struct BookEventBus {
    tx: broadcast::Sender<BookAdded>,
}

impl Default for BookEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl BookEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers that received it. Zero subscribers
    /// is not an error.
    pub fn publish(&self, event: BookAdded) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("Book event published with no active subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookAdded> {
        self.tx.subscribe()
    }
}

/// Spawns the background task that forwards book events to the FCM topic.
pub fn spawn_topic_forwarder(bus: &BookEventBus, notifier: Arc<dyn NotificationService>) {
    let mut rx = bus.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let title = push_title(&event);
                    let body = push_body(&event);

                    match notifier.send_to_topic(NEW_BOOKS_TOPIC, &title, &body).await {
                        NotificationResult::Sent => {
                            record_notification_sent("topic");
                            debug!(book_id = %event.book.id, "New-book push sent to topic");
                        }
                        NotificationResult::InvalidToken => {
                            warn!(book_id = %event.book.id, "Topic push rejected as invalid target");
                        }
                        NotificationResult::Failed(e) => {
                            warn!(book_id = %event.book.id, error = %e, "New-book push failed");
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "Topic forwarder lagged behind book events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::Book;
    use domain::services::MockNotificationService;
    use uuid::Uuid;

    fn sample_book() -> Book {
        Book {
            id: Uuid::new_v4(),
            title: "Neuromancer".to_string(),
            author: "William Gibson".to_string(),
            description: None,
            cover_url: "/files/neuromancer.jpg".to_string(),
            pdf_url: "/files/neuromancer.pdf".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = BookEventBus::new(8);
        let mut rx = bus.subscribe();

        let receivers = bus.publish(BookAdded::new(sample_book()));
        assert_eq!(receivers, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.book.title, "Neuromancer");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = BookEventBus::new(8);
        assert_eq!(bus.publish(BookAdded::new(sample_book())), 0);
    }

    #[tokio::test]
    async fn test_forwarder_pushes_to_topic() {
        let bus = BookEventBus::new(8);
        let mock = Arc::new(MockNotificationService::new());
        spawn_topic_forwarder(&bus, mock.clone());

        // Give the forwarder task a chance to subscribe before publishing
        tokio::task::yield_now().await;
        bus.publish(BookAdded::new(sample_book()));

        // Poll until the forwarder has processed the event
        for _ in 0..50 {
            if !mock.sent().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].is_topic);
        assert_eq!(sent[0].target, "new_books");
        assert_eq!(sent[0].title, "New Book: Neuromancer");
        assert_eq!(sent[0].body, "By William Gibson - now in the library!");
    }
}
