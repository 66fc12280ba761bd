//! WebSocket endpoint for live new-book announcements.
//!
//! Every connected client receives a JSON payload for each book added to
//! the catalog. The socket is write-only from the server's perspective;
//! client messages are drained only to observe disconnects.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use domain::events::BookNotification;

use crate::app::AppState;

/// Upgrade to a WebSocket subscribed to book events.
///
/// GET /ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut events = state.events.subscribe();
    debug!("WebSocket client connected");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let notification = BookNotification::from(&event);
                        let payload = match serde_json::to_string(&notification) {
                            Ok(payload) => payload,
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to serialize notification");
                                continue;
                            }
                        };

                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped = skipped, "WebSocket client lagged behind events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    // Drain client frames; close or error ends the session
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("WebSocket client disconnected");
}
