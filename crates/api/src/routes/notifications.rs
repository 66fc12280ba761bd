//! Direct push notification route. Admin only.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::services::NotificationResult;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_notification_sent;

/// Request body for a direct device push.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    /// FCM device registration token
    #[validate(length(min = 1, message = "Device token is required"))]
    pub token: String,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 1024, message = "Body must be 1-1024 characters"))]
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub status: String,
}

/// Send a push notification to a single device.
///
/// POST /notifications/send
pub async fn send_notification(
    State(state): State<AppState>,
    Json(request): Json<SendNotificationRequest>,
) -> Result<Json<SendNotificationResponse>, ApiError> {
    request.validate()?;

    let notifier = state.notifier.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Push notifications are not configured".to_string())
    })?;

    match notifier
        .send_to_device(&request.token, &request.title, &request.body)
        .await
    {
        NotificationResult::Sent => {
            record_notification_sent("device");
            Ok(Json(SendNotificationResponse {
                status: "sent".to_string(),
            }))
        }
        NotificationResult::InvalidToken => Err(ApiError::Validation(
            "Device token is no longer valid".to_string(),
        )),
        NotificationResult::Failed(e) => {
            tracing::error!(error = %e, "Direct push failed");
            Err(ApiError::ServiceUnavailable(
                "Push service failed to deliver the notification".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SendNotificationRequest {
        SendNotificationRequest {
            token: "device-token-123".to_string(),
            title: "Maintenance".to_string(),
            body: "The library will be down tonight.".to_string(),
        }
    }

    #[test]
    fn test_send_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_send_request_empty_token() {
        let mut request = valid_request();
        request.token = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_send_request_empty_title() {
        let mut request = valid_request();
        request.title = String::new();
        assert!(request.validate().is_err());
    }
}
