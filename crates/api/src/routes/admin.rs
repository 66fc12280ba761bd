//! Admin routes.

use axum::{Extension, Json};
use serde::Serialize;

use crate::middleware::UserAuth;

/// Response body for the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub message: String,
    pub email: String,
}

/// Admin dashboard greeting.
///
/// GET /admin/dashboard
pub async fn dashboard(Extension(auth): Extension<UserAuth>) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        message: "Welcome to the admin dashboard".to_string(),
        email: auth.email,
    })
}
