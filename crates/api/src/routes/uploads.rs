//! Admin PDF upload route.

use axum::{extract::Multipart, extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::upload::{UploadError, UploadService};

/// Response body for a stored upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public URL the stored file is served from.
    pub url: String,
    pub file_name: String,
}

/// Upload a book PDF. Admin only.
///
/// Expects `multipart/form-data` with a single `file` part. The stored file
/// is served under the configured public URL prefix; an existing file with
/// the same name is replaced.
///
/// POST /upload/pdf
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let uploads = UploadService::new(&state.config.upload);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| ApiError::Validation("Missing file name".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;

        let url = uploads
            .save_pdf(&file_name, &bytes)
            .await
            .map_err(map_upload_error)?;

        tracing::info!(file_name = %file_name, size = bytes.len(), "PDF uploaded");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse { url, file_name }),
        ));
    }

    Err(ApiError::Validation(
        "Missing 'file' field in multipart body".to_string(),
    ))
}

fn map_upload_error(e: UploadError) -> ApiError {
    match e {
        UploadError::InvalidFileName => ApiError::Validation("Invalid file name".to_string()),
        UploadError::NotAPdf => ApiError::Validation("Only PDF files are supported".to_string()),
        UploadError::EmptyFile => ApiError::Validation("Uploaded file is empty".to_string()),
        UploadError::Io(e) => ApiError::Internal(format!("Storage error: {}", e)),
    }
}
