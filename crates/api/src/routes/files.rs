//! Public file serving.
//!
//! Streams stored book files back to clients. Content type is guessed from
//! the file name with `application/pdf` as the fallback, matching what the
//! library mostly stores.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use tokio_util::io::ReaderStream;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::upload::{UploadError, UploadService};

/// Serve a stored file.
///
/// GET /files/{filename}
pub async fn serve_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let uploads = UploadService::new(&state.config.upload);

    let path = uploads.resolve(&filename).map_err(|e| match e {
        UploadError::InvalidFileName => ApiError::Validation("Invalid file name".to_string()),
        other => ApiError::Internal(other.to_string()),
    })?;

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("File not found".to_string()));
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to open stored file");
            return Err(ApiError::Internal("Failed to read file".to_string()));
        }
    };

    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/pdf");

    let metadata = file.metadata().await.ok();
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&filename),
        );

    if let Some(meta) = metadata {
        builder = builder.header(header::CONTENT_LENGTH, meta.len());
    }

    builder
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// Inline disposition so browsers render PDFs and images directly.
fn content_disposition(filename: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("inline; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("inline"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_inline() {
        let value = content_disposition("dune.pdf");
        assert_eq!(value.to_str().unwrap(), "inline; filename=\"dune.pdf\"");
    }

    #[test]
    fn test_content_disposition_falls_back_on_bad_chars() {
        let value = content_disposition("bad\nname.pdf");
        assert_eq!(value.to_str().unwrap(), "inline");
    }

    #[test]
    fn test_pdf_fallback_content_type() {
        let guessed = mime_guess::from_path("unknown.blob").first_raw();
        assert!(guessed.is_none());

        let guessed = mime_guess::from_path("cover.jpg").first_raw().unwrap();
        assert_eq!(guessed, "image/jpeg");
    }
}
