//! File upload storage service.
//!
//! Stores uploaded book files under a configured directory and maps them to
//! public URLs. An upload with the same name as an existing file replaces it.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use shared::validation::{validate_file_name, validate_pdf_extension};

use crate::config::UploadConfig;

/// Errors that can occur while storing or removing files.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid file name")]
    InvalidFileName,

    #[error("Only PDF files are supported")]
    NotAPdf,

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Service that persists uploads on the local filesystem.
#[derive(Debug, Clone)]
pub struct UploadService {
    dir: PathBuf,
    url_prefix: String,
}

impl UploadService {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            url_prefix: config.url_prefix.clone(),
        }
    }

    /// Saves an uploaded PDF and returns its public URL.
    ///
    /// The storage directory is created on first use. An existing file with
    /// the same name is overwritten.
    pub async fn save_pdf(&self, file_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        validate_file_name(file_name).map_err(|_| UploadError::InvalidFileName)?;
        validate_pdf_extension(file_name).map_err(|_| UploadError::NotAPdf)?;

        if bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "Stored uploaded file");
        Ok(self.public_url(file_name))
    }

    /// Resolves a validated file name to its path in the storage directory.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf, UploadError> {
        validate_file_name(file_name).map_err(|_| UploadError::InvalidFileName)?;
        Ok(self.dir.join(file_name))
    }

    /// Public URL under which a stored file is served.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}{}", self.url_prefix, file_name)
    }

    /// Deletes the stored file behind a public URL, if it points into the
    /// storage directory. Missing files are not an error.
    pub async fn delete_by_url(&self, url: &str) -> Result<(), UploadError> {
        let Some(file_name) = url.strip_prefix(&self.url_prefix) else {
            debug!(url = %url, "URL is not served from local storage, skipping delete");
            return Ok(());
        };

        if validate_file_name(file_name).is_err() {
            warn!(url = %url, "Refusing to delete file with unsafe name");
            return Err(UploadError::InvalidFileName);
        }

        let path = self.dir.join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Deleted stored file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadError::Io(e)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &Path) -> UploadService {
        UploadService::new(&UploadConfig {
            dir: dir.to_string_lossy().into_owned(),
            url_prefix: "/files/".to_string(),
            max_size_bytes: 50 * 1024 * 1024,
        })
    }

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ebl-upload-test-{}-{}", tag, std::process::id()))
    }

    #[tokio::test]
    async fn test_save_pdf_and_overwrite() {
        let dir = temp_dir("save");
        let svc = service(&dir);

        let url = svc.save_pdf("dune.pdf", b"first").await.unwrap();
        assert_eq!(url, "/files/dune.pdf");
        assert_eq!(tokio::fs::read(dir.join("dune.pdf")).await.unwrap(), b"first");

        svc.save_pdf("dune.pdf", b"second").await.unwrap();
        assert_eq!(tokio::fs::read(dir.join("dune.pdf")).await.unwrap(), b"second");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_empty_and_non_pdf() {
        let dir = temp_dir("reject");
        let svc = service(&dir);

        assert!(matches!(
            svc.save_pdf("dune.pdf", b"").await,
            Err(UploadError::EmptyFile)
        ));
        assert!(matches!(
            svc.save_pdf("dune.epub", b"data").await,
            Err(UploadError::NotAPdf)
        ));
        assert!(matches!(
            svc.save_pdf("../dune.pdf", b"data").await,
            Err(UploadError::InvalidFileName)
        ));
    }

    #[tokio::test]
    async fn test_delete_by_url() {
        let dir = temp_dir("delete");
        let svc = service(&dir);

        svc.save_pdf("gone.pdf", b"data").await.unwrap();
        svc.delete_by_url("/files/gone.pdf").await.unwrap();
        assert!(!dir.join("gone.pdf").exists());

        // Deleting again is fine
        svc.delete_by_url("/files/gone.pdf").await.unwrap();

        // External URLs are skipped
        svc.delete_by_url("https://cdn.example.com/cover.jpg")
            .await
            .unwrap();

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let svc = service(Path::new("uploads"));
        assert!(svc.resolve("..").is_err());
        assert!(svc.resolve("a/b.pdf").is_err());
        assert!(svc.resolve("book.pdf").is_ok());
    }
}
