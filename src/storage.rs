//! Persistence of uploaded documents.
//!
//! Uploads are validated against the configured extension allow-list and then
//! written under the upload directory with a content-addressed name, so
//! re-uploading identical bytes is idempotent and nothing ever collides. The
//! receipt carries the public URL and timestamp reported back to clients.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;

use crate::config::get_config;

/// Errors raised while validating and persisting an upload.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Client filename carried no extension.
    #[error("Uploaded filename has no extension")]
    MissingExtension,
    /// Extension is not on the configured allow-list.
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    /// Upload contained no bytes.
    #[error("Uploaded file is empty")]
    EmptyFile,
    /// Filesystem interaction failed.
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Receipt for a persisted upload.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Filesystem path of the stored file.
    pub path: PathBuf,
    /// Stored file name: content digest plus the original extension.
    pub file_name: String,
    /// Lowercased extension the upload arrived with.
    pub extension: String,
    /// Public URL under which the stored file is reported.
    pub url: String,
    /// RFC3339 timestamp recorded when the upload was stored.
    pub uploaded_at: String,
}

/// Validate and persist an upload using the configured storage settings.
pub async fn save_upload(original_name: &str, bytes: &[u8]) -> Result<StoredUpload, StorageError> {
    let config = get_config();
    store(
        &config.upload_dir,
        &config.public_upload_base,
        &config.allowed_extensions,
        original_name,
        bytes,
    )
    .await
}

/// Persist `bytes` under `upload_dir` after validating name and content.
///
/// The stored name is the first 16 hex characters of the content SHA-256
/// digest plus the original extension; identical bytes always land on the
/// same file. Validation happens before anything touches the filesystem.
async fn store(
    upload_dir: &Path,
    public_base: &str,
    allowed_extensions: &[String],
    original_name: &str,
    bytes: &[u8],
) -> Result<StoredUpload, StorageError> {
    if bytes.is_empty() {
        return Err(StorageError::EmptyFile);
    }
    let extension = file_extension(original_name)?;
    if !allowed_extensions.iter().any(|ext| ext == &extension) {
        return Err(StorageError::UnsupportedExtension(extension));
    }

    let file_name = format!("{}.{extension}", content_digest(bytes));
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = upload_dir.join(&file_name);
    tokio::fs::write(&path, bytes).await?;
    tracing::debug!(file = %file_name, size = bytes.len(), "Stored upload");

    let url = format!("{}/{file_name}", public_base.trim_end_matches('/'));
    Ok(StoredUpload {
        path,
        file_name,
        extension,
        url,
        uploaded_at: current_timestamp_rfc3339(),
    })
}

fn file_extension(name: &str) -> Result<String, StorageError> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or(StorageError::MissingExtension)
}

/// First 16 hex characters of the SHA-256 digest of `bytes`.
fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

/// Current timestamp formatted for upload receipts.
fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
