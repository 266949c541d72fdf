//! Blob storage for uploaded document bytes.
//!
//! Files live in named buckets and are addressed by a relative key such as
//! `U1/2024/W2s/1700000000000_w2_2024.pdf`. The record store only keeps the
//! key; nothing ties a blob's lifetime to its record.

mod local;

pub use local::LocalBlobStore;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named blob containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Shared tax information forms.
    #[serde(rename = "tax-forms")]
    TaxForms,
    /// Per-client uploads, drafts and finals.
    #[serde(rename = "user-documents")]
    UserDocuments,
}

impl Bucket {
    pub const ALL: [Bucket; 2] = [Self::TaxForms, Self::UserDocuments];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaxForms => "tax-forms",
            Self::UserDocuments => "user-documents",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blob storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {bucket}/{path}")]
    NotFound { bucket: Bucket, path: String },

    #[error("File already exists: {bucket}/{path}")]
    AlreadyExists { bucket: Bucket, path: String },

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A bucketed byte store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` at `path`. Never overwrites an existing blob.
    async fn put(&self, bucket: Bucket, path: &str, data: Bytes) -> StorageResult<()>;

    /// Fetch the bytes stored at `path`.
    async fn get(&self, bucket: Bucket, path: &str) -> StorageResult<Bytes>;

    /// Remove the blob at `path`. Removing a missing blob succeeds.
    async fn remove(&self, bucket: Bucket, path: &str) -> StorageResult<()>;

    async fn exists(&self, bucket: Bucket, path: &str) -> StorageResult<bool>;

    /// Every key in `bucket`, sorted.
    async fn list(&self, bucket: Bucket) -> StorageResult<Vec<String>>;

    /// Backend name for logs and diagnostics.
    fn storage_type(&self) -> &'static str;
}

/// Reject keys that are empty, absolute or contain `.`/`..` segments.
pub fn validate_key(path: &str) -> StorageResult<()> {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') || path.contains('\0') {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    if path
        .split('/')
        .any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("U1/2024/W2s/1_w2.pdf").is_ok());
        assert!(validate_key("tax-forms/2025/1_f.pdf").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("U1/../secret").is_err());
        assert!(validate_key("U1//x").is_err());
        assert!(validate_key("a\\b").is_err());
    }

    #[test]
    fn test_bucket_names() {
        assert_eq!(Bucket::TaxForms.to_string(), "tax-forms");
        assert_eq!(Bucket::UserDocuments.as_str(), "user-documents");
    }
}
