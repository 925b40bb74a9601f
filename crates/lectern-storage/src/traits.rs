use crate::location::{LocationError, StorageLocation};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use lectern_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Failed to read content: {0}")]
    ContentRead(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Provider failures surface as `StorageUnavailable` so callers can decide whether to retry;
/// address problems are the caller's fault and surface as `InvalidInput`.
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Location(e) => AppError::InvalidInput(e.to_string()),
            StorageError::ContentRead(msg) => AppError::ContentReadFailure(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other @ (StorageError::UploadFailed(_)
            | StorageError::DeleteFailed(_)
            | StorageError::PresignFailed(_)
            | StorageError::LookupFailed(_)
            | StorageError::Timeout(_)
            | StorageError::IoError(_)) => AppError::StorageUnavailable(other.to_string()),
        }
    }
}

/// Blob store abstraction
///
/// Implementations address objects by (container, key). Deleting a missing object is
/// not an error.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` at `location`, replacing anything already there.
    async fn put(
        &self,
        location: &StorageLocation,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Remove the object at `location`. Succeeds when the object is already absent.
    async fn delete(&self, location: &StorageLocation) -> StorageResult<()>;

    /// Produce a signed GET URL valid for `expires_in`.
    async fn presign(
        &self,
        location: &StorageLocation,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Check whether an object exists.
    async fn exists(&self, location: &StorageLocation) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
