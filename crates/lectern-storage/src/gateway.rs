//! Blob gateway: document uploads and deletes keyed by lesson identity.

use crate::keys::document_key;
use crate::location::{resolve, LocationError, StorageLocation};
use crate::traits::{BlobStore, StorageError, StorageResult};
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Message surfaced when an uploaded file cannot be read from the request.
pub const CONTENT_READ_FAILURE: &str = "Failed to read PDF file";

/// Settings shared by the gateway and the link issuer.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Container used for new uploads and for bare-key addresses.
    pub default_container: Option<String>,
    /// Upper bound for every individual blob store call.
    pub call_timeout: Duration,
    /// Lifetime of signed download links.
    pub link_ttl: Duration,
}

impl StorageSettings {
    pub fn resolve(&self, address: &str) -> Result<StorageLocation, LocationError> {
        resolve(Some(address), self.default_container.as_deref())
    }
}

/// Run a blob store call under the configured timeout.
pub(crate) async fn with_timeout<T, F>(
    timeout: Duration,
    operation: &'static str,
    location: &StorageLocation,
    fut: F,
) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                container = %location.container,
                key = %location.key,
                timeout_ms = timeout.as_millis() as u64,
                "Blob store call timed out"
            );
            Err(StorageError::Timeout(timeout))
        }
    }
}

#[derive(Clone)]
pub struct BlobGateway {
    store: Arc<dyn BlobStore>,
    settings: StorageSettings,
}

impl BlobGateway {
    pub fn new(store: Arc<dyn BlobStore>, settings: StorageSettings) -> Self {
        Self { store, settings }
    }

    /// Store `content` under a fresh key namespaced by `parent_id`.
    ///
    /// Returns the canonical `s3://container/key` address. Provider failures are not retried.
    #[tracing::instrument(skip(self, content), fields(size_bytes = content.len()))]
    pub async fn put(
        &self,
        parent_id: i64,
        content: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        let container = self
            .settings
            .default_container
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or(LocationError::MissingContainerConfig)?;
        let location = StorageLocation::new(container, document_key(parent_id, content_type));

        with_timeout(
            self.settings.call_timeout,
            "put",
            &location,
            self.store.put(&location, content, content_type),
        )
        .await?;

        Ok(location.to_address())
    }

    /// Delete the blob behind `address`. Missing objects are not an error.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, address: &str) -> StorageResult<()> {
        let location = self.settings.resolve(address)?;
        with_timeout(
            self.settings.call_timeout,
            "delete",
            &location,
            self.store.delete(&location),
        )
        .await
    }

    /// Check whether the blob behind `address` is present.
    pub async fn exists(&self, address: &str) -> StorageResult<bool> {
        let location = self.settings.resolve(address)?;
        with_timeout(
            self.settings.call_timeout,
            "exists",
            &location,
            self.store.exists(&location),
        )
        .await
    }
}
