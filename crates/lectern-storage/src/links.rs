//! Signed download links.

use crate::gateway::{with_timeout, StorageSettings};
use crate::traits::{BlobStore, StorageResult};
use std::sync::Arc;

/// A signed URL and the number of seconds it stays valid from issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
    pub expires_in_seconds: u64,
}

/// Issues time-bounded retrieval URLs. Never touches the stored object.
#[derive(Clone)]
pub struct LinkIssuer {
    store: Arc<dyn BlobStore>,
    settings: StorageSettings,
}

impl LinkIssuer {
    pub fn new(store: Arc<dyn BlobStore>, settings: StorageSettings) -> Self {
        Self { store, settings }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.settings.link_ttl.as_secs()
    }

    #[tracing::instrument(skip(self))]
    pub async fn issue_download_link(&self, address: &str) -> StorageResult<DownloadLink> {
        let location = self.settings.resolve(address)?;
        let url = with_timeout(
            self.settings.call_timeout,
            "presign",
            &location,
            self.store.presign(&location, self.settings.link_ttl),
        )
        .await?;

        tracing::debug!(
            container = %location.container,
            key = %location.key,
            expires_in_seconds = self.ttl_seconds(),
            "Issued download link"
        );

        Ok(DownloadLink {
            url,
            expires_in_seconds: self.ttl_seconds(),
        })
    }
}
