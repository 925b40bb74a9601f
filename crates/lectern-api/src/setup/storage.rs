//! Storage setup and initialization

use anyhow::Result;
use lectern_core::{Config, StorageBackend};
use lectern_storage::{
    create_blob_store, create_local_blob_store, BlobStore, LocalBlobStore, StorageSettings,
};
use std::sync::Arc;
use std::time::Duration;

/// Container used by the local backend when `S3_BUCKET` is not set.
pub const LOCAL_DEFAULT_CONTAINER: &str = "lessons";

pub struct StorageSetup {
    pub store: Arc<dyn BlobStore>,
    pub settings: StorageSettings,
    /// The same store as `store` when the local backend is selected.
    pub local_files: Option<Arc<LocalBlobStore>>,
}

pub fn storage_settings(config: &Config) -> StorageSettings {
    let default_container = match config.storage_backend() {
        StorageBackend::S3 => config.s3_bucket().map(String::from),
        StorageBackend::Local => Some(
            config
                .s3_bucket()
                .unwrap_or(LOCAL_DEFAULT_CONTAINER)
                .to_string(),
        ),
    };

    StorageSettings {
        default_container,
        call_timeout: Duration::from_secs(config.blob_timeout_secs()),
        link_ttl: Duration::from_secs(config.presign_expiry_minutes().saturating_mul(60)),
    }
}

/// Build the blob store selected by `STORAGE_BACKEND`.
pub async fn setup_storage(config: &Config) -> Result<StorageSetup> {
    tracing::info!("Initializing blob storage...");
    let settings = storage_settings(config);

    let (store, local_files): (Arc<dyn BlobStore>, _) = match config.storage_backend() {
        StorageBackend::Local => {
            let local = Arc::new(create_local_blob_store(config).await?);
            (local.clone(), Some(local))
        }
        StorageBackend::S3 => (create_blob_store(config).await?, None),
    };

    tracing::info!(
        backend = ?store.backend_type(),
        container = ?settings.default_container,
        call_timeout_secs = settings.call_timeout.as_secs(),
        link_ttl_secs = settings.link_ttl.as_secs(),
        "Blob storage initialized successfully"
    );

    Ok(StorageSetup {
        store,
        settings,
        local_files,
    })
}
