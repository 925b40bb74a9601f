use crate::{BlobStore, LocalBlobStore, S3BlobStore, StorageBackend, StorageError, StorageResult};
use lectern_core::Config;
use std::sync::Arc;

/// Create a blob store based on configuration
pub async fn create_blob_store(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    match config.storage_backend() {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let store = S3BlobStore::new(bucket, region, endpoint)?;
            Ok(Arc::new(store))
        }

        StorageBackend::Local => {
            let store = create_local_blob_store(config).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Create the local filesystem store; the API also needs the concrete type to serve signed links.
pub async fn create_local_blob_store(config: &Config) -> StorageResult<LocalBlobStore> {
    let base_path = config
        .local_storage_path()
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string()))?;
    let base_url = config
        .local_storage_base_url()
        .map(String::from)
        .ok_or_else(|| {
            StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
        })?;

    LocalBlobStore::new(base_path, base_url, config.jwt_secret().as_bytes()).await
}
