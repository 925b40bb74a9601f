use crate::location::StorageLocation;
use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::time::{Duration, Instant};

/// S3 blob store
///
/// Holds a client for the default bucket. Addresses that name another bucket get a client
/// built from the same settings on demand.
#[derive(Clone)]
pub struct S3BlobStore {
    builder: AmazonS3Builder,
    default_store: AmazonS3,
    default_bucket: String,
}

impl S3BlobStore {
    /// Create a new S3BlobStore
    ///
    /// # Arguments
    /// * `bucket` - default bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env().with_region(region);

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let default_store = builder
            .clone()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3BlobStore {
            builder,
            default_store,
            default_bucket: bucket,
        })
    }

    fn store_for(&self, container: &str) -> StorageResult<AmazonS3> {
        if container == self.default_bucket {
            return Ok(self.default_store.clone());
        }
        self.builder
            .clone()
            .with_bucket_name(container)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        location: &StorageLocation,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let store = self.store_for(&location.container)?;
        let size = data.len() as u64;
        let path = Path::from(location.key.as_str());
        let attributes =
            Attributes::from_iter([(Attribute::ContentType, content_type.to_string())]);
        let start = Instant::now();

        let result: ObjectResult<_> = store
            .put_opts(&path, PutPayload::from(data), PutOptions::from(attributes))
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %location.container,
                key = %location.key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %location.container,
            key = %location.key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn delete(&self, location: &StorageLocation) -> StorageResult<()> {
        let store = self.store_for(&location.container)?;
        let start = Instant::now();
        let path = Path::from(location.key.as_str());

        match store.delete(&path).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %location.container,
                    key = %location.key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %location.container,
            key = %location.key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn presign(
        &self,
        location: &StorageLocation,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.store_for(&location.container)?;
        let path = Path::from(location.key.as_str());
        let url_result: ObjectResult<_> = store.signed_url(Method::GET, &path, expires_in).await;

        let url = url_result
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?
            .to_string();

        Ok(url)
    }

    async fn exists(&self, location: &StorageLocation) -> StorageResult<bool> {
        let store = self.store_for(&location.container)?;
        let path = Path::from(location.key.as_str());
        head_outcome(store.head(&path).await.map(|_| ()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Presence from a HEAD result; only a definite 404 means absent.
fn head_outcome(result: Result<(), ObjectStoreError>) -> StorageResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(ObjectStoreError::NotFound { .. }) => Ok(false),
        Err(e) => Err(StorageError::LookupFailed(e.to_string())),
    }
}
