use crate::keys::validate_key;
use crate::location::StorageLocation;
use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;

type HmacSha256 = Hmac<Sha256>;

/// Local filesystem blob store
///
/// Objects live at `{base_path}/{container}/{key}`. Signed links point at `base_url` and
/// carry an expiry timestamp plus an HMAC-SHA256 signature over (container, key, expiry).
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
    base_url: String,
    signing_key: Vec<u8>,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blob storage (e.g., "/var/lib/lectern/blobs")
    /// * `base_url` - Base URL the files route is mounted at (e.g., "http://localhost:4000/files")
    /// * `signing_key` - Secret used to sign and verify download links
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signing_key: impl Into<Vec<u8>>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore {
            base_path,
            base_url,
            signing_key: signing_key.into(),
        })
    }

    /// Convert a location to a filesystem path, rejecting traversal outside the base directory.
    fn location_to_path(&self, location: &StorageLocation) -> StorageResult<PathBuf> {
        validate_key(&location.container).map_err(StorageError::InvalidKey)?;
        validate_key(&location.key).map_err(StorageError::InvalidKey)?;
        if location.container.contains(['/', '\\']) {
            return Err(StorageError::InvalidKey(format!(
                "Container must be a single path segment: {}",
                location.container
            )));
        }
        Ok(self.base_path.join(&location.container).join(&location.key))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn signature(&self, location: &StorageLocation, expires_at: u64) -> StorageResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        mac.update(location.container.as_bytes());
        mac.update(b"\n");
        mac.update(location.key.as_bytes());
        mac.update(b"\n");
        mac.update(&expires_at.to_be_bytes());
        Ok(mac)
    }

    /// Check a link produced by [`BlobStore::presign`]. Expired or tampered links fail.
    pub fn verify_link(&self, location: &StorageLocation, expires_at: u64, signature: &str) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        if now > expires_at {
            return false;
        }
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        match self.signature(location, expires_at) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }

    /// Read an object's bytes. Used by the signed-link file route.
    pub async fn read(&self, location: &StorageLocation) -> StorageResult<Option<Bytes>> {
        let path = self.location_to_path(location)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        location: &StorageLocation,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<()> {
        let path = self.location_to_path(location)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            container = %location.container,
            key = %location.key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(())
    }

    async fn delete(&self, location: &StorageLocation) -> StorageResult<()> {
        let path = self.location_to_path(location)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(
                    container = %location.container,
                    key = %location.key,
                    "Local delete successful"
                );
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn presign(
        &self,
        location: &StorageLocation,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.location_to_path(location)?;
        let expires_at = SystemTime::now()
            .checked_add(expires_in)
            .unwrap_or(SystemTime::UNIX_EPOCH)
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let signature = hex::encode(self.signature(location, expires_at)?.finalize().into_bytes());
        let encoded_key = location
            .key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Ok(format!(
            "{}/{}/{}?expires={}&signature={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&location.container),
            encoded_key,
            expires_at,
            signature
        ))
    }

    async fn exists(&self, location: &StorageLocation) -> StorageResult<bool> {
        let path = self.location_to_path(location)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    async fn store() -> (LocalBlobStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(
            dir.path(),
            "http://localhost:4000/files".to_string(),
            SECRET,
        )
        .await
        .unwrap();
        (store, dir)
    }

    fn query_param<'a>(url: &'a str, name: &str) -> &'a str {
        url.split(['?', '&'])
            .find_map(|pair| pair.strip_prefix(&format!("{}=", name)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_local_put_exists_read() {
        let (store, _dir) = store().await;
        let location = StorageLocation::new("lessons", "videos/7/pdfs/a.pdf");

        store
            .put(&location, Bytes::from_static(b"%PDF-1.4"), "application/pdf")
            .await
            .unwrap();

        assert!(store.exists(&location).await.unwrap());
        assert_eq!(
            store.read(&location).await.unwrap(),
            Some(Bytes::from_static(b"%PDF-1.4"))
        );
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let (store, _dir) = store().await;
        for location in [
            StorageLocation::new("lessons", "../../etc/passwd"),
            StorageLocation::new("..", "x.pdf"),
            StorageLocation::new("a/b", "x.pdf"),
        ] {
            let result = store.put(&location, Bytes::from_static(b"x"), "text/plain").await;
            assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        }
    }

    #[tokio::test]
    async fn test_local_delete_nonexistent() {
        let (store, _dir) = store().await;
        let location = StorageLocation::new("lessons", "videos/1/pdfs/missing.pdf");
        assert!(store.delete(&location).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_object() {
        let (store, _dir) = store().await;
        let location = StorageLocation::new("lessons", "videos/7/pdfs/b.pdf");
        store
            .put(&location, Bytes::from_static(b"data"), "application/pdf")
            .await
            .unwrap();

        store.delete(&location).await.unwrap();

        assert!(!store.exists(&location).await.unwrap());
        assert_eq!(store.read(&location).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_presigned_link_verifies() {
        let (store, _dir) = store().await;
        let location = StorageLocation::new("lessons", "videos/7/pdfs/week 1.pdf");

        let url = store
            .presign(&location, Duration::from_secs(600))
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:4000/files/lessons/videos/7/pdfs/week%201.pdf?"));
        let expires: u64 = query_param(&url, "expires").parse().unwrap();
        let signature = query_param(&url, "signature");
        assert!(store.verify_link(&location, expires, signature));
    }

    #[tokio::test]
    async fn test_tampered_or_expired_link_rejected() {
        let (store, _dir) = store().await;
        let location = StorageLocation::new("lessons", "videos/7/pdfs/c.pdf");
        let url = store
            .presign(&location, Duration::from_secs(600))
            .await
            .unwrap();
        let expires: u64 = query_param(&url, "expires").parse().unwrap();
        let signature = query_param(&url, "signature");

        let other = StorageLocation::new("lessons", "videos/7/pdfs/d.pdf");
        assert!(!store.verify_link(&other, expires, signature));
        assert!(!store.verify_link(&location, expires + 1, signature));
        assert!(!store.verify_link(&location, 1, signature));
        assert!(!store.verify_link(&location, expires, "not-hex"));
    }
}
