//! Lectern Storage Library
//!
//! This crate owns everything that touches the blob store: the `BlobStore` trait with
//! S3 and local filesystem implementations, storage address resolution, the upload/delete
//! gateway, and signed download links.
//!
//! # Address format
//!
//! New uploads are stored under `videos/{lesson_id}/pdfs/{uuid}.pdf` in the default
//! container and recorded as `s3://{container}/{key}`. Older rows may hold a virtual-hosted
//! `https://{container}.s3.{region}.amazonaws.com/{key}` URL or a bare key; see [`location`].

pub mod factory;
pub mod gateway;
pub mod keys;
pub mod links;
pub mod local;
pub mod location;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_blob_store, create_local_blob_store};
pub use gateway::{BlobGateway, StorageSettings, CONTENT_READ_FAILURE};
pub use lectern_core::StorageBackend;
pub use links::{DownloadLink, LinkIssuer};
pub use local::LocalBlobStore;
pub use location::{resolve, LocationError, StorageLocation};
pub use s3::S3BlobStore;
pub use traits::{BlobStore, StorageError, StorageResult};
