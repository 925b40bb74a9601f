//! Lectern Services Layer
//!
//! This crate is the **business service layer**: it sequences blob store calls and catalog
//! writes for lessons and their documents, and shapes the read views. Keep coordination and
//! ordering rules here; keep thin HTTP handling in lectern-api.

pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use services::catalog::CatalogQueryService;
pub use services::documents::{AddDocument, DocumentLifecycleService, UpdateDocument};
pub use services::download::DownloadService;
pub use services::lessons::{CreateLesson, LessonCreationService};
pub use services::UploadedFile;

pub use lectern_db::CatalogStore;
pub use lectern_storage::{BlobGateway, BlobStore, LinkIssuer, StorageSettings};
