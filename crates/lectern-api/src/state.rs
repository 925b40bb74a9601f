//! Application state and sub-state extractors.
//!
//! AppState is split into domain sub-states so handlers can extract only what they need
//! via Axum's `FromRef`.

use crate::auth::AccessGate;
use lectern_core::Config;
use lectern_db::CatalogStore;
use lectern_services::{
    CatalogQueryService, DocumentLifecycleService, DownloadService, LessonCreationService,
};
use lectern_storage::{BlobGateway, LocalBlobStore};
use std::sync::Arc;

// ----- Sub-state types -----

/// Catalog store plus the read-side query service.
#[derive(Clone)]
pub struct CatalogState {
    pub store: Arc<dyn CatalogStore>,
    pub queries: CatalogQueryService,
}

/// Lesson and document management.
#[derive(Clone)]
pub struct AdminState {
    pub lessons: LessonCreationService,
    pub documents: DocumentLifecycleService,
    /// Upper bound for a single uploaded file part.
    pub max_document_size: usize,
}

/// Gated download link issuance.
#[derive(Clone)]
pub struct DownloadState {
    pub service: DownloadService,
    pub access: Arc<AccessGate>,
}

// ----- AppState -----

pub struct AppState {
    pub catalog: CatalogState,
    pub admin: AdminState,
    pub downloads: DownloadState,
    /// Used by health probes.
    pub blobs: BlobGateway,
    /// Set only for the local storage backend, which serves its own signed links.
    pub local_files: Option<Arc<LocalBlobStore>>,
    pub config: Config,
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for CatalogState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.catalog.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for AdminState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.admin.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for DownloadState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.downloads.clone()
    }
}

#[allow(dead_code)]
const fn assert_send_sync<T: Send + Sync>() {}
const _: () = assert_send_sync::<AppState>();
