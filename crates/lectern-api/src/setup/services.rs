//! Service wiring

use crate::auth::{AccessGate, JwtService, TokenVerifier};
use crate::setup::storage::StorageSetup;
use crate::state::{AdminState, AppState, CatalogState, DownloadState};
use anyhow::Result;
use lectern_core::Config;
use lectern_db::{create_catalog_store, CatalogStore};
use lectern_services::{
    BlobGateway, CatalogQueryService, DocumentLifecycleService, DownloadService,
    LessonCreationService, LinkIssuer,
};
use sqlx::PgPool;
use std::sync::Arc;

/// Initialize the catalog store and every service on top of it.
pub async fn initialize_services(
    config: &Config,
    pool: Option<PgPool>,
    storage: StorageSetup,
) -> Result<Arc<AppState>> {
    let catalog = create_catalog_store(config, pool).await?;
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtService::new(config.jwt_secret()));

    let state = build_state(config, catalog, storage, verifier);
    tracing::info!(
        download_requires_auth = config.download_requires_auth(),
        "Services initialized"
    );
    Ok(state)
}

/// Assemble [`AppState`] from already-built collaborators.
pub fn build_state(
    config: &Config,
    catalog: Arc<dyn CatalogStore>,
    storage: StorageSetup,
    verifier: Arc<dyn TokenVerifier>,
) -> Arc<AppState> {
    let gateway = BlobGateway::new(storage.store.clone(), storage.settings.clone());
    let links = LinkIssuer::new(storage.store, storage.settings);

    Arc::new(AppState {
        catalog: CatalogState {
            store: catalog.clone(),
            queries: CatalogQueryService::new(catalog.clone()),
        },
        admin: AdminState {
            lessons: LessonCreationService::new(catalog.clone(), gateway.clone()),
            documents: DocumentLifecycleService::new(catalog.clone(), gateway.clone()),
            max_document_size: config.max_document_size_bytes(),
        },
        downloads: DownloadState {
            service: DownloadService::new(catalog, links),
            access: Arc::new(AccessGate::new(verifier, config.download_requires_auth())),
        },
        blobs: gateway,
        local_files: storage.local_files,
        config: config.clone(),
    })
}
