use crate::db::{CatalogStore, MemoryCatalog, PgCatalogStore};
use lectern_core::{CatalogBackend, Config};
use sqlx::PgPool;
use std::sync::Arc;

/// Create the catalog store selected by `CATALOG_BACKEND`.
///
/// The postgres backend needs the pool built during startup; the memory backend ignores it.
pub async fn create_catalog_store(
    config: &Config,
    pool: Option<PgPool>,
) -> anyhow::Result<Arc<dyn CatalogStore>> {
    match config.catalog_backend() {
        CatalogBackend::Postgres => {
            let pool = pool.ok_or_else(|| {
                anyhow::anyhow!("Postgres catalog selected but no database pool was created")
            })?;
            tracing::info!("Using PostgreSQL catalog store");
            Ok(Arc::new(PgCatalogStore::new(pool)))
        }
        CatalogBackend::Memory => {
            tracing::warn!("Using in-memory catalog store; data is lost on restart");
            Ok(Arc::new(MemoryCatalog::new()))
        }
    }
}
