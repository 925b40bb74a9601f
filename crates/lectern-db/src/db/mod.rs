//! Catalog repositories
//
// Store trait shared by every backend
pub mod catalog;
//
// Backends
pub mod memory;
pub mod postgres;
//
// Backend selection from configuration
pub mod factory;

pub use catalog::CatalogStore;
pub use factory::create_catalog_store;
pub use memory::MemoryCatalog;
pub use postgres::PgCatalogStore;
