//! Lectern catalog store
//!
//! Metadata persistence for lessons and their documents. The [`CatalogStore`] trait is the
//! seam the services depend on; [`PgCatalogStore`] backs it with PostgreSQL and
//! [`MemoryCatalog`] with an in-process arena indexed by lesson id.

pub mod db;

pub use db::{create_catalog_store, CatalogStore, MemoryCatalog, PgCatalogStore};
