//! Lectern Core Library
//!
//! This crate provides the domain models, error types, configuration, and video
//! reference handling shared across all Lectern components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod video_ref;

// Re-export commonly used types
pub use config::{BaseConfig, CatalogConfig, Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{CatalogBackend, StorageBackend};
