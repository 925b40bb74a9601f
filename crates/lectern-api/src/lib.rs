//! Lectern API Library
//!
//! This crate provides the HTTP API handlers, access gate, and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use api_doc::get_openapi_spec;
pub use error::{ErrorResponse, HttpAppError};
