//! API path constants
//!
//! Public catalog routes live under [`API_PREFIX`]; content management routes under
//! [`ADMIN_PREFIX`]. Handler `#[utoipa::path]` annotations spell the same prefixes out.

/// Public catalog and download routes
pub const API_PREFIX: &str = "/api";

/// Lesson and document management routes
pub const ADMIN_PREFIX: &str = "/admin";

/// Signed-link file route served when blobs live on the local filesystem
pub const FILES_PREFIX: &str = "/files";

/// OpenAPI document location, also used by the RapiDoc UI
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Headroom on top of the summed file limits for multipart framing and text fields.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
