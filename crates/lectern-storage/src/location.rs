//! Storage address resolution.
//!
//! Documents persist an opaque storage address. Three forms are accepted, in priority order:
//!
//! - native scheme: `s3://{container}/{key}`
//! - virtual-hosted web form: `https://{container}.s3.{region...}/{key}`
//! - bare key, resolved against the configured default container
//!
//! Resolution is pure: the default container is always passed in by the caller.

use std::fmt;
use thiserror::Error;
use url::Url;

pub const NATIVE_SCHEME_PREFIX: &str = "s3://";
const SECURE_WEB_PREFIX: &str = "https://";
const PROVIDER_MARKER: &str = ".s3.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("storage address is required")]
    InvalidAddress,

    #[error("Invalid s3 url: {0}")]
    MalformedAddress(String),

    #[error("Unsupported S3 URL: {0}")]
    UnsupportedAddress(String),

    #[error("S3 bucket is required (S3_BUCKET)")]
    MissingContainerConfig,
}

/// A resolved (container, key) pair. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocation {
    pub container: String,
    pub key: String,
}

impl StorageLocation {
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        StorageLocation {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Canonical native-scheme address for this location.
    pub fn to_address(&self) -> String {
        format!("{}{}/{}", NATIVE_SCHEME_PREFIX, self.container, self.key)
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.key)
    }
}

/// Resolve a storage address into a [`StorageLocation`].
///
/// A blank address is rejected before the default container is even consulted.
pub fn resolve(
    address: Option<&str>,
    default_container: Option<&str>,
) -> Result<StorageLocation, LocationError> {
    let address = match address {
        Some(a) if !a.trim().is_empty() => a,
        _ => return Err(LocationError::InvalidAddress),
    };

    if let Some(rest) = address.strip_prefix(NATIVE_SCHEME_PREFIX) {
        return match rest.split_once('/') {
            Some((container, key)) if !container.is_empty() && !key.is_empty() => {
                Ok(StorageLocation::new(container, key))
            }
            _ => Err(LocationError::MalformedAddress(address.to_string())),
        };
    }

    if address.starts_with(SECURE_WEB_PREFIX) {
        return resolve_web_address(address);
    }

    match default_container.map(str::trim) {
        Some(container) if !container.is_empty() => Ok(StorageLocation::new(container, address)),
        _ => Err(LocationError::MissingContainerConfig),
    }
}

fn resolve_web_address(address: &str) -> Result<StorageLocation, LocationError> {
    let unsupported = || LocationError::UnsupportedAddress(address.to_string());

    let url = Url::parse(address).map_err(|_| unsupported())?;
    let host = url.host_str().ok_or_else(unsupported)?;
    let container = match host.find(PROVIDER_MARKER) {
        Some(idx) if idx > 0 => &host[..idx],
        _ => return Err(unsupported()),
    };

    let path = url.path();
    let key = urlencoding::decode(path.strip_prefix('/').unwrap_or(path))
        .map_err(|_| LocationError::MalformedAddress(address.to_string()))?;
    if key.is_empty() {
        return Err(LocationError::MalformedAddress(address.to_string()));
    }

    Ok(StorageLocation::new(container, key.into_owned()))
}
