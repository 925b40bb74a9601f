//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use axum::http::HeaderValue;
use lectern_core::Config;

/// Validate critical configuration values
///
/// Runs the config's own checks, then the ones that only matter once the HTTP layer is
/// built.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();
    let cors_origins = config.cors_origins();

    // Validate CORS configuration in production
    if is_production && cors_origins.iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if let Some(bad) = cors_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .find(|o| o.parse::<HeaderValue>().is_err())
    {
        return Err(anyhow::anyhow!("Invalid CORS origin: {}", bad));
    }

    if !config.download_requires_auth() {
        if is_production {
            tracing::warn!("DOWNLOAD_REQUIRES_AUTH=false in production: download links are public");
        } else {
            tracing::info!("Anonymous document downloads enabled");
        }
    }

    Ok(())
}
