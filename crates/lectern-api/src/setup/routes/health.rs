//! Health check handlers and response types.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Object looked up by the storage probe; it never exists.
const PROBE_KEY: &str = "health-check-non-existent-key";

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub catalog: String,
    pub catalog_backend: String,
    pub storage: String,
    pub storage_backend: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the catalog store answers.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    let catalog = run_check(TIMEOUT, state.catalog.store.health_check(), "not_ready").await;
    let ready = catalog == "healthy";
    if !ready {
        tracing::error!(catalog = %catalog, "Catalog readiness check failed");
    }

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status = if ready { "ready" } else { "not_ready" };

    (
        status_code,
        Json(serde_json::json!({ "status": status, "catalog": catalog })),
    )
}

/// Full health check (catalog and blob storage).
///
/// Only the catalog decides the status code; a storage failure reports "degraded".
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    let catalog = run_check(TIMEOUT, state.catalog.store.health_check(), "unhealthy").await;
    let overall_healthy = catalog == "healthy";

    let blobs = state.blobs.clone();
    let storage = run_check(
        TIMEOUT,
        async move { blobs.exists(PROBE_KEY).await.map(drop) },
        "degraded",
    )
    .await;

    let status = match (overall_healthy, storage == "healthy") {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    let response = HealthCheckResponse {
        status: status.to_string(),
        catalog,
        catalog_backend: state.config.catalog_backend().to_string(),
        storage,
        storage_backend: state.config.storage_backend().to_string(),
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
