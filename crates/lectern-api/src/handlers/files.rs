//! Serves blobs from the local filesystem backend through its signed links.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Response, StatusCode},
};
use lectern_core::AppError;
use lectern_storage::StorageLocation;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SignedLinkQuery {
    expires: u64,
    signature: String,
}

fn content_type_for(key: &str) -> &'static str {
    if key.to_ascii_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

#[tracing::instrument(skip(state, query), fields(operation = "serve_signed_file"))]
pub async fn serve_signed_file(
    State(state): State<Arc<AppState>>,
    Path((container, key)): Path<(String, String)>,
    Query(query): Query<SignedLinkQuery>,
) -> Result<Response<Body>, HttpAppError> {
    let store = state
        .local_files
        .as_ref()
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let location = StorageLocation::new(container, key);
    if !store.verify_link(&location, query.expires, &query.signature) {
        return Err(AppError::Unauthorized("Invalid or expired download link".to_string()).into());
    }

    let data = store
        .read(&location)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    tracing::debug!(
        container = %location.container,
        key = %location.key,
        size_bytes = data.len(),
        "Serving signed file"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&location.key))
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
