use crate::auth::Caller;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DownloadState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use lectern_core::models::DownloadLinkResponse;

#[utoipa::path(
    get,
    path = "/api/lessons/{lesson_id}/documents/{document_id}/download",
    tag = "catalog",
    params(
        ("lesson_id" = i64, Path, description = "Lesson ID"),
        ("document_id" = i64, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Time-limited signed link", body = DownloadLinkResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[tracing::instrument(
    skip(downloads, caller),
    fields(subject = ?caller.subject, operation = "download_document")
)]
pub async fn download_document(
    State(downloads): State<DownloadState>,
    caller: Caller,
    Path((lesson_id, document_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let link = downloads
        .service
        .download_link(lesson_id, document_id)
        .await?;

    tracing::info!(
        lesson_id,
        document_id,
        expires_in_seconds = link.expires_in_seconds,
        "Download link issued"
    );
    Ok(Json(link))
}
