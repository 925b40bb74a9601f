use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::forms::{DocumentChangesForm, DocumentForm, DOCUMENT_FILE_FIELD};
use crate::state::AdminState;
use crate::utils::multipart::MultipartForm;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use lectern_core::models::DocumentResponse;

#[utoipa::path(
    post,
    path = "/admin/lessons/{lesson_id}/documents",
    tag = "admin",
    params(
        ("lesson_id" = i64, Path, description = "Lesson ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded and attached", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 409, description = "Document type already used by this lesson", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(admin, multipart), fields(operation = "add_document"))]
pub async fn add_document(
    State(admin): State<AdminState>,
    Path(lesson_id): Path<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let form =
        MultipartForm::read(multipart?, &[DOCUMENT_FILE_FIELD], admin.max_document_size).await?;
    let request = DocumentForm::parse(form)?;

    let document = admin.documents.add(lesson_id, request).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    put,
    path = "/admin/lessons/{lesson_id}/documents/{document_id}",
    tag = "admin",
    params(
        ("lesson_id" = i64, Path, description = "Lesson ID"),
        ("document_id" = i64, Path, description = "Document ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document updated", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Document type already used by this lesson", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(admin, multipart), fields(operation = "update_document"))]
pub async fn update_document(
    State(admin): State<AdminState>,
    Path((lesson_id, document_id)): Path<(i64, i64)>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let form =
        MultipartForm::read(multipart?, &[DOCUMENT_FILE_FIELD], admin.max_document_size).await?;
    let changes = DocumentChangesForm::parse(form)?;

    let document = admin
        .documents
        .update(lesson_id, document_id, changes)
        .await?;
    Ok(Json(document))
}

#[utoipa::path(
    delete,
    path = "/admin/lessons/{lesson_id}/documents/{document_id}",
    tag = "admin",
    params(
        ("lesson_id" = i64, Path, description = "Lesson ID"),
        ("document_id" = i64, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document and its blob deleted"),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(admin), fields(operation = "delete_document"))]
pub async fn delete_document(
    State(admin): State<AdminState>,
    Path((lesson_id, document_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, HttpAppError> {
    admin.documents.delete(lesson_id, document_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
