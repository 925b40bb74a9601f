use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::forms::{LessonForm, LESSON_FILE_FIELDS};
use crate::state::AdminState;
use crate::utils::multipart::MultipartForm;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use lectern_core::models::LessonResponse;

#[utoipa::path(
    post,
    path = "/admin/lessons",
    tag = "admin",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Lesson created with its uploaded documents", body = LessonResponse),
        (status = 400, description = "Invalid input or video link", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(admin, multipart), fields(operation = "create_lesson"))]
pub async fn create_lesson(
    State(admin): State<AdminState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = MultipartForm::read(multipart?, &LESSON_FILE_FIELDS, admin.max_document_size).await?;
    let request = LessonForm::parse(form)?;

    let lesson = admin.lessons.create_lesson(request).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    delete,
    path = "/admin/lessons/{lesson_id}",
    tag = "admin",
    params(
        ("lesson_id" = i64, Path, description = "Lesson ID")
    ),
    responses(
        (status = 204, description = "Lesson, its documents and their blobs deleted"),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(admin), fields(operation = "delete_lesson"))]
pub async fn delete_lesson(
    State(admin): State<AdminState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    admin.lessons.delete_lesson(lesson_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
