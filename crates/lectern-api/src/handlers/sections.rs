use crate::error::{ErrorResponse, HttpAppError};
use crate::state::CatalogState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use lectern_core::models::{LessonResponse, SectionResponse};

#[utoipa::path(
    get,
    path = "/api/sections",
    tag = "catalog",
    responses(
        (status = 200, description = "Distinct sections in alphabetical order", body = Vec<SectionResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(catalog), fields(operation = "list_sections"))]
pub async fn list_sections(
    State(catalog): State<CatalogState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let sections = catalog.queries.list_sections().await?;
    Ok(Json(sections))
}

#[utoipa::path(
    get,
    path = "/api/sections/{section}/lessons",
    tag = "catalog",
    params(
        ("section" = String, Path, description = "Section name")
    ),
    responses(
        (status = 200, description = "Lessons in display order, each with ordered documents", body = Vec<LessonResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(catalog), fields(operation = "list_section_lessons"))]
pub async fn list_section_lessons(
    State(catalog): State<CatalogState>,
    Path(section): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let lessons = catalog.queries.lessons_in_section(&section).await?;
    tracing::debug!(section = %section, count = lessons.len(), "Section lessons listed");
    Ok(Json(lessons))
}
