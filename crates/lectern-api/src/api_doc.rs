//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use lectern_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Registers the bearer token scheme referenced by the download route.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lectern API",
        version = "0.1.0",
        description = "Lesson catalog API. Lessons are grouped into sections and carry supplementary PDF documents stored in blob storage; documents are downloaded through short-lived signed links."
    ),
    paths(
        // Catalog
        handlers::sections::list_sections,
        handlers::sections::list_section_lessons,
        handlers::download::download_document,
        // Admin
        handlers::lessons::create_lesson,
        handlers::lessons::delete_lesson,
        handlers::documents::add_document,
        handlers::documents::update_document,
        handlers::documents::delete_document,
    ),
    components(
        schemas(
            models::SectionResponse,
            models::LessonResponse,
            models::DocumentResponse,
            models::DownloadLinkResponse,
            // Error
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "catalog", description = "Public catalog browsing and gated document downloads"),
        (name = "admin", description = "Lesson and document management")
    )
)]
pub struct ApiDoc;
