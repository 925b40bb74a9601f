//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::auth::access_gate_middleware;
use crate::constants::{
    ADMIN_PREFIX, API_PREFIX, FILES_PREFIX, MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH,
};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use lectern_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Files accepted by the largest form (lesson creation).
const MAX_FILES_PER_REQUEST: usize = 3;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    build_router(config, state)
}

/// Build the full router for `state`. Exposed separately so tests can mount it directly.
pub fn build_router(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let download_routes = download_routes().layer(axum::middleware::from_fn_with_state(
        state.downloads.clone(),
        access_gate_middleware,
    ));

    let mut app_state_routes = public_routes()
        .merge(download_routes)
        .merge(admin_routes())
        .merge(health_routes());

    if state.local_files.is_some() {
        tracing::info!(prefix = FILES_PREFIX, "Serving signed local file links");
        app_state_routes = app_state_routes.route(
            &format!("{}/{{container}}/{{*key}}", FILES_PREFIX),
            get(handlers::files::serve_signed_file),
        );
    }

    let body_limit = config
        .max_document_size_bytes()
        .saturating_mul(MAX_FILES_PER_REQUEST)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    tracing::info!(body_limit_bytes = body_limit, "Request body limit layer enabled");

    let app = app_state_routes
        .route(OPENAPI_PATH, get(openapi_json))
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs"))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/sections", API_PREFIX),
            get(handlers::sections::list_sections),
        )
        .route(
            &format!("{}/sections/{{section}}/lessons", API_PREFIX),
            get(handlers::sections::list_section_lessons),
        )
}

fn download_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!(
            "{}/lessons/{{lesson_id}}/documents/{{document_id}}/download",
            API_PREFIX
        ),
        get(handlers::download::download_document),
    )
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/lessons", ADMIN_PREFIX),
            post(handlers::lessons::create_lesson),
        )
        .route(
            &format!("{}/lessons/{{lesson_id}}", ADMIN_PREFIX),
            delete(handlers::lessons::delete_lesson),
        )
        .route(
            &format!("{}/lessons/{{lesson_id}}/documents", ADMIN_PREFIX),
            post(handlers::documents::add_document),
        )
        .route(
            &format!(
                "{}/lessons/{{lesson_id}}/documents/{{document_id}}",
                ADMIN_PREFIX
            ),
            put(handlers::documents::update_document).delete(handlers::documents::delete_document),
        )
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/health",
            get(|axum::extract::State(state): axum::extract::State<Arc<AppState>>| async move {
                health::health_check(state).await
            }),
        )
        .route("/live", get(health::liveness_check))
        .route(
            "/ready",
            get(|axum::extract::State(state): axum::extract::State<Arc<AppState>>| async move {
                health::readiness_check(state).await
            }),
        )
}

async fn openapi_json() -> impl IntoResponse {
    Json(crate::api_doc::get_openapi_spec())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
