use crate::auth::models::Caller;
use crate::error::HttpAppError;
use crate::state::DownloadState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lectern_core::AppError;

/// Runs the access gate and stores the resulting [`Caller`] in request extensions.
pub async fn access_gate_middleware(
    State(downloads): State<DownloadState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    match downloads.access.admit(authorization.as_deref()).await {
        Ok(caller) => {
            tracing::debug!(subject = ?caller.subject, "Download access granted");
            request.extensions_mut().insert::<Caller>(caller);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %request.uri().path(), "Download access denied");
            HttpAppError(AppError::from(e)).into_response()
        }
    }
}
