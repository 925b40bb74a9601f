use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use lectern_core::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // subject id
    pub exp: i64,    // expiration timestamp
    pub iat: i64,    // issued at timestamp
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredential,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

/// Caller identity established by the access gate and stored in request extensions.
///
/// `subject` is `None` only when anonymous access is allowed and no credential was sent.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub subject: Option<String>,
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Caller>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Missing caller context".to_string(),
                    details: None,
                    error_type: None,
                    code: "MISSING_CALLER_CONTEXT".to_string(),
                    recoverable: false,
                    suggested_action: Some("Check the Authorization header".to_string()),
                }),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_unauthorized() {
        let err: AppError = AuthError::MissingCredential.into();
        match err {
            AppError::Unauthorized(msg) => assert_eq!(msg, "Missing Authorization header"),
            other => panic!("Expected Unauthorized, got {other:?}"),
        }
        assert!(matches!(
            AppError::from(AuthError::Expired),
            AppError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_invalid_token_keeps_reason() {
        let err: AppError = AuthError::InvalidToken("InvalidSignature".to_string()).into();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid token: InvalidSignature"));
    }
}
