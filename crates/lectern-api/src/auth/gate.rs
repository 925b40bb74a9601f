//! Access gate for download links.

use crate::auth::jwt::TokenVerifier;
use crate::auth::models::{AuthError, Caller};
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves the raw `Authorization` header into a caller identity.
///
/// When `required` is false a request without credentials passes as anonymous; a credential
/// that is present must still verify.
pub struct AccessGate {
    verifier: Arc<dyn TokenVerifier>,
    required: bool,
}

impl AccessGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, required: bool) -> Self {
        Self { verifier, required }
    }

    /// Verify the credential and return its subject.
    pub async fn identity(&self, authorization: Option<&str>) -> Result<String, AuthError> {
        let credential = authorization
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let token = credential
            .strip_prefix(BEARER_PREFIX)
            .unwrap_or(credential)
            .trim();
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        self.verifier.verify(token).await
    }

    /// Apply the gate policy to one request.
    pub async fn admit(&self, authorization: Option<&str>) -> Result<Caller, AuthError> {
        let anonymous = authorization.map_or(true, |value| value.trim().is_empty());
        if anonymous && !self.required {
            return Ok(Caller::default());
        }
        let subject = self.identity(authorization).await?;
        Ok(Caller {
            subject: Some(subject),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Accepts exactly one token.
    struct FixedVerifier;

    #[async_trait]
    impl TokenVerifier for FixedVerifier {
        async fn verify(&self, token: &str) -> Result<String, AuthError> {
            if token == "good-token" {
                Ok("student-7".to_string())
            } else {
                Err(AuthError::InvalidToken("unknown token".to_string()))
            }
        }
    }

    fn gate(required: bool) -> AccessGate {
        AccessGate::new(Arc::new(FixedVerifier), required)
    }

    #[tokio::test]
    async fn test_absent_or_blank_header_is_missing_credential() {
        let gate = gate(true);
        for header in [None, Some(""), Some("   "), Some("Bearer ")] {
            let err = gate.identity(header).await.unwrap_err();
            assert!(matches!(err, AuthError::MissingCredential), "{header:?}");
            assert_eq!(err.to_string(), "Missing Authorization header");
        }
    }

    #[tokio::test]
    async fn test_bearer_prefix_is_stripped() {
        let gate = gate(true);
        assert_eq!(
            gate.identity(Some("Bearer good-token")).await.unwrap(),
            "student-7"
        );
        assert_eq!(gate.identity(Some("good-token")).await.unwrap(), "student-7");
    }

    #[tokio::test]
    async fn test_invalid_credential_is_rejected() {
        let err = gate(true).identity(Some("Bearer nope")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_optional_gate_admits_anonymous_but_checks_presented_tokens() {
        let gate = gate(false);
        assert!(gate.admit(None).await.unwrap().subject.is_none());
        assert_eq!(
            gate.admit(Some("Bearer good-token")).await.unwrap().subject,
            Some("student-7".to_string())
        );
        assert!(gate.admit(Some("Bearer nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_required_gate_rejects_anonymous() {
        assert!(matches!(
            gate(true).admit(None).await,
            Err(AuthError::MissingCredential)
        ));
    }
}
