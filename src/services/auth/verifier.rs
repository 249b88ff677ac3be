//! Token verification against the external identity service.
//!
//! Verification is delegated: this process never inspects token contents.
//! The identity service either resolves the token to a principal or it does
//! not, and we treat its word as final.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Authenticated principal returned by the identity service.
///
/// Only `id` is interpreted here. Every other field of the payload is carried
/// through untouched so callers keep the full identity metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub type VerifyResult = Result<Identity, VerifyError>;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The identity service looked at the token and said no
    /// (expired, revoked, forged).
    #[error("token rejected by identity service")]
    Rejected,

    #[error("identity service transport error: {0}")]
    Transport(String),

    #[error("unexpected identity payload: {0}")]
    InvalidPayload(String),

    #[error("identity client configuration: {0}")]
    Config(String),
}

/// Capability: resolve a bearer token into an [`Identity`].
///
/// Kept narrow so the resolution flow can be exercised with in-process fakes.
/// Implementations are shared behind `Arc`.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> VerifyResult;
}

/// HTTP client for the identity service's user endpoint.
///
/// The request carries the END-USER token as `Authorization: Bearer <token>`
/// plus the public project key in `apikey`. This is deliberately not the
/// service credential; see the profile store for the other half of the split.
#[derive(Clone)]
pub struct HttpTokenVerifier {
    client: reqwest::Client,
    user_endpoint: Url,
}

impl fmt::Debug for HttpTokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the client: its default headers hold the api key.
        f.debug_struct("HttpTokenVerifier")
            .field("user_endpoint", &self.user_endpoint.as_str())
            .finish()
    }
}

impl HttpTokenVerifier {
    /// `base_url` is the identity project's root URL; the user endpoint path
    /// is appended here.
    pub fn new(base_url: &Url, api_key: &str, timeout: Duration) -> Result<Self, VerifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .map_err(|e| VerifyError::Config(format!("invalid api key header value: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| VerifyError::Config(format!("failed to build HTTP client: {e}")))?;

        let user_endpoint = base_url
            .join("auth/v1/user")
            .map_err(|e| VerifyError::Config(format!("invalid identity base URL: {e}")))?;

        Ok(Self {
            client,
            user_endpoint,
        })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> VerifyResult {
        let response = self
            .client
            .get(self.user_endpoint.clone())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| VerifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(VerifyError::Rejected);
        }
        if !status.is_success() {
            return Err(VerifyError::Transport(format!(
                "identity service returned {status}"
            )));
        }

        let identity: Identity = response
            .json()
            .await
            .map_err(|e| VerifyError::InvalidPayload(e.to_string()))?;

        if identity.id.trim().is_empty() {
            return Err(VerifyError::InvalidPayload("empty identity id".into()));
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verifier_for(server: &MockServer) -> HttpTokenVerifier {
        let base = Url::parse(&server.uri()).unwrap();
        HttpTokenVerifier::new(&base, "anon-key", Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn resolves_identity_from_user_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer tok-1"))
            .and(header("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u1",
                "email": "alice@example.com"
            })))
            .mount(&server)
            .await;

        let identity = verifier_for(&server).verify("tok-1").await.unwrap();
        assert_eq!(identity.id, "u1");
        assert_eq!(
            identity.extra.get("email").and_then(|v| v.as_str()),
            Some("alice@example.com")
        );
    }

    #[tokio::test]
    async fn unauthorized_status_is_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = verifier_for(&server).verify("expired").await.unwrap_err();
        assert!(matches!(err, VerifyError::Rejected));
    }

    #[tokio::test]
    async fn server_errors_are_transport_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = verifier_for(&server).verify("tok").await.unwrap_err();
        assert!(matches!(err, VerifyError::Transport(_)));
    }

    #[tokio::test]
    async fn payload_without_id_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })),
            )
            .mount(&server)
            .await;

        let err = verifier_for(&server).verify("tok").await.unwrap_err();
        assert!(matches!(err, VerifyError::InvalidPayload(_)));
    }
}
