//! Request-scoped user resolution.
//!
//! One request, at most two sequential outbound calls: verify the bearer
//! token with the identity service, then fetch the profile row under the
//! service credential. Nothing is cached or persisted between requests.

use std::sync::Arc;

use axum::http::{HeaderMap, header};
use serde::Serialize;
use tracing::{debug, warn};

use crate::repos::profile_store::ProfileStore;
use crate::services::auth::bearer::bearer_token;
use crate::services::auth::verifier::{Identity, TokenVerifier, VerifyError};

/// The authenticated user for the duration of one request.
///
/// Serializes as the profile row's fields at the top level plus the raw
/// identity under `authUser`, so callers can reach both the application
/// profile and the identity metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedUser {
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "authUser")]
    pub auth_user: Identity,
}

impl ResolvedUser {
    pub fn user_id(&self) -> &str {
        &self.auth_user.id
    }
}

/// Resolves incoming requests to users via the two auth capabilities.
pub struct UserResolver {
    verifier: Arc<dyn TokenVerifier>,
    profiles: Arc<dyn ProfileStore>,
}

impl UserResolver {
    pub fn new(verifier: Arc<dyn TokenVerifier>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { verifier, profiles }
    }

    /// Resolve the request's `Authorization` header to a user.
    ///
    /// The boundary contract is absence-only: malformed header, rejected
    /// token, verifier outage, missing profile row and store failure all come
    /// back as `None`. Callers must not branch on the cause; the cause goes
    /// to the logs instead.
    pub async fn resolve(&self, headers: &HeaderMap) -> Option<ResolvedUser> {
        let header_value = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        // No well-formed bearer header: done, without touching the verifier.
        let token = bearer_token(header_value)?;

        let identity = match self.verifier.verify(token).await {
            Ok(identity) => identity,
            Err(VerifyError::Rejected) => {
                debug!("token rejected by identity service");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "identity verification unavailable");
                return None;
            }
        };

        match self.profiles.fetch_by_id(&identity.id).await {
            Ok(Some(record)) => Some(ResolvedUser {
                profile: record.0,
                auth_user: identity,
            }),
            Ok(None) => {
                // Verified identity, no profile row: not a user here.
                debug!(user_id = %identity.id, "no profile row for verified identity");
                None
            }
            Err(err) => {
                warn!(user_id = %identity.id, error = %err, "profile lookup failed");
                None
            }
        }
    }
}
