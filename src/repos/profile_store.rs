//! Profile lookup capability.
//!
//! Profiles are application data keyed by the identity id, stored separately
//! from the identity service. Lookups run under the service credential, never
//! the end-user token: profile storage access control is not guaranteed to
//! permit self-lookup via the user's own token scope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoResult;

/// One `profiles` row, kept as raw JSON.
///
/// Fields are opaque to this service and pass through to callers unchanged;
/// nothing here should enumerate or rename them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRecord(pub serde_json::Map<String, serde_json::Value>);

/// Capability: fetch a profile row by identity id.
///
/// `Ok(None)` means "no such row" and is an expected outcome: a verified
/// identity without a profile is not a user of this application.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_by_id(&self, id: &str) -> RepoResult<Option<ProfileRecord>>;
}
