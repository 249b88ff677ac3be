use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::repos::profile_store::{ProfileRecord, ProfileStore};

/// Postgres-backed profile store.
///
/// The pool is built from the service-role DATABASE_URL (see `app.rs`), which
/// is the elevated half of the credential split.
#[derive(Clone, Debug)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn fetch_by_id(&self, id: &str) -> RepoResult<Option<ProfileRecord>> {
        // profiles.id is a uuid column; an identity id that does not parse
        // cannot match any row.
        let Ok(profile_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        // Select the whole row as a JSON object so application fields stay
        // opaque to this crate.
        let row: Option<serde_json::Value> = sqlx::query_scalar(
            r#"
            SELECT to_jsonb(p)
            FROM profiles p
            WHERE p.id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|value| match value {
            serde_json::Value::Object(fields) => Some(ProfileRecord(fields)),
            _ => None,
        }))
    }
}
