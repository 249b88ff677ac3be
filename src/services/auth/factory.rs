/// Factory: build the request-auth stack from application `Config`.
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::config::Config;
use crate::error::AppError;
use crate::repos::profile_pg::PgProfileStore;
use crate::services::auth::resolver::UserResolver;
use crate::services::auth::verifier::HttpTokenVerifier;

pub fn build_resolver(config: &Config, pool: PgPool) -> Result<Arc<UserResolver>, AppError> {
    let verifier = HttpTokenVerifier::new(
        &config.auth_api_url,
        &config.auth_api_key,
        Duration::from_secs(config.auth_http_timeout_seconds),
    )
    .map_err(|err| {
        tracing::error!(error = %err, "failed to build identity client");
        AppError::Internal
    })?;

    let profiles = PgProfileStore::new(pool);

    Ok(Arc::new(UserResolver::new(
        Arc::new(verifier),
        Arc::new(profiles),
    )))
}
