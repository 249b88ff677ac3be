//! Request authentication: resolve the bearer token to a user and stash the
//! result in request extensions for extractors downstream.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Apply request authentication to every route in the given router.
///
/// axum 0.8's `from_fn` cannot take a State extractor, so the state is passed
/// explicitly via `from_fn_with_state`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Missing header, rejected token, missing profile and upstream outage all
    // surface as the same 401; the resolver has already logged the cause.
    let Some(user) = state.resolver.resolve(req.headers()).await else {
        return Err(AppError::Unauthorized);
    };

    tracing::debug!(user_id = %user.user_id(), "request authenticated");

    // middleware → extractor hand-off
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::v1::handlers::me::me;
    use crate::repos::error::RepoResult;
    use crate::repos::profile_store::{ProfileRecord, ProfileStore};
    use crate::services::auth::resolver::UserResolver;
    use crate::services::auth::verifier::{
        Identity, TokenVerifier, VerifyError, VerifyResult,
    };

    struct StaticVerifier {
        accept: bool,
    }

    #[async_trait]
    impl TokenVerifier for StaticVerifier {
        async fn verify(&self, _token: &str) -> VerifyResult {
            if self.accept {
                Ok(Identity {
                    id: "u1".to_string(),
                    extra: serde_json::Map::new(),
                })
            } else {
                Err(VerifyError::Rejected)
            }
        }
    }

    struct StaticStore;

    #[async_trait]
    impl ProfileStore for StaticStore {
        async fn fetch_by_id(&self, id: &str) -> RepoResult<Option<ProfileRecord>> {
            let value = serde_json::json!({"id": id, "name": "Alice"});
            match value {
                serde_json::Value::Object(fields) => Ok(Some(ProfileRecord(fields))),
                _ => unreachable!(),
            }
        }
    }

    fn app(accept: bool) -> Router {
        let resolver = Arc::new(UserResolver::new(
            Arc::new(StaticVerifier { accept }),
            Arc::new(StaticStore),
        ));
        let state = AppState::new(resolver);

        let routes = Router::new().route("/me", get(me));
        apply(routes, state.clone()).with_state(state)
    }

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn unauthenticated_requests_get_401() {
        let response = app(true).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejected_tokens_get_401() {
        let response = app(false)
            .oneshot(request(Some("Bearer nope")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn resolved_user_reaches_the_handler() {
        let response = app(true)
            .oneshot(request(Some("Bearer tok")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["name"], "Alice");
        assert_eq!(body["authUser"]["id"], "u1");
    }
}
