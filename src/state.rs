use std::sync::Arc;

use crate::services::auth::resolver::UserResolver;

/// Shared context attached to the Router.
///
/// Cloned per request; contents are Arc-backed and cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<UserResolver>,
}

impl AppState {
    pub fn new(resolver: Arc<UserResolver>) -> Self {
        Self { resolver }
    }
}
