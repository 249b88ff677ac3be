use axum::{Router, routing::get};

use crate::api::v1::handlers::me::me;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
