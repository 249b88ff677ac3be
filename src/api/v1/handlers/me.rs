use axum::Json;

use crate::api::v1::extractors::CurrentUser;
use crate::services::auth::resolver::ResolvedUser;

/// Return the caller's merged profile + identity.
///
/// The body is the profile row's fields verbatim with the raw identity under
/// `authUser`; nothing is renamed or filtered here.
pub async fn me(user: CurrentUser) -> Json<ResolvedUser> {
    Json(user.into_inner())
}
