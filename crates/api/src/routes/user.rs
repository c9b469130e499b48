//! Route definitions for guarded identity lookups.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/protected`.
///
/// ```text
/// GET /user-info   -> user_info
/// ```
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/user-info", get(user::user_info))
}

/// Routes mounted at `/users`.
///
/// ```text
/// GET /{id}        -> get_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(user::get_user))
}
