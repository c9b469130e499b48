pub mod auth;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/sign-up                 sign up (public)
/// /auth/sign-in                 sign in (public)
/// /auth/sign-out                sign out (bearer token)
///
/// /protected/user-info          identity attached by the guard
///
/// /users/{id}                   user lookup (bearer token)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (sign-up, sign-in, sign-out).
        .nest("/auth", auth::router())
        // Guarded routes.
        .nest("/protected", user::protected_router())
        .nest("/users", user::router())
}
