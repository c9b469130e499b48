//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tollgate_core::types::DbId;

use crate::auth::guard::GuardError;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated identity extracted from a Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The email the token was issued to.
    pub email: String,
}

/// Read the `Authorization` header as text. A value that is not visible
/// ASCII cannot be a bearer token.
pub fn authorization_header(headers: &HeaderMap) -> Result<Option<&str>, GuardError> {
    headers
        .get(AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| GuardError::MalformedAuth))
        .transpose()
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = authorization_header(&parts.headers)?;
        let claims = state.guard.authorize(header).await?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
