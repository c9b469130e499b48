//! Handlers for identity lookups behind the access guard.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tollgate_core::types::DbId;
use tollgate_db::models::user::UserResponse;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Identity attached to the request by the guard.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub user_id: DbId,
    pub email: String,
}

/// GET /api/v1/protected/user-info
pub async fn user_info(user: AuthUser) -> Json<DataResponse<UserInfo>> {
    Json(DataResponse {
        data: UserInfo {
            user_id: user.user_id,
            email: user.email,
        },
    })
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state.auth.find_user(id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}
