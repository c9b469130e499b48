//! Handlers for the `/auth` resource (sign-up, sign-in, sign-out).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tollgate_core::credentials::{
    validate_email, validate_password_confirmation, validate_password_strength,
    MIN_PASSWORD_LENGTH,
};
use tollgate_core::error::CoreError;
use tollgate_db::models::user::UserResponse;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::authorization_header;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-up`.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Request body for `POST /auth/sign-in`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Successful sign-in response.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/sign-up
///
/// Register an account. Returns the created user with 201 Created.
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let input = parse_body(payload)?;

    validate_email(&input.email)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)?;
    validate_password_confirmation(&input.password, &input.password_confirmation)?;

    let user = state.auth.sign_up(&input.email, &input.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/sign-in
///
/// Exchange email + password for a bearer token.
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AppResult<Json<SignInResponse>> {
    let input = parse_body(payload)?;

    validate_email(&input.email)?;
    if input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Password is required".into(),
        )));
    }

    let token = state.auth.sign_in(&input.email, &input.password).await?;

    Ok(Json(SignInResponse {
        token,
        token_type: "Bearer",
        expires_in: state.auth.token_validity().num_seconds(),
    }))
}

/// POST /api/v1/auth/sign-out
///
/// Revoke the presented token for the rest of its lifetime.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<MessageResponse>> {
    let header = authorization_header(&headers)?;
    state.guard.sign_out(header).await?;

    Ok(Json(MessageResponse {
        message: "Successfully signed out",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Turn axum's JSON rejection (bad syntax, missing fields, wrong content
/// type) into a 400 with the project's error envelope.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
