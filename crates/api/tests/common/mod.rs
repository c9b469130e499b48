#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tollgate_api::auth::jwt::JwtConfig;
use tollgate_api::auth::revocation::{MemoryRevocationStore, RevocationStore};
use tollgate_api::config::ServerConfig;
use tollgate_api::router::build_app_router;
use tollgate_api::state::AppState;
use tollgate_db::repositories::{MemoryUserRepo, UserRepository};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        revocation_sweep_secs: 60,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiry_hours: 24,
        },
    }
}

/// Handles into the app's collaborators so tests can inspect them.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserRepo>,
    pub revocations: Arc<MemoryRevocationStore>,
}

/// Build the full application router over in-memory collaborators.
pub fn build_test_app() -> TestApp {
    let users = Arc::new(MemoryUserRepo::new());
    let revocations = Arc::new(MemoryRevocationStore::new());
    let router = build_app_with(Arc::clone(&users) as _, Arc::clone(&revocations) as _);
    TestApp {
        router,
        users,
        revocations,
    }
}

/// Build the full application router over arbitrary collaborators.
pub fn build_app_with(
    users: Arc<dyn UserRepository>,
    revocations: Arc<dyn RevocationStore>,
) -> Router {
    let config = test_config();
    let state = AppState::new(&config, users, revocations);
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, None, Some(&format!("Bearer {token}"))).await
}

/// GET with a raw `Authorization` header value.
pub async fn get_with_authorization(app: Router, uri: &str, authorization: &str) -> Response {
    send(app, Method::GET, uri, None, Some(authorization)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body.to_string()), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Some(body.to_string()),
        Some(&format!("Bearer {token}")),
    )
    .await
}

/// POST a raw string body with a JSON content type.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response {
    send(app, Method::POST, uri, Some(body.to_string()), None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<String>,
    authorization: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json)
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Sign up through the API with a matching confirmation.
pub async fn sign_up(app: Router, email: &str, password: &str) -> Response {
    let body = serde_json::json!({
        "email": email,
        "password": password,
        "password_confirmation": password,
    });
    post_json(app, "/api/v1/auth/sign-up", body).await
}

/// Sign in through the API and return the token, asserting success.
pub async fn sign_in_token(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/sign-in", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}
