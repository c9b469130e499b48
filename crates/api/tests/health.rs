//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use tollgate_api::auth::revocation::MemoryRevocationStore;
use tollgate_core::types::DbId;
use tollgate_db::models::user::{CreateUser, User};
use tollgate_db::repositories::{RepoError, UserRepository};

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = build_test_app();
    let response = get(app.router, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

/// A user store whose every call fails.
struct DownRepo;

#[async_trait]
impl UserRepository for DownRepo {
    async fn find_by_email(&self, _: &str) -> Result<Option<User>, RepoError> {
        Err(RepoError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _: DbId) -> Result<Option<User>, RepoError> {
        Err(RepoError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _: &CreateUser) -> Result<User, RepoError> {
        Err(RepoError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Err(RepoError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn health_check_reports_degraded_store() {
    let app = common::build_app_with(Arc::new(DownRepo), Arc::new(MemoryRevocationStore::new()));
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(app.router, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app();
    let response = get(app.router, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header should be set");
    assert!(!request_id.is_empty());
}
