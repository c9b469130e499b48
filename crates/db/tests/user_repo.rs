//! PostgreSQL-backed tests for [`PgUserRepo`].
//!
//! These need a live database (`DATABASE_URL`); run them with
//! `cargo test -p tollgate-db -- --ignored`.

use assert_matches::assert_matches;
use sqlx::PgPool;
use tollgate_db::models::user::CreateUser;
use tollgate_db::repositories::{PgUserRepo, RepoError, UserRepository};

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgUserRepo::new(pool);

    let created = repo.create(&new_user("a@x.com")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.email, "a@x.com");

    let by_email = repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "a@x.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_missing_user_is_none(pool: PgPool) {
    let repo = PgUserRepo::new(pool);

    assert!(repo.find_by_email("ghost@x.com").await.unwrap().is_none());
    assert!(repo.find_by_id(12345).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_duplicate_email_maps_to_duplicate(pool: PgPool) {
    let repo = PgUserRepo::new(pool);
    repo.create(&new_user("dup@x.com")).await.unwrap();

    let result = repo.create(&new_user("dup@x.com")).await;
    assert_matches!(result, Err(RepoError::Duplicate(c)) if c == "uq_users_email");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_ping(pool: PgPool) {
    let repo = PgUserRepo::new(pool);
    repo.ping().await.unwrap();
}
