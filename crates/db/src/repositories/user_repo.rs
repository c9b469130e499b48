//! Repository for the `users` table.

use async_trait::async_trait;
use sqlx::PgPool;
use tollgate_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, created_at, updated_at";

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors surfaced by a [`UserRepository`].
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A unique constraint rejected the write (carries the constraint name).
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage operations the authentication core depends on.
///
/// Lookups return `Ok(None)` when no row matches; `Err` is reserved for
/// storage failures.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email (case-sensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by internal ID.
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, RepoError>;

    /// Insert a new user, returning the created row.
    ///
    /// Fails with [`RepoError::Duplicate`] if the email is already taken.
    async fn create(&self, input: &CreateUser) -> Result<User, RepoError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepoError>;
}

/// [`UserRepository`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, input: &CreateUser) -> Result<User, RepoError> {
        let query = format!(
            "INSERT INTO users (email, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(classify_write_error)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

/// Turn unique-constraint violations into [`RepoError::Duplicate`].
fn classify_write_error(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            tracing::debug!(%constraint, "Insert rejected by unique constraint");
            return RepoError::Duplicate(constraint);
        }
    }
    RepoError::Database(err)
}
