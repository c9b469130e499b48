//! In-process [`UserRepository`] used by tests and database-less runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tollgate_core::types::DbId;

use super::user_repo::{RepoError, UserRepository};
use crate::models::user::{CreateUser, User};

/// Constraint name reported on duplicate emails, matching the SQL schema.
const EMAIL_CONSTRAINT: &str = "uq_users_email";

#[derive(Default)]
struct Inner {
    users: BTreeMap<DbId, User>,
    last_id: DbId,
}

/// Users held in memory. IDs start at 1 and increase monotonically, like a
/// `BIGSERIAL` column.
#[derive(Default)]
pub struct MemoryUserRepo {
    inner: RwLock<Inner>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, RepoError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create(&self, input: &CreateUser) -> Result<User, RepoError> {
        // Check and insert under one write lock so the uniqueness rule holds
        // the same way the database constraint does.
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == input.email) {
            return Err(RepoError::Duplicate(EMAIL_CONSTRAINT.to_string()));
        }

        inner.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.last_id,
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
