//! Sign-up and sign-in orchestration.
//!
//! [`AuthService`] owns no state of its own: persistence goes through a
//! [`UserRepository`] and tokens through a [`TokenIssuer`], both handed in at
//! construction.

use std::sync::Arc;

use tollgate_core::types::DbId;
use tollgate_db::models::user::{CreateUser, User};
use tollgate_db::repositories::{RepoError, UserRepository};

use super::jwt::{TokenError, TokenIssuer};
use super::password::{hash_password, verify_password};

/// A well-formed Argon2id hash that matches no password. Verified against when
/// the email is unknown so both sign-in failure paths cost the same time.
const TIMING_EQUALIZER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email is already registered")]
    DuplicateEmail,

    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User {0} not found")]
    UserNotFound(DbId),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Repository(RepoError),
}

impl From<RepoError> for AuthError {
    fn from(err: RepoError) -> Self {
        match err {
            // Only `create` raises this, and email is the only unique column.
            RepoError::Duplicate(_) => Self::DuplicateEmail,
            other => Self::Repository(other),
        }
    }
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenIssuer>) -> Self {
        Self { users, tokens }
    }

    /// Register a new account.
    ///
    /// The lookup before insert only saves an Argon2 round for the common
    /// duplicate case. Two concurrent sign-ups with one email can both pass
    /// it; the storage-level unique constraint decides, and the loser still
    /// gets [`AuthError::DuplicateEmail`].
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_blocking(password.to_owned()).await?;
        let user = self
            .users
            .create(&CreateUser {
                email: email.to_owned(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User signed up");
        Ok(user)
    }

    /// Check credentials and issue a token bound to the user's id and email.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self.users.find_by_email(email).await?;

        let stored_hash = user
            .as_ref()
            .map_or(TIMING_EQUALIZER_HASH, |u| u.password_hash.as_str())
            .to_owned();
        let password_ok = verify_blocking(password.to_owned(), stored_hash).await?;

        let user = match user {
            Some(user) if password_ok => user,
            _ => {
                tracing::debug!("Sign-in rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(user.id, &user.email)?;
        tracing::info!(user_id = user.id, "User signed in");
        Ok(token)
    }

    /// Lifetime of the tokens `sign_in` hands out.
    pub fn token_validity(&self) -> chrono::Duration {
        self.tokens.validity()
    }

    /// Fetch a user by id.
    pub async fn find_user(&self, id: DbId) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound(id))
    }
}

/// Argon2 is deliberately slow; keep it off the async worker threads.
async fn hash_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))
}
