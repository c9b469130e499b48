//! Request-time access gate.
//!
//! Every protected request walks the same states, ending in Accept or Reject:
//!
//! ```text
//! header present? --no--> MissingAuth
//!       | yes
//! "Bearer <token>"? --no--> MalformedAuth
//!       | yes
//! revoked? --yes--> Revoked
//!       | no
//! signature + expiry ok? --no--> Unauthenticated
//!       | yes
//!    Accept(claims)
//! ```
//!
//! Sign-out skips the revocation check and ends by writing a revocation entry
//! that lives for the token's remaining validity.

use std::sync::Arc;

use chrono::Utc;

use super::jwt::{Claims, TokenError, TokenIssuer};
use super::revocation::{RevocationStore, StoreError};

const BEARER_PREFIX: &str = "Bearer ";

/// Why the guard turned a request away.
///
/// Every variant except [`GuardError::Store`] is reported to clients as the
/// same 401; the variant itself is only logged.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Authorization header is missing")]
    MissingAuth,

    #[error("Authorization header is not of the form 'Bearer <token>'")]
    MalformedAuth,

    #[error("token has been revoked")]
    Revoked,

    #[error("token rejected: {0}")]
    Unauthenticated(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, GuardError> {
    let header = header.ok_or(GuardError::MissingAuth)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(GuardError::MalformedAuth)?;
    if token.is_empty() {
        return Err(GuardError::MalformedAuth);
    }
    Ok(token)
}

pub struct AccessGuard {
    tokens: Arc<TokenIssuer>,
    revocations: Arc<dyn RevocationStore>,
}

impl AccessGuard {
    pub fn new(tokens: Arc<TokenIssuer>, revocations: Arc<dyn RevocationStore>) -> Self {
        Self {
            tokens,
            revocations,
        }
    }

    /// Decide whether a request carrying `header` may proceed.
    ///
    /// Revocation is checked before the signature, so a revoked token is
    /// refused even while it would still verify.
    pub async fn authorize(&self, header: Option<&str>) -> Result<Claims, GuardError> {
        let token = bearer_token(header)?;

        if self.revocations.is_revoked(token).await? {
            return Err(GuardError::Revoked);
        }

        Ok(self.tokens.verify(token)?)
    }

    /// Revoke the token carried by `header` for the rest of its lifetime.
    ///
    /// Only a currently valid token is revoked; anything else fails the same
    /// way [`authorize`](Self::authorize) would.
    pub async fn sign_out(&self, header: Option<&str>) -> Result<Claims, GuardError> {
        let token = bearer_token(header)?;
        let claims = self.tokens.verify(token)?;

        if let Some(remaining) = claims.remaining_ttl(Utc::now()) {
            self.revocations.revoke(token, remaining).await?;
        }

        tracing::info!(user_id = claims.sub, "User signed out");
        Ok(claims)
    }
}
