//! Revocation store: tokens explicitly invalidated before their natural expiry.
//!
//! An entry lives exactly as long as the token it revokes would have, so the
//! store never needs manual cleanup for correctness. [`RevocationSweeper`]
//! only reclaims memory held by entries nobody asks about again.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Failure of the backing store. Surfaces as a 500, never as a 401.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("revocation store unavailable: {0}")]
    Unavailable(String),
}

/// Time-expiring set of revoked tokens.
///
/// Absence of an entry means "not known to be revoked", not "valid"; validity
/// is decided by the token verifier. Implementations must tolerate concurrent
/// calls from any number of requests. No ordering is promised between a
/// `revoke` and an `is_revoked` racing on the same token.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `token` as revoked for `remaining_ttl`. A zero TTL is a no-op.
    async fn revoke(&self, token: &str, remaining_ttl: Duration) -> Result<(), StoreError>;

    /// Whether `token` currently has a live revocation entry.
    async fn is_revoked(&self, token: &str) -> Result<bool, StoreError>;
}

/// SHA-256 hex digest used as the map key, so raw bearer tokens are never
/// held in memory after the request that presented them.
fn token_key(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-process [`RevocationStore`] over a sharded concurrent map.
///
/// Each entry maps a token digest to the instant it stops mattering. Expired
/// entries read as absent and are evicted on access or by
/// [`purge_expired`](Self::purge_expired).
#[derive(Default)]
pub struct MemoryRevocationStore {
    entries: DashMap<String, Instant>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, token: &str, remaining_ttl: Duration) -> Result<(), StoreError> {
        if remaining_ttl.is_zero() {
            tracing::debug!("Skipping revocation of an already expired token");
            return Ok(());
        }

        let expires_at = Instant::now() + remaining_ttl;
        self.entries.insert(token_key(token), expires_at);
        tracing::debug!(ttl_secs = remaining_ttl.as_secs(), "Token revoked");
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, StoreError> {
        let key = token_key(token);
        let now = Instant::now();

        // Copy the instant out so the shard guard is released before any removal.
        let expires_at = self.entries.get(&key).map(|entry| *entry.value());
        match expires_at {
            Some(expires_at) if expires_at > now => Ok(true),
            Some(_) => {
                self.entries.remove_if(&key, |_, expires_at| *expires_at <= now);
                Ok(false)
            }
            None => Ok(false),
        }
    }
}

/// Background task that periodically purges expired revocation entries.
pub struct RevocationSweeper {
    store: Arc<MemoryRevocationStore>,
    interval: Duration,
}

impl RevocationSweeper {
    pub fn new(store: Arc<MemoryRevocationStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run the sweep loop until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Revocation sweeper cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let purged = self.store.purge_expired();
                    if purged > 0 {
                        tracing::debug!(purged, remaining = self.store.len(), "Purged expired revocations");
                    }
                }
            }
        }
    }
}
