//! Revocation store capability for blacklisted access tokens.
//!
//! The token lifecycle manager consults this store on every access-token
//! verification, so the interface is the narrow key/value surface a fast
//! external cache would provide: `get` and `set_with_ttl` with per-key
//! expiry. The store is injected as a trait object so verification logic
//! is testable against fakes and the process keeps working when the
//! backing cache is down (the manager treats store errors as "no entry").

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Error from the backing store. Callers log these and degrade; they are
/// never surfaced to API clients.
#[derive(Debug, thiserror::Error)]
#[error("revocation store unavailable: {0}")]
pub struct RevocationStoreError(pub String);

/// Narrow key/value capability with per-key expiry.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Fetch the value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, RevocationStoreError>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), RevocationStoreError>;
}

/// In-process implementation with lazy per-key expiry.
///
/// Suitable for single-process deployments and tests. Expired entries are
/// invisible to `get` immediately and physically removed on the next
/// write, which bounds the map to the number of revocations inside one
/// access-token lifetime.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    entries: Arc<RwLock<HashMap<String, (String, Instant)>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RevocationStoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), RevocationStoreError> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }
}
