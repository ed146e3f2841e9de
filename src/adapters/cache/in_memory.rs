//! In-memory cache implementation.
//!
//! A process-wide table with per-entry absolute expiry. Expiry is lazy:
//! entries are checked (and removed) on read, never by a background sweeper.
//! There is no size bound beyond TTL; the cached data is small and bounded
//! (one catalog snapshot). Not suitable for multi-server deployments — the
//! [`KeyValueCache`] port exists so an external cache can replace this
//! without touching callers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::ports::{CacheError, KeyValueCache};

/// One cached value with its absolute expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: serde_json::Value,
    expiry: Instant,
}

/// In-memory TTL cache for single-server deployments.
///
/// Constructed once at startup and passed explicitly to the components that
/// populate and invalidate it — no ambient global state.
#[derive(Debug)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl InMemoryCache {
    /// Create a cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    /// Create a cache with the standard 1 hour default TTL.
    pub fn with_defaults() -> Self {
        Self::new(Duration::from_secs(3600))
    }

    /// Number of entries currently stored, including not-yet-collected
    /// expired ones.
    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl KeyValueCache for InMemoryCache {
    async fn set(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry {
            data: value,
            expiry: Instant::now() + ttl,
        };

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if Instant::now() <= entry.expiry => {
                    return Ok(Some(entry.data.clone()));
                }
                Some(_) => {}
            }
        }

        // Entry exists but is expired: collect it under the write lock.
        // Re-check the expiry in case a concurrent set refreshed the key
        // between the two locks.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if Instant::now() <= entry.expiry {
                return Ok(Some(entry.data.clone()));
            }
            entries.remove(key);
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}
