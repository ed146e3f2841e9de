//! KeyValueCache port - expiring key/value storage for the application.
//!
//! The in-process implementation backs a single-server deployment; the
//! interface (string keys, JSON values, per-entry TTL) maps directly onto an
//! external shared cache service, so swapping one in is transparent to
//! callers. Operations are fallible for that reason even though the
//! in-memory adapter cannot fail.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from the cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Backend failure (only reachable with an external cache backend).
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Expiring key-value cache.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Store a value under `key`, overwriting any existing entry
    /// unconditionally. `ttl` defaults to the configured cache TTL.
    async fn set(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    /// Fetch the value under `key`. An entry past its expiry is treated as
    /// absent (and removed); there is no background sweeper.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;

    /// Remove the entry under `key`. Removing a missing key is a no-op, not
    /// an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
