//! Cache configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// In-process cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Default time-to-live for cached entries, in seconds
    #[serde(default = "default_ttl")]
    pub default_ttl_secs: u64,
}

impl CacheConfig {
    /// Get the default TTL as Duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl(),
        }
    }
}

// 1 hour
fn default_ttl() -> u64 {
    3600
}
