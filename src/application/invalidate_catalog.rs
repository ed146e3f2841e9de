//! InvalidateCatalogHandler - marks the cached pricing catalog stale.
//!
//! Catalog-change events (product/price created or updated) delete the
//! well-known cache key. The pricing read path repopulates it on its next
//! miss; this trigger only signals staleness and knows nothing about how or
//! when the value is recomputed.

use std::sync::Arc;

use crate::domain::pricing::PRICING_DATA_KEY;
use crate::domain::webhook::WebhookError;
use crate::ports::{CacheError, KeyValueCache};

/// Deletes the pricing catalog cache entry.
pub struct InvalidateCatalogHandler {
    cache: Arc<dyn KeyValueCache>,
}

impl InvalidateCatalogHandler {
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self { cache }
    }

    /// Drop the catalog key. A key that was never populated is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Cache` only for backend failures (retryable).
    pub async fn handle(&self) -> Result<(), WebhookError> {
        self.cache.delete(PRICING_DATA_KEY).await?;
        tracing::debug!(key = PRICING_DATA_KEY, "pricing catalog cache invalidated");
        Ok(())
    }
}

impl From<CacheError> for WebhookError {
    fn from(err: CacheError) -> Self {
        WebhookError::Cache(err.to_string())
    }
}
