//! GetPricingHandler - serves the pricing catalog through the cache.
//!
//! The cache is advisory: a miss (or an unreadable entry) falls through to
//! the Stripe API and repopulates the key with the configured default TTL.
//! Invalidation happens elsewhere, driven by catalog-change webhooks.

use std::sync::Arc;

use crate::domain::pricing::{PricingPlan, PRICING_DATA_KEY};
use crate::ports::{KeyValueCache, PaymentError, PaymentProvider};

/// Serves pricing plans, cache-first.
pub struct GetPricingHandler {
    cache: Arc<dyn KeyValueCache>,
    payments: Arc<dyn PaymentProvider>,
}

impl GetPricingHandler {
    pub fn new(cache: Arc<dyn KeyValueCache>, payments: Arc<dyn PaymentProvider>) -> Self {
        Self { cache, payments }
    }

    /// Return the current catalog.
    ///
    /// Cache failures are logged and treated as misses; a populated answer
    /// from the payment API is always preferred over failing the read.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` only when the catalog must be fetched and the
    /// payment API call fails.
    pub async fn handle(&self) -> Result<Vec<PricingPlan>, PaymentError> {
        match self.cache.get(PRICING_DATA_KEY).await {
            Ok(Some(value)) => match serde_json::from_value::<Vec<PricingPlan>>(value) {
                Ok(plans) => return Ok(plans),
                Err(e) => {
                    tracing::warn!(error = %e, "cached pricing data unreadable, refetching");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "pricing cache read failed, falling back to API");
            }
        }

        let plans = self.payments.list_prices().await?;

        match serde_json::to_value(&plans) {
            Ok(value) => {
                if let Err(e) = self.cache.set(PRICING_DATA_KEY, value, None).await {
                    tracing::warn!(error = %e, "failed to populate pricing cache");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize pricing data for cache");
            }
        }

        Ok(plans)
    }
}
