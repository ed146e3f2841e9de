//! SubscriptionReconciler - applies verified subscription lifecycle events
//! to the profile store.
//!
//! Reconciliation is an overwrite of the profile's subscription fields with
//! the values carried by the most recently received event, keyed by the
//! Stripe customer id. No deltas, no counters: re-applying an event is
//! harmless and delivery order is not enforced (last write wins).

use std::sync::Arc;

use crate::domain::profile::SubscriptionUpdate;
use crate::domain::webhook::{StripeEvent, WebhookError};
use crate::ports::{ProfileRepository, StoreError, SyncOutcome};

/// Outcome of reconciling one subscription event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileResult {
    /// Stripe customer the event referenced.
    pub customer_id: String,
    /// Whether a profile row was actually written.
    pub outcome: SyncOutcome,
}

/// Applies subscription lifecycle events to profiles.
pub struct SubscriptionReconciler {
    profiles: Arc<dyn ProfileRepository>,
}

impl SubscriptionReconciler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Reconcile a verified `customer.subscription.*` event.
    ///
    /// A missing profile for the referenced customer is a consistency gap,
    /// not a failure: checkout should have written the customer id already,
    /// but the event may outrun that write or reference a customer created
    /// out-of-band. The gap is logged and the event acknowledged so the
    /// issuer does not redeliver something retrying cannot fix.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MissingField`/`ParseError` for malformed event
    /// payloads and `WebhookError::Database` for store failures (retryable).
    pub async fn reconcile(&self, event: &StripeEvent) -> Result<ReconcileResult, WebhookError> {
        let update = SubscriptionUpdate::from_event(event)?;

        let outcome = self.profiles.apply_subscription_update(&update).await?;

        match outcome {
            SyncOutcome::Applied => {
                tracing::info!(
                    customer_id = %update.customer_id,
                    subscription_id = %update.subscription_id,
                    status = %update.status,
                    "applied subscription state"
                );
            }
            SyncOutcome::NoMatchingProfile => {
                tracing::warn!(
                    customer_id = %update.customer_id,
                    event_id = %event.id,
                    "no profile for customer, acknowledging without update"
                );
            }
        }

        Ok(ReconcileResult {
            customer_id: update.customer_id,
            outcome,
        })
    }
}

impl From<StoreError> for WebhookError {
    fn from(err: StoreError) -> Self {
        WebhookError::Database(err.to_string())
    }
}
