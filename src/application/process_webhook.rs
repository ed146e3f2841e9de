//! ProcessWebhookHandler - the webhook entry point.
//!
//! One pipeline for every inbound Stripe event: verify the signature (fail
//! fast, nothing else runs on a rejected payload), route by event type to
//! the subscription reconciler or the catalog invalidation trigger, and
//! acknowledge. Unmatched event types are logged and acknowledged — the
//! issuer retries on any non-success response, so refusing events we simply
//! do not handle would cause endless redelivery.

use crate::domain::webhook::{StripeEvent, StripeWebhookVerifier, WebhookError};

use super::invalidate_catalog::InvalidateCatalogHandler;
use super::reconcile_subscription::{ReconcileResult, SubscriptionReconciler};

/// Command to process a raw webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    /// Exact raw request body bytes (the signature is computed over these).
    pub payload: Vec<u8>,
    /// Stripe-Signature header value.
    pub signature: String,
}

/// Result of processing a verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessWebhookResult {
    /// A subscription lifecycle event was reconciled.
    SubscriptionSynced(ReconcileResult),
    /// A catalog change invalidated the pricing cache.
    CatalogInvalidated,
    /// The event type is not handled; acknowledged without side effects.
    Ignored {
        /// The raw event type string, for the operator log.
        event_type: String,
    },
}

/// Verifies and dispatches inbound Stripe webhook events.
pub struct ProcessWebhookHandler {
    verifier: StripeWebhookVerifier,
    reconciler: SubscriptionReconciler,
    invalidator: InvalidateCatalogHandler,
}

impl ProcessWebhookHandler {
    pub fn new(
        verifier: StripeWebhookVerifier,
        reconciler: SubscriptionReconciler,
        invalidator: InvalidateCatalogHandler,
    ) -> Self {
        Self {
            verifier,
            reconciler,
            invalidator,
        }
    }

    /// Process one webhook delivery.
    ///
    /// # Errors
    ///
    /// Verification and payload errors reject the delivery (client error, no
    /// retry); store/cache failures surface as retryable server errors. A
    /// successful return means the event was received and either handled or
    /// intentionally ignored — not that downstream state is fully consistent.
    pub async fn handle(
        &self,
        cmd: ProcessWebhookCommand,
    ) -> Result<ProcessWebhookResult, WebhookError> {
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &cmd.signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "webhook rejected");
                e
            })?;

        self.dispatch(&event).await
    }

    async fn dispatch(&self, event: &StripeEvent) -> Result<ProcessWebhookResult, WebhookError> {
        let event_type = event.parsed_type();

        if event_type.is_subscription_lifecycle() {
            let result = self.reconciler.reconcile(event).await?;
            return Ok(ProcessWebhookResult::SubscriptionSynced(result));
        }

        if event_type.is_catalog_change() {
            self.invalidator.handle().await?;
            return Ok(ProcessWebhookResult::CatalogInvalidated);
        }

        tracing::debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            "unhandled webhook event type"
        );
        Ok(ProcessWebhookResult::Ignored {
            event_type: event.event_type.clone(),
        })
    }
}
