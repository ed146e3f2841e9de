//! ProfileRepository port for profile persistence operations.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::profile::{Profile, SubscriptionUpdate};

/// Errors from the profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure; treated as transient by callers.
    #[error("database error: {0}")]
    Database(String),

    /// Stored row could not be mapped into a domain value.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

/// Result of applying a subscription update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A profile matched the customer id and was overwritten.
    Applied,
    /// No profile carries this customer id. Not a failure: checkout is
    /// expected to have written the customer id first, but events can arrive
    /// before that write settles or for customers created out-of-band.
    NoMatchingProfile,
}

/// Repository for profile records.
///
/// Implementations must make `apply_subscription_update` atomic per customer
/// id (a single conditional update) so concurrent deliveries for the same
/// customer cannot interleave partial field writes.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile by user id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Find the profile owning the given Stripe customer id.
    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Profile>, StoreError>;

    /// Record the Stripe customer id for a user (first checkout).
    async fn set_stripe_customer_id(
        &self,
        user_id: Uuid,
        customer_id: &str,
    ) -> Result<(), StoreError>;

    /// Overwrite the subscription fields of the profile keyed by the
    /// update's customer id. Pure last-write-wins; re-applying the same
    /// update is a no-op.
    async fn apply_subscription_update(
        &self,
        update: &SubscriptionUpdate,
    ) -> Result<SyncOutcome, StoreError>;
}
