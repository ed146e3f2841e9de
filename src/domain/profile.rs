//! User profile and subscription state.
//!
//! A profile's subscription fields mirror the most recently received
//! subscription event for its Stripe customer, not necessarily the most
//! recently occurred one: deliveries are applied in arrival order and the
//! last write wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::webhook::{StripeEvent, WebhookError};

/// Durable user profile record.
///
/// The id is the application's user identifier; `stripe_customer_id` is
/// assigned on first checkout and unique when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Opaque user identifier (primary key).
    pub id: Uuid,

    /// Application role (e.g. "user", "admin").
    pub role: String,

    /// Stripe customer identifier; set on first checkout.
    pub stripe_customer_id: Option<String>,

    /// Stripe subscription identifier; overwritten on every lifecycle event.
    pub subscription_id: Option<String>,

    /// Subscription status as reported by Stripe.
    pub subscription_status: Option<SubscriptionStatus>,

    /// End of the current billing period.
    pub current_period_end: Option<DateTime<Utc>>,
}

impl Profile {
    /// True when the subscription grants access to paid features.
    pub fn grants_access(&self) -> bool {
        matches!(
            self.subscription_status,
            Some(SubscriptionStatus::Active) | Some(SubscriptionStatus::Trialing)
        )
    }
}

/// Subscription status reported by Stripe.
///
/// Stripe defines this as an open string enumeration; unrecognized values
/// are preserved verbatim in `Other` rather than rejected, so new statuses
/// on Stripe's side never break reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Unpaid,
    Incomplete,
    IncompleteExpired,
    Paused,
    Other(String),
}

impl SubscriptionStatus {
    /// Parse from the Stripe wire string.
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "trialing" => Self::Trialing,
            "past_due" => Self::PastDue,
            "canceled" => Self::Canceled,
            "unpaid" => Self::Unpaid,
            "incomplete" => Self::Incomplete,
            "incomplete_expired" => Self::IncompleteExpired,
            "paused" => Self::Paused,
            other => Self::Other(other.to_string()),
        }
    }

    /// The Stripe wire string for this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Paused => "paused",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for SubscriptionStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The field set a subscription lifecycle event writes onto a profile.
///
/// Extracted from a verified event and applied as a pure overwrite keyed by
/// `customer_id` — re-applying the same update is a no-op by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    /// Stripe customer the subscription belongs to.
    pub customer_id: String,
    /// Stripe subscription identifier.
    pub subscription_id: String,
    /// New subscription status.
    pub status: SubscriptionStatus,
    /// End of the current billing period.
    pub current_period_end: DateTime<Utc>,
}

impl SubscriptionUpdate {
    /// Extracts the update from a verified subscription lifecycle event.
    ///
    /// Deleted events carry the terminal status (`canceled`) in the same
    /// field; there is no separate tombstone.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MissingField` when the event object lacks a
    /// required field, or `ParseError` when `current_period_end` is not a
    /// representable timestamp.
    pub fn from_event(event: &StripeEvent) -> Result<Self, WebhookError> {
        let object = &event.data.object;

        let subscription_id = object
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or(WebhookError::MissingField("id"))?;

        let customer_id = object
            .get("customer")
            .and_then(|v| v.as_str())
            .ok_or(WebhookError::MissingField("customer"))?;

        let status = object
            .get("status")
            .and_then(|v| v.as_str())
            .ok_or(WebhookError::MissingField("status"))?;

        let period_end_secs = object
            .get("current_period_end")
            .and_then(|v| v.as_i64())
            .ok_or(WebhookError::MissingField("current_period_end"))?;

        let current_period_end = DateTime::from_timestamp(period_end_secs, 0).ok_or_else(|| {
            WebhookError::ParseError(format!(
                "current_period_end out of range: {}",
                period_end_secs
            ))
        })?;

        Ok(Self {
            customer_id: customer_id.to_string(),
            subscription_id: subscription_id.to_string(),
            status: SubscriptionStatus::parse(status),
            current_period_end,
        })
    }
}
