//! Webhook domain: event envelope, signature verification, error taxonomy.

mod error;
mod event;
mod verifier;

pub use error::WebhookError;
pub use event::{StripeEvent, StripeEventData, StripeEventType};
pub use verifier::{SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use event::StripeEventBuilder;
#[cfg(test)]
pub use verifier::compute_test_signature;
