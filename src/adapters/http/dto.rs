//! Request and response DTOs for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::domain::pricing::PricingPlan;

/// Acknowledgment body for webhook deliveries.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}

/// Error body returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Request body for starting a checkout.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Email used if a Stripe customer must be created for this user.
    pub email: String,
    /// Selected price id.
    pub price_id: String,
    /// Redirect target after successful payment.
    pub success_url: String,
    /// Redirect target on cancel.
    pub cancel_url: String,
}

/// Response body for a started checkout.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

/// Response body for the pricing catalog.
#[derive(Debug, Serialize, Deserialize)]
pub struct PricingResponse {
    pub plans: Vec<PricingPlan>,
}
