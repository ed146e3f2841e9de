//! PaymentProvider port - the slice of the Stripe API this service calls.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::pricing::PricingPlan;

/// Errors from the payment provider API.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The provider returned a non-success response.
    #[error("payment API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider could not be reached.
    #[error("payment API unreachable: {0}")]
    Network(String),

    /// The provider's response could not be decoded.
    #[error("unexpected payment API response: {0}")]
    Decode(String),
}

/// A payment-provider customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Provider customer id (cus_xxx).
    pub id: String,
    /// Email the customer was created with.
    pub email: String,
}

/// Request to start a subscription checkout.
#[derive(Debug, Clone)]
pub struct CreateCheckoutRequest {
    /// Provider customer id.
    pub customer_id: String,
    /// Price to subscribe to.
    pub price_id: String,
    /// Where the provider redirects after successful payment.
    pub success_url: String,
    /// Where the provider redirects on cancel.
    pub cancel_url: String,
}

/// A hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Session id (cs_xxx).
    pub id: String,
    /// Hosted checkout URL to redirect the user to.
    pub url: String,
}

/// Payment provider operations used by checkout and the pricing read path.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer for the given email.
    async fn create_customer(&self, email: &str) -> Result<Customer, PaymentError>;

    /// Create a subscription-mode checkout session.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// List active prices with their product details.
    async fn list_prices(&self) -> Result<Vec<PricingPlan>, PaymentError>;
}
