//! Stripe API client.
//!
//! Implements the `PaymentProvider` port against the Stripe REST API
//! (form-encoded requests, basic auth with the secret key). Webhook
//! signature verification does NOT live here — the domain verifier is the
//! single authority for that, configured from the one webhook secret.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::pricing::PricingPlan;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, Customer, PaymentError, PaymentProvider,
};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripeClient {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeClient {
    /// Create a new Stripe client with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Check a response status, draining the error body on failure.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error_text, "Stripe API call failed");
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }
        Ok(response)
    }
}

// Wire types for the slice of Stripe responses we read.

#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutSession {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripePriceList {
    data: Vec<StripePrice>,
}

#[derive(Debug, Deserialize)]
struct StripePrice {
    id: String,
    unit_amount: Option<i64>,
    currency: String,
    recurring: Option<StripeRecurring>,
    product: StripeProduct,
}

#[derive(Debug, Deserialize)]
struct StripeRecurring {
    interval: String,
}

#[derive(Debug, Deserialize)]
struct StripeProduct {
    name: String,
    description: Option<String>,
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_customer(&self, email: &str) -> Result<Customer, PaymentError> {
        let url = format!("{}/v1/customers", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&[("email", email)])
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let customer: StripeCustomer = response
            .json()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))?;

        Ok(Customer {
            id: customer.id,
            email: customer.email.unwrap_or_else(|| email.to_string()),
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let params = [
            ("mode", "subscription"),
            ("customer", &request.customer_id),
            ("line_items[0][price]", &request.price_id),
            ("line_items[0][quantity]", "1"),
            ("payment_method_types[0]", "card"),
            ("success_url", &request.success_url),
            ("cancel_url", &request.cancel_url),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let session: StripeCheckoutSession = response
            .json()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Decode("checkout session has no URL".to_string()))?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn list_prices(&self) -> Result<Vec<PricingPlan>, PaymentError> {
        let url = format!(
            "{}/v1/prices?active=true&expand[]=data.product",
            self.config.api_base_url
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let prices: StripePriceList = response
            .json()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))?;

        Ok(prices
            .data
            .into_iter()
            .map(|price| PricingPlan {
                price_id: price.id,
                product_name: price.product.name,
                unit_amount: price.unit_amount,
                interval: price.recurring.map(|r| r.interval),
                currency: price.currency,
                description: price.product.description,
            })
            .collect())
    }
}
