//! CreateCheckoutHandler - starts a subscription checkout for a user.
//!
//! The first checkout for a user creates a Stripe customer and persists its
//! id on the profile; subscription webhooks later key off that id, so this
//! write must land before the hosted checkout can complete.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::ports::{
    CreateCheckoutRequest, PaymentError, PaymentProvider, ProfileRepository, StoreError,
};

/// Command to start a checkout.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    /// Authenticated user starting the checkout.
    pub user_id: Uuid,
    /// Email used if a Stripe customer must be created.
    pub email: String,
    /// Price the user selected.
    pub price_id: String,
    /// Redirect target after successful payment.
    pub success_url: String,
    /// Redirect target on cancel.
    pub cancel_url: String,
}

/// Result of starting a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCheckoutResult {
    /// Hosted checkout URL to redirect the user to.
    pub checkout_url: String,
}

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("profile store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Starts hosted checkout sessions.
pub struct CreateCheckoutHandler {
    profiles: Arc<dyn ProfileRepository>,
    payments: Arc<dyn PaymentProvider>,
}

impl CreateCheckoutHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, payments: Arc<dyn PaymentProvider>) -> Self {
        Self { profiles, payments }
    }

    /// Create (or reuse) the Stripe customer and open a checkout session.
    pub async fn handle(
        &self,
        cmd: CreateCheckoutCommand,
    ) -> Result<CreateCheckoutResult, CheckoutError> {
        let profile = self.profiles.find_by_id(cmd.user_id).await?;

        let customer_id = match profile.and_then(|p| p.stripe_customer_id) {
            Some(id) => id,
            None => {
                let customer = self.payments.create_customer(&cmd.email).await?;
                self.profiles
                    .set_stripe_customer_id(cmd.user_id, &customer.id)
                    .await?;
                tracing::info!(
                    user_id = %cmd.user_id,
                    customer_id = %customer.id,
                    "created stripe customer for first checkout"
                );
                customer.id
            }
        };

        let session = self
            .payments
            .create_checkout_session(CreateCheckoutRequest {
                customer_id,
                price_id: cmd.price_id,
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
            })
            .await?;

        Ok(CreateCheckoutResult {
            checkout_url: session.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::PricingPlan;
    use crate::domain::profile::{Profile, SubscriptionUpdate};
    use crate::ports::{CheckoutSession, Customer, SyncOutcome};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    struct MockProfileRepository {
        profiles: Mutex<Vec<Profile>>,
    }

    impl MockProfileRepository {
        fn with_profile(profile: Profile) -> Self {
            Self {
                profiles: Mutex::new(vec![profile]),
            }
        }

        fn stored_customer_id(&self, user_id: Uuid) -> Option<String> {
            self.profiles
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == user_id)
                .and_then(|p| p.stripe_customer_id.clone())
        }
    }

    #[async_trait]
    impl ProfileRepository for MockProfileRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
            Ok(self
                .profiles
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        async fn find_by_stripe_customer_id(
            &self,
            customer_id: &str,
        ) -> Result<Option<Profile>, StoreError> {
            Ok(self
                .profiles
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.stripe_customer_id.as_deref() == Some(customer_id))
                .cloned())
        }

        async fn set_stripe_customer_id(
            &self,
            user_id: Uuid,
            customer_id: &str,
        ) -> Result<(), StoreError> {
            let mut profiles = self.profiles.lock().unwrap();
            match profiles.iter_mut().find(|p| p.id == user_id) {
                Some(p) => p.stripe_customer_id = Some(customer_id.to_string()),
                None => profiles.push(Profile {
                    id: user_id,
                    role: "user".to_string(),
                    stripe_customer_id: Some(customer_id.to_string()),
                    subscription_id: None,
                    subscription_status: None,
                    current_period_end: None,
                }),
            }
            Ok(())
        }

        async fn apply_subscription_update(
            &self,
            _update: &SubscriptionUpdate,
        ) -> Result<SyncOutcome, StoreError> {
            Ok(SyncOutcome::NoMatchingProfile)
        }
    }

    struct MockPaymentProvider {
        customer_calls: AtomicU32,
    }

    impl MockPaymentProvider {
        fn new() -> Self {
            Self {
                customer_calls: AtomicU32::new(0),
            }
        }

        fn customer_calls(&self) -> u32 {
            self.customer_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentProvider for MockPaymentProvider {
        async fn create_customer(&self, email: &str) -> Result<Customer, PaymentError> {
            self.customer_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Customer {
                id: "cus_new".to_string(),
                email: email.to_string(),
            })
        }

        async fn create_checkout_session(
            &self,
            request: CreateCheckoutRequest,
        ) -> Result<CheckoutSession, PaymentError> {
            Ok(CheckoutSession {
                id: "cs_1".to_string(),
                url: format!("https://checkout.stripe.com/{}", request.customer_id),
            })
        }

        async fn list_prices(&self) -> Result<Vec<PricingPlan>, PaymentError> {
            Ok(vec![])
        }
    }

    fn profile(user_id: Uuid, customer_id: Option<&str>) -> Profile {
        Profile {
            id: user_id,
            role: "user".to_string(),
            stripe_customer_id: customer_id.map(str::to_string),
            subscription_id: None,
            subscription_status: None,
            current_period_end: None,
        }
    }

    fn command(user_id: Uuid) -> CreateCheckoutCommand {
        CreateCheckoutCommand {
            user_id,
            email: "user@example.com".to_string(),
            price_id: "price_basic".to_string(),
            success_url: "https://app.example.com/success".to_string(),
            cancel_url: "https://app.example.com/pricing".to_string(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout Flow Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn existing_customer_id_is_reused() {
        let user_id = Uuid::new_v4();
        let repo = Arc::new(MockProfileRepository::with_profile(profile(
            user_id,
            Some("cus_existing"),
        )));
        let payments = Arc::new(MockPaymentProvider::new());
        let handler = CreateCheckoutHandler::new(repo, payments.clone());

        let result = handler.handle(command(user_id)).await.unwrap();

        assert_eq!(payments.customer_calls(), 0);
        assert!(result.checkout_url.ends_with("cus_existing"));
    }

    #[tokio::test]
    async fn first_checkout_creates_and_persists_customer() {
        let user_id = Uuid::new_v4();
        let repo = Arc::new(MockProfileRepository::with_profile(profile(user_id, None)));
        let payments = Arc::new(MockPaymentProvider::new());
        let handler = CreateCheckoutHandler::new(repo.clone(), payments.clone());

        let result = handler.handle(command(user_id)).await.unwrap();

        assert_eq!(payments.customer_calls(), 1);
        assert_eq!(
            repo.stored_customer_id(user_id),
            Some("cus_new".to_string())
        );
        assert!(result.checkout_url.ends_with("cus_new"));
    }
}
