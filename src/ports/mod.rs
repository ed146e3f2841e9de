//! Ports - trait seams between the application core and infrastructure.

mod cache;
mod payment_provider;
mod profile_repository;

pub use cache::{CacheError, KeyValueCache};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, Customer, PaymentError, PaymentProvider,
};
pub use profile_repository::{ProfileRepository, StoreError, SyncOutcome};
