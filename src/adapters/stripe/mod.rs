//! Stripe API adapter.

mod client;

pub use client::{StripeClient, StripeConfig};
