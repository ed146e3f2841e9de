//! Pricing catalog types.

use serde::{Deserialize, Serialize};

/// Cache key for the rendered pricing catalog.
///
/// Shared between the pricing read path (which populates it on a miss) and
/// the webhook invalidation trigger (which deletes it on product/price
/// changes).
pub const PRICING_DATA_KEY: &str = "pricingData";

/// One purchasable plan, as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPlan {
    /// Stripe price identifier (price_xxx).
    pub price_id: String,

    /// Name of the product the price belongs to.
    pub product_name: String,

    /// Amount in the smallest currency unit; absent for metered prices.
    pub unit_amount: Option<i64>,

    /// Recurring interval ("month", "year"), absent for one-time prices.
    pub interval: Option<String>,

    /// ISO currency code.
    pub currency: String,

    /// Product description, if any.
    pub description: Option<String>,
}
