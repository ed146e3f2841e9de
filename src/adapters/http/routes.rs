//! Axum router configuration.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_checkout, get_pricing, handle_stripe_webhook, AppState};

/// Create the authenticated API router.
///
/// # Routes
/// - `GET /pricing` - Pricing catalog (cache-first)
/// - `POST /checkout` - Start a subscription checkout
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/pricing", get(get_pricing))
        .route("/checkout", post(create_checkout))
}

/// Create the Stripe webhook router.
///
/// Separate from the API routes because webhook deliveries carry no user
/// session; they are authenticated by signature instead.
///
/// # Routes
/// - `POST /stripe` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}

/// Create the complete application router with its state applied.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .nest("/webhooks", webhook_routes())
        .with_state(state)
}
