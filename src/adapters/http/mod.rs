//! HTTP adapter - axum routes, handlers, and DTOs.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CheckoutRequest, CheckoutResponse, ErrorResponse, PricingResponse, WebhookAckResponse,
};
pub use handlers::{AppState, AuthenticatedUser};
pub use routes::{api_routes, app_router, webhook_routes};
