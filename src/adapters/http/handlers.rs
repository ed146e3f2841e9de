//! HTTP handlers connecting axum routes to application handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::{
    CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler, GetPricingHandler,
    InvalidateCatalogHandler, ProcessWebhookCommand, ProcessWebhookHandler,
    SubscriptionReconciler,
};
use crate::domain::webhook::{StripeWebhookVerifier, WebhookError};
use crate::ports::{KeyValueCache, PaymentError, PaymentProvider, ProfileRepository};

use super::dto::{
    CheckoutRequest, CheckoutResponse, ErrorResponse, PricingResponse, WebhookAckResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; all dependencies are Arc-wrapped. The cache and the
/// verifier are single explicit instances created at startup.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileRepository>,
    pub cache: Arc<dyn KeyValueCache>,
    pub payments: Arc<dyn PaymentProvider>,
    pub verifier: StripeWebhookVerifier,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn process_webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            self.verifier.clone(),
            SubscriptionReconciler::new(self.profiles.clone()),
            InvalidateCatalogHandler::new(self.cache.clone()),
        )
    }

    pub fn get_pricing_handler(&self) -> GetPricingHandler {
        GetPricingHandler::new(self.cache.clone(), self.payments.clone())
    }

    pub fn create_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(self.profiles.clone(), self.payments.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from the request.
///
/// Session handling lives outside this service; requests arrive with the
/// already-authenticated user id in an `X-User-Id` header set by the
/// fronting auth layer.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse::new("Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or(AuthenticationRequired)?;

        Ok(AuthenticatedUser { user_id })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Endpoint
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/stripe - verify and process a Stripe webhook delivery.
///
/// The body is consumed as raw bytes: the signature covers the exact wire
/// payload, so nothing may parse or re-serialize it before verification.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            WebhookApiError(WebhookError::ParseError(
                "missing Stripe-Signature header".to_string(),
            ))
        })?;

    let handler = state.process_webhook_handler();
    let cmd = ProcessWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    handler.handle(cmd).await?;

    Ok((StatusCode::OK, Json(WebhookAckResponse { received: true })))
}

/// Maps webhook processing errors to the issuer-facing response contract:
/// rejected deliveries get a client error with `{"error": ...}`, transient
/// failures get a 5xx so Stripe retries.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        let body = ErrorResponse::new(self.0.to_string());
        (status, Json(body)).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// API Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/pricing - the pricing catalog (cache-first).
pub async fn get_pricing(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.get_pricing_handler();
    let plans = handler.handle().await?;

    Ok(Json(PricingResponse { plans }))
}

/// POST /api/checkout - start a subscription checkout for the current user.
pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.create_checkout_handler();
    let cmd = CreateCheckoutCommand {
        user_id: user.user_id,
        email: request.email,
        price_id: request.price_id,
        success_url: request.success_url,
        cancel_url: request.cancel_url,
    };

    let result = handler.handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            checkout_url: result.checkout_url,
        }),
    ))
}

/// API error type that converts application errors to HTTP responses.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        tracing::error!(error = %err, "payment provider call failed");
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Payment(e) => e.into(),
            CheckoutError::Store(e) => {
                tracing::error!(error = %e, "profile store call failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "internal error".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}
