//! Subsync service entry point.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use subsync::adapters::cache::InMemoryCache;
use subsync::adapters::http::{app_router, AppState};
use subsync::adapters::postgres::PgProfileRepository;
use subsync::adapters::stripe::{StripeClient, StripeConfig};
use subsync::config::AppConfig;
use subsync::domain::webhook::StripeWebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.server.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.payment.is_live_mode() && !config.is_production() {
        tracing::warn!("live Stripe key configured outside production");
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let state = AppState {
        profiles: Arc::new(PgProfileRepository::new(pool)),
        cache: Arc::new(InMemoryCache::new(config.cache.default_ttl())),
        payments: Arc::new(StripeClient::new(StripeConfig::new(
            config.payment.stripe_api_key.clone(),
        ))),
        verifier: StripeWebhookVerifier::new(config.payment.stripe_webhook_secret.clone()),
    };

    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "subsync listening");

    axum::serve(listener, app).await?;

    Ok(())
}
