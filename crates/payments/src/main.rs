//! Silkroots Payments - charge-creation function.
//!
//! This binary serves the crypto charge endpoint on port 3002. It is the
//! only Silkroots component holding a payment-gateway secret; the key is
//! injected via the deployment environment and never reaches the client.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::{get, post}};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod charge;
mod commerce;
mod config;
mod error;

use charge::ChargeParams;
use commerce::CommerceClient;
use config::PaymentsConfig;
use error::Result;
use sentry::integrations::tracing as sentry_tracing;

/// Shared state: config and gateway client.
#[derive(Clone)]
struct FnState {
    inner: Arc<FnStateInner>,
}

struct FnStateInner {
    config: PaymentsConfig,
    commerce: CommerceClient,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &PaymentsConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = PaymentsConfig::from_env().expect("Failed to load configuration");

    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "silkroots_payments=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let commerce = CommerceClient::new(&config).expect("Failed to build gateway client");
    let state = FnState {
        inner: Arc::new(FnStateInner { config, commerce }),
    };
    let addr = state.inner.config.socket_addr();

    let app = Router::new()
        .route("/health", get(health))
        .route("/charges", post(create_charge))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("payments function listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Create a crypto charge.
///
/// Validates `{amount, metadata}`, builds the fixed-price gateway body and
/// forwards it. The gateway's charge object (with the hosted payment URL)
/// is returned verbatim to the caller.
async fn create_charge(
    State(state): State<FnState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let params = ChargeParams::from_request(&body)?;
    let gateway_body = params.to_gateway_body(state.inner.config.settlement_currency);

    tracing::info!(amount = params.amount, name = %params.charge_name(), "creating charge");

    let charge = state.inner.commerce.create_charge(&gateway_body).await?;
    Ok(Json(charge))
}
