//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Cart (JSON fragments)
//! GET  /cart                    - Cart contents
//! POST /cart/add                - Add to cart (merge on product+variant)
//! POST /cart/update             - Update line quantity (min 1)
//! POST /cart/remove             - Remove line by index
//! GET  /cart/count              - Cart count badge
//!
//! # Pickup selection
//! GET  /pickup                  - Current selection + candidate locations
//! POST /pickup/channel          - Switch channel (stores / collection point)
//! POST /pickup/geolocation      - Browser geolocation result
//! POST /pickup/geolocation/denied - Browser geolocation denial
//! POST /pickup/select           - Select a specific location
//!
//! # Checkout
//! POST /checkout/start          - Validate + build hosted payment payload
//! POST /checkout/callback       - Gateway success callback (persists order)
//! POST /checkout/cancelled      - Gateway close/cancel notice
//!
//! # Account
//! GET  /account/orders          - Order history (normalized summaries)
//! ```

pub mod account;
pub mod cart;
pub mod checkout;
pub mod pickup;

use axum::{
    Router,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::state::AppState;

/// Load a value from the session, falling back to its default.
pub(crate) async fn session_load<T>(session: &Session, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    Ok(session.get::<T>(key).await?.unwrap_or_default())
}

/// Write a value back to the session.
///
/// Every cart/pickup mutation goes through here, so the full state is
/// re-serialized to the durable slot on each change.
pub(crate) async fn session_store<T>(session: &Session, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
{
    session.insert(key, value).await?;
    Ok(())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the pickup selection routes router.
pub fn pickup_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pickup::show))
        .route("/channel", post(pickup::select_channel))
        .route("/geolocation", post(pickup::geolocation_granted))
        .route("/geolocation/denied", post(pickup::geolocation_denied))
        .route("/select", post(pickup::select_location))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/start", post(checkout::start))
        .route("/callback", post(checkout::callback))
        .route("/cancelled", post(checkout::cancelled))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/orders", get(account::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .nest("/pickup", pickup_routes())
        .nest("/checkout", checkout_routes())
        .nest("/account", account_routes())
}
