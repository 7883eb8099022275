//! Cart route handlers.
//!
//! The cart lives in the session; every mutation loads it, applies one
//! operation, and writes the whole collection back.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use silkroots_core::VariantSelection;

use crate::cart::{Cart, CartLine, CatalogProduct};
use crate::error::Result;
use crate::models::session_keys;
use crate::routes::{session_load, session_store};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: String,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
    pub variant: VariantSelection,
    pub image_url: Option<String>,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.as_str().to_owned(),
            title: line.title.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
            variant: line.variant.clone(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody {
    pub product: CatalogProduct,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub variant: VariantSelection,
}

const fn default_quantity() -> u32 {
    1
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartBody {
    pub index: usize,
    pub quantity: u32,
}

/// Remove line request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartBody {
    pub index: usize,
}

/// Display cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart: Cart = session_load(&session, session_keys::CART).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add an item to the cart.
///
/// Unavailable products and sub-1 quantities are silent no-ops, matching the
/// storefront UI which disables the button rather than erroring.
#[instrument(skip(session, body), fields(product_id = %body.product.id))]
pub async fn add(session: Session, Json(body): Json<AddToCartBody>) -> Result<Json<CartView>> {
    let mut cart: Cart = session_load(&session, session_keys::CART).await?;
    cart.add(&body.product, body.quantity, body.variant);
    session_store(&session, session_keys::CART, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Update a cart line's quantity.
#[instrument(skip(session))]
pub async fn update(session: Session, Json(body): Json<UpdateCartBody>) -> Result<Json<CartView>> {
    let mut cart: Cart = session_load(&session, session_keys::CART).await?;
    cart.set_quantity(body.index, body.quantity);
    session_store(&session, session_keys::CART, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a cart line by index.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(body): Json<RemoveFromCartBody>,
) -> Result<Json<CartView>> {
    let mut cart: Cart = session_load(&session, session_keys::CART).await?;
    cart.remove(body.index);
    session_store(&session, session_keys::CART, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Cart count badge.
#[instrument(skip(_state, session))]
pub async fn count(
    State(_state): State<AppState>,
    session: Session,
) -> Result<Json<serde_json::Value>> {
    let cart: Cart = session_load(&session, session_keys::CART).await?;
    Ok(Json(serde_json::json!({ "count": cart.item_count() })))
}
