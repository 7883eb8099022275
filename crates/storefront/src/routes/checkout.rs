//! Checkout route handlers.
//!
//! `start` validates and hands the browser a hosted-payment payload; the
//! gateway widget then reports back through `callback` (success) or
//! `cancelled`. Order persistence happens only in `callback`, and the cart
//! is cleared only after that write succeeds.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use silkroots_core::{CustomerDetails, OrderId, TransactionRef};

use crate::cart::Cart;
use crate::checkout::{self, HostedPaymentRequest};
use crate::db::{InsertOutcome, OrderStore as _};
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::pickup::PickupSelection;
use crate::routes::{session_load, session_store};
use crate::state::AppState;

/// Checkout start request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBody {
    /// Whether the hosted payment widget script loaded in the browser.
    pub widget_ready: bool,
    pub customer: CustomerDetails,
}

/// Validate the checkout and build the hosted payment payload.
///
/// The submitted customer details are saved to the session first, so a
/// rejected attempt keeps the form filled for correction.
#[instrument(skip(state, session, body), fields(widget_ready = body.widget_ready))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<StartBody>,
) -> Result<Json<HostedPaymentRequest>> {
    session_store(&session, session_keys::CUSTOMER_DETAILS, &body.customer).await?;

    let cart: Cart = session_load(&session, session_keys::CART).await?;
    let selection: PickupSelection =
        session_load(&session, session_keys::PICKUP_SELECTION).await?;

    let request = checkout::begin(
        body.widget_ready,
        &cart,
        &body.customer,
        &selection,
        &state.config().paystack_public_key,
        state.config().currency,
    )?;

    Ok(Json(request))
}

/// Gateway success callback body.
#[derive(Debug, Deserialize)]
pub struct CallbackBody {
    pub reference: String,
}

/// Response to a persisted (or already-recorded) order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    pub order_id: OrderId,
    pub redirect: String,
}

/// Handle the gateway's success callback: persist the order exactly once,
/// then clear the checkout session state.
///
/// A persistence failure here is surfaced as a support-contact error and is
/// NOT retried - the payment already happened, and re-attempting either the
/// write or the payment would make reconciliation worse.
#[instrument(skip(state, session, body))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CallbackBody>,
) -> Result<Json<CallbackResponse>> {
    if body.reference.is_empty() {
        return Err(AppError::BadRequest("missing payment reference".to_owned()));
    }

    let cart: Cart = session_load(&session, session_keys::CART).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("no checkout in progress".to_owned()));
    }
    let details: CustomerDetails =
        session_load(&session, session_keys::CUSTOMER_DETAILS).await?;
    let selection: PickupSelection =
        session_load(&session, session_keys::PICKUP_SELECTION).await?;

    let order = checkout::build_order(
        &cart,
        &details,
        &selection,
        TransactionRef::new(body.reference),
    );

    let outcome = state
        .orders()
        .insert(&order)
        .await
        .map_err(AppError::OrderSaveAfterPayment)?;

    // On a replayed callback the freshly built order was never written;
    // answer with the id that is actually on record for this reference.
    let order_id = match outcome {
        InsertOutcome::Inserted => order.id,
        InsertOutcome::AlreadyRecorded => state
            .orders()
            .find_by_transaction_ref(order.transaction_ref.as_str())
            .await
            .map_err(AppError::OrderSaveAfterPayment)?
            .map(|recorded| recorded.id)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "reference {} reported as recorded but not found",
                    order.transaction_ref
                ))
            })?,
    };
    tracing::info!(
        order_id = %order_id,
        transaction_ref = %order.transaction_ref,
        ?outcome,
        total = %order.total_amount,
        "order placed"
    );

    // Only now is the session state released
    session.remove::<Cart>(session_keys::CART).await?;
    session
        .remove::<CustomerDetails>(session_keys::CUSTOMER_DETAILS)
        .await?;
    session
        .remove::<PickupSelection>(session_keys::PICKUP_SELECTION)
        .await?;

    Ok(Json(CallbackResponse {
        order_id,
        redirect: "/account/orders".to_owned(),
    }))
}

/// Gateway cancellation notice.
///
/// Cart and form remain intact so the customer can retry.
#[instrument(skip(session))]
pub async fn cancelled(session: Session) -> Result<Json<serde_json::Value>> {
    let cart: Cart = session_load(&session, session_keys::CART).await?;
    tracing::info!(items = cart.item_count(), "payment cancelled by customer");
    Ok(Json(serde_json::json!({
        "notice": "Payment cancelled. Your cart has been kept so you can try again."
    })))
}
