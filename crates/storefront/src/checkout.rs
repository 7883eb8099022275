//! Checkout orchestration: totals, gateway handoff, order placement.
//!
//! The card flow is split around the hosted payment UI's suspension point:
//! [`begin`] validates the session and produces the widget payload, the
//! gateway runs its own UI, and [`confirm`] handles the success callback by
//! persisting the order exactly once. Cancellation leaves cart and form
//! untouched for a retry.
//!
//! Persisting after a successful payment is the one step that must not be
//! silently lost: a failed write surfaces a support-contact error and is
//! never retried automatically (the payment already happened).

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use silkroots_core::{
    CurrencyCode, CustomerDetails, Email, EmailError, Order, OrderCustomer, OrderItem,
    OrderStatus, TransactionRef,
};

use crate::cart::{Cart, CartLine};
use crate::pickup::PickupSelection;

/// Prefix on generated gateway references.
///
/// Reference = prefix + random integer; collision probability is accepted as
/// negligible and the orders table's unique constraint on `transaction_ref`
/// backstops replayed callbacks.
const REFERENCE_PREFIX: &str = "SR";

/// Checkout money summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Compute totals for a cart.
    ///
    /// Shipping is zero under the current pickup-only fulfillment policy;
    /// the field stays on the wire for order-record compatibility.
    #[must_use]
    pub fn compute(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        let shipping_fee = Decimal::ZERO;
        Self {
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
        }
    }
}

/// Why a checkout attempt was rejected before any network call.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The hosted payment widget script did not load in the browser.
    #[error("payment service unavailable, please reload and try again")]
    WidgetUnavailable,

    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A customer field is empty or no pickup location is selected.
    #[error("please complete your details and pick a pickup location")]
    IncompleteForm,

    /// The email field is non-empty but malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Everything the hosted card-payment UI needs to open.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedPaymentRequest {
    /// Gateway public key (safe to expose in the browser).
    pub key: String,
    pub email: String,
    /// Amount in the smallest currency unit (`round(total * 100)`).
    pub amount: i64,
    pub currency: CurrencyCode,
    /// Freshly generated unique reference for this attempt.
    pub reference: String,
    pub metadata: PaymentMetadata,
}

/// Metadata payload mirrored onto the gateway transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMetadata {
    pub cart_items: Vec<OrderItem>,
    pub customer: OrderCustomer,
}

/// True only when checkout may be enabled: all five customer fields are
/// non-empty and a pickup location is selected.
///
/// Completeness does not validate email *format*; [`begin`] re-checks that
/// at submit time.
#[must_use]
pub fn form_complete(details: &CustomerDetails, selection: &PickupSelection) -> bool {
    details.is_complete() && selection.location.is_some()
}

/// Validate the session and build the hosted payment payload.
///
/// No side effects on rejection - the customer corrects input and retries.
///
/// # Errors
///
/// See [`CheckoutError`] for the rejection cases.
pub fn begin(
    widget_ready: bool,
    cart: &Cart,
    details: &CustomerDetails,
    selection: &PickupSelection,
    public_key: &str,
    currency: CurrencyCode,
) -> Result<HostedPaymentRequest, CheckoutError> {
    if !widget_ready {
        return Err(CheckoutError::WidgetUnavailable);
    }
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if !form_complete(details, selection) {
        return Err(CheckoutError::IncompleteForm);
    }
    let email = Email::parse(&details.email)?;

    let totals = Totals::compute(cart);
    let amount = silkroots_core::Price::new(totals.total, currency).minor_units();

    Ok(HostedPaymentRequest {
        key: public_key.to_owned(),
        email: email.into_inner(),
        amount,
        currency,
        reference: generate_reference(),
        metadata: PaymentMetadata {
            cart_items: cart.lines().iter().map(order_item).collect(),
            customer: order_customer(details),
        },
    })
}

/// Build the order record for a gateway-reported success.
///
/// Totals are recomputed from the cart that was paid for, so the persisted
/// invariants (`subtotal == sum(price * qty)`, `total == subtotal + fee`)
/// hold by construction.
#[must_use]
pub fn build_order(
    cart: &Cart,
    details: &CustomerDetails,
    selection: &PickupSelection,
    reference: TransactionRef,
) -> Order {
    let totals = Totals::compute(cart);
    Order {
        id: Uuid::new_v4(),
        transaction_ref: reference,
        cart_items: cart.lines().iter().map(order_item).collect(),
        subtotal: totals.subtotal,
        shipping_fee: totals.shipping_fee,
        total_amount: totals.total,
        customer: order_customer(details),
        pickup_option: selection.channel,
        selected_pickup_location: selection.location.clone(),
        created_at: Utc::now(),
        status: OrderStatus::Confirmed,
    }
}

fn order_item(line: &CartLine) -> OrderItem {
    OrderItem {
        id: line.product_id.as_str().to_owned(),
        name: line.title.clone(),
        quantity: line.quantity,
        price: line.unit_price,
        color: line.variant.color.clone(),
        length: line.variant.length.clone(),
        size: line.variant.size.clone(),
        style: line.variant.style.clone(),
        thickness: line.variant.thickness.clone(),
    }
}

fn order_customer(details: &CustomerDetails) -> OrderCustomer {
    OrderCustomer {
        email: Some(details.email.clone()),
        name: Some(details.name.clone()),
        location: Some(details.location()),
        phone: Some(details.phone.clone()),
    }
}

/// Generate a fresh gateway reference: constant prefix + random integer.
fn generate_reference() -> String {
    let n: u32 = rand::rng().random_range(100_000_000..1_000_000_000);
    format!("{REFERENCE_PREFIX}-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use silkroots_core::{PickupChannel, ProductId, VariantSelection};

    use crate::cart::CatalogProduct;
    use crate::pickup::PickupDirectory;

    fn cart_with(price: i64, quantity: u32) -> Cart {
        let mut cart = Cart::new();
        cart.add(
            &CatalogProduct {
                id: ProductId::new("p1"),
                title: "Silk Bundle".to_owned(),
                unit_price: Decimal::from(price),
                available_quantity: 10,
                image_url: None,
            },
            quantity,
            VariantSelection::none(),
        );
        cart
    }

    fn details() -> CustomerDetails {
        CustomerDetails {
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
            country: "Nigeria".to_owned(),
            region_city: "Lagos".to_owned(),
            phone: "+2348000000000".to_owned(),
        }
    }

    fn selection_with_location() -> PickupSelection {
        let directory = PickupDirectory::load_bundled().expect("bundled directory");
        let mut selection = PickupSelection::default();
        selection.select_channel(PickupChannel::Stores);
        selection.select_location(directory.stores().first().expect("store").clone());
        selection
    }

    #[test]
    fn test_totals_identity() {
        let cart = cart_with(50, 2);
        let totals = Totals::compute(&cart);
        assert_eq!(totals.subtotal, Decimal::from(100));
        assert_eq!(totals.shipping_fee, Decimal::ZERO);
        assert_eq!(totals.total, totals.subtotal + totals.shipping_fee);
    }

    #[test]
    fn test_form_complete_requires_location() {
        let selection = PickupSelection::default();
        assert!(!form_complete(&details(), &selection));
        assert!(form_complete(&details(), &selection_with_location()));
    }

    #[test]
    fn test_begin_rejects_widget_not_ready() {
        let result = begin(
            false,
            &cart_with(50, 2),
            &details(),
            &selection_with_location(),
            "pk_test",
            CurrencyCode::NGN,
        );
        assert!(matches!(result, Err(CheckoutError::WidgetUnavailable)));
    }

    #[test]
    fn test_begin_rejects_incomplete_form() {
        let mut incomplete = details();
        incomplete.phone.clear();
        let result = begin(
            true,
            &cart_with(50, 2),
            &incomplete,
            &selection_with_location(),
            "pk_test",
            CurrencyCode::NGN,
        );
        assert!(matches!(result, Err(CheckoutError::IncompleteForm)));
    }

    #[test]
    fn test_begin_rejects_bad_email_even_when_complete() {
        let mut bad = details();
        bad.email = "not-an-email".to_owned();
        let selection = selection_with_location();
        assert!(form_complete(&bad, &selection));
        let result = begin(
            true,
            &cart_with(50, 2),
            &bad,
            &selection,
            "pk_test",
            CurrencyCode::NGN,
        );
        assert!(matches!(result, Err(CheckoutError::InvalidEmail(_))));
    }

    #[test]
    fn test_begin_builds_minor_unit_amount_and_reference() {
        let request = begin(
            true,
            &cart_with(50, 2),
            &details(),
            &selection_with_location(),
            "pk_test",
            CurrencyCode::NGN,
        )
        .expect("begin succeeds");

        assert_eq!(request.amount, 10_000);
        assert!(request.reference.starts_with("SR-"));
        assert_eq!(request.metadata.cart_items.len(), 1);
        assert_eq!(request.email, "ada@example.com");
    }

    #[test]
    fn test_build_order_invariants() {
        let cart = cart_with(50, 2);
        let order = build_order(
            &cart,
            &details(),
            &selection_with_location(),
            TransactionRef::new("R1"),
        );

        let items_total: Decimal = order
            .cart_items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        assert_eq!(order.subtotal, items_total);
        assert_eq!(order.total_amount, order.subtotal + order.shipping_fee);
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.pickup_option, PickupChannel::Stores);
        assert!(order.selected_pickup_location.is_some());
    }
}
