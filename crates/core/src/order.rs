//! Canonical order model and the card/crypto record union.
//!
//! Two structurally different order shapes exist in the orders collection:
//! the flat shape written by the card checkout path, and the charge shape
//! written by the crypto path (keyed by `chargeId`/`hostedUrl`, with customer
//! and cart data nested under `metadata`). [`OrderRecord`] resolves the shape
//! ONCE at deserialization; everything downstream works with the union or
//! the normalized [`OrderSummary`].
//!
//! Field names here are a compatibility surface shared with existing stored
//! records - do not rename without a data migration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde::de::Error as _;

use crate::types::{
    OrderId, OrderStatus, PickupChannel, PickupLocation, TransactionRef, or_na,
};

/// A single purchased line as stored on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<String>,
}

/// Customer contact block as stored on an order.
///
/// Every field is optional on the read side: old records (and crypto-path
/// metadata) can miss any leaf, and the aggregation view must not fail on
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The flat order shape written by the card checkout path.
///
/// Invariants (enforced by the checkout orchestrator, asserted in tests):
/// `total_amount == subtotal + shipping_fee` and
/// `subtotal == sum(item.price * item.quantity)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub transaction_ref: TransactionRef,
    pub cart_items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total_amount: Decimal,
    #[serde(default)]
    pub customer: OrderCustomer,
    pub pickup_option: PickupChannel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_pickup_location: Option<PickupLocation>,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Metadata block carried on a crypto charge record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeMetadata {
    #[serde(default)]
    pub customer: OrderCustomer,
    #[serde(default)]
    pub cart_items: Vec<OrderItem>,
}

/// The charge-keyed order shape written by the crypto checkout path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeOrder {
    pub charge_id: String,
    pub hosted_url: String,
    #[serde(default)]
    pub metadata: ChargeMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A raw order record, shape-resolved at ingestion.
///
/// Detection rule: presence of both `chargeId` AND `hostedUrl` means the
/// crypto shape; anything else deserializes as the flat card shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrderRecord {
    Crypto(ChargeOrder),
    Card(Order),
}

impl<'de> Deserialize<'de> for OrderRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let is_crypto = value.get("chargeId").is_some() && value.get("hostedUrl").is_some();

        if is_crypto {
            serde_json::from_value(value)
                .map(Self::Crypto)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(Self::Card)
                .map_err(D::Error::custom)
        }
    }
}

impl OrderRecord {
    /// Normalize either shape into the display/reporting model.
    #[must_use]
    pub fn summarize(&self) -> OrderSummary {
        match self {
            Self::Card(order) => OrderSummary {
                order_id: order.id.to_string(),
                customer_name: or_na(order.customer.name.as_deref()).to_owned(),
                customer_email: or_na(order.customer.email.as_deref()).to_owned(),
                customer_phone: or_na(order.customer.phone.as_deref()).to_owned(),
                items: order.cart_items.iter().map(SummaryItem::from).collect(),
                amount: order.total_amount,
                status: order
                    .status
                    .to_wire()
                    .unwrap_or_else(|| NA.to_owned()),
                created_at: Some(order.created_at),
            },
            Self::Crypto(charge) => OrderSummary {
                order_id: charge.charge_id.clone(),
                customer_name: or_na(charge.metadata.customer.name.as_deref()).to_owned(),
                customer_email: or_na(charge.metadata.customer.email.as_deref()).to_owned(),
                customer_phone: or_na(charge.metadata.customer.phone.as_deref()).to_owned(),
                items: charge.metadata.cart_items.iter().map(SummaryItem::from).collect(),
                amount: charge.amount.unwrap_or_default(),
                status: or_na(charge.status.as_deref()).to_owned(),
                created_at: charge.created_at,
            },
        }
    }
}

const NA: &str = "N/A";

impl OrderStatus {
    /// The lowercase wire string used by order records.
    fn to_wire(self) -> Option<String> {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(ToOwned::to_owned))
    }
}

/// One item row of an [`OrderSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryItem {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl From<&OrderItem> for SummaryItem {
    fn from(item: &OrderItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// The normalized order view consumed by account and admin screens.
///
/// Absent leaves are already substituted with the `"N/A"` placeholder, so
/// templates can render fields directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub items: Vec<SummaryItem>,
    pub amount: Decimal,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}
