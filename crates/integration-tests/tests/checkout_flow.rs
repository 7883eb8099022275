//! End-to-end card checkout exercised against the in-memory order store.
//!
//! Covers the journey the browser drives: build a cart, pick a pickup
//! channel and location, fill in details, open the hosted payment widget,
//! then confirm the gateway's success callback and read the order back
//! through the account aggregation view.

use rust_decimal::Decimal;

use silkroots_core::{
    CurrencyCode, CustomerDetails, OrderRecord, PickupChannel, ProductId, TransactionRef,
    VariantSelection,
};
use silkroots_integration_tests::MemoryOrderStore;
use silkroots_storefront::cart::{Cart, CatalogProduct};
use silkroots_storefront::checkout;
use silkroots_storefront::db::{InsertOutcome, OrderStore};
use silkroots_storefront::pickup::{PickupDirectory, PickupSelection};

const PUBLIC_KEY: &str = "pk_test_silkroots";

fn cart_with_one_bundle() -> Cart {
    let mut cart = Cart::new();
    cart.add(
        &CatalogProduct {
            id: ProductId::new("prod-silk-1"),
            title: "Raw Silk Bundle".to_owned(),
            unit_price: Decimal::from(50),
            available_quantity: 10,
            image_url: None,
        },
        2,
        VariantSelection::none(),
    );
    cart
}

fn ada() -> CustomerDetails {
    CustomerDetails {
        email: "ada@example.com".to_owned(),
        name: "Ada".to_owned(),
        country: "Nigeria".to_owned(),
        region_city: "Lagos".to_owned(),
        phone: "+2348000000000".to_owned(),
    }
}

/// Collection-point selection where the customer denied geolocation.
fn denied_geo_selection(directory: &PickupDirectory) -> PickupSelection {
    let mut selection = PickupSelection::default();
    let generation = selection
        .select_channel(PickupChannel::CollectionPoint)
        .expect("entering collection points fires a location request");
    selection.geo_denied(generation);

    // Denied permission falls back to the full, unranked candidate list
    let candidates = selection.candidates(directory);
    assert_eq!(candidates.len(), directory.collection_points().len());
    assert!(candidates.iter().all(|c| c.distance_km.is_none()));

    selection.select_location(candidates.first().expect("non-empty list").clone());
    selection
}

#[tokio::test]
async fn test_card_checkout_journey() {
    let directory = PickupDirectory::load_bundled().expect("bundled directory");
    let store = MemoryOrderStore::new();

    let mut cart = cart_with_one_bundle();
    let details = ada();
    let selection = denied_geo_selection(&directory);

    // Checkout only unlocks with complete details and a chosen location
    assert!(checkout::form_complete(&details, &selection));

    let request = checkout::begin(
        true,
        &cart,
        &details,
        &selection,
        PUBLIC_KEY,
        CurrencyCode::NGN,
    )
    .expect("valid session begins checkout");
    assert_eq!(request.amount, 10_000);
    assert!(request.reference.starts_with("SR-"));

    // Gateway reports success with reference R1
    let order = checkout::build_order(&cart, &details, &selection, TransactionRef::new("R1"));
    let outcome = store.insert(&order).await.expect("insert succeeds");
    assert_eq!(outcome, InsertOutcome::Inserted);
    cart.clear();

    assert!(cart.is_empty());
    assert_eq!(store.len(), 1);

    let records = store
        .list_by_email("ada@example.com")
        .await
        .expect("list succeeds");
    assert_eq!(records.len(), 1);

    match records.first() {
        Some(OrderRecord::Card(saved)) => {
            assert_eq!(saved.total_amount, Decimal::from(100));
            assert_eq!(saved.subtotal, Decimal::from(100));
            assert_eq!(saved.cart_items.len(), 1);
            assert_eq!(saved.pickup_option, PickupChannel::CollectionPoint);
            assert!(saved.selected_pickup_location.is_some());
        }
        other => panic!("expected a card-shape record, got {other:?}"),
    }
}

#[tokio::test]
async fn test_replayed_success_callback_writes_once() {
    let directory = PickupDirectory::load_bundled().expect("bundled directory");
    let store = MemoryOrderStore::new();

    let cart = cart_with_one_bundle();
    let details = ada();
    let selection = denied_geo_selection(&directory);

    let order = checkout::build_order(&cart, &details, &selection, TransactionRef::new("R1"));
    let first = store.insert(&order).await.expect("first insert");
    assert_eq!(first, InsertOutcome::Inserted);

    // The gateway replays the callback with the same reference
    let replay = checkout::build_order(&cart, &details, &selection, TransactionRef::new("R1"));
    let second = store.insert(&replay).await.expect("second insert");
    assert_eq!(second, InsertOutcome::AlreadyRecorded);
    assert_eq!(store.len(), 1);

    // The id on record stays the first order's, never the replay's
    let recorded = store
        .find_by_transaction_ref("R1")
        .await
        .expect("lookup succeeds")
        .expect("reference is on record");
    assert_eq!(recorded.id, order.id);
    assert_ne!(recorded.id, replay.id);

    // A genuinely new payment still goes through
    let next = checkout::build_order(&cart, &details, &selection, TransactionRef::new("R2"));
    let third = store.insert(&next).await.expect("third insert");
    assert_eq!(third, InsertOutcome::Inserted);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_account_view_aggregates_both_record_shapes() {
    let directory = PickupDirectory::load_bundled().expect("bundled directory");
    let store = MemoryOrderStore::new();

    let cart = cart_with_one_bundle();
    let details = ada();
    let selection = denied_geo_selection(&directory);

    let order = checkout::build_order(&cart, &details, &selection, TransactionRef::new("R1"));
    store.insert(&order).await.expect("insert card order");

    // A crypto charge written by the payments function for the same customer
    let charge: OrderRecord = serde_json::from_value(serde_json::json!({
        "chargeId": "CHG-42",
        "hostedUrl": "https://commerce.example/charges/CHG-42",
        "metadata": {
            "customer": {"email": "ada@example.com", "name": "Ada"},
            "cartItems": [
                {"id": "prod-kit-1", "name": "Care Kit", "quantity": 1, "price": "19.99"}
            ]
        },
        "amount": "19.99",
        "status": "PENDING"
    }))
    .expect("crypto record deserializes");
    store.seed(charge);

    let records = store
        .list_by_email("ada@example.com")
        .await
        .expect("list succeeds");
    assert_eq!(records.len(), 2);

    let summaries: Vec<_> = records.iter().map(OrderRecord::summarize).collect();

    let card = summaries
        .iter()
        .find(|s| s.status == "confirmed")
        .expect("card summary present");
    assert_eq!(card.amount, Decimal::from(100));
    assert_eq!(card.customer_name, "Ada");

    let crypto = summaries
        .iter()
        .find(|s| s.order_id == "CHG-42")
        .expect("crypto summary present");
    assert_eq!(crypto.status, "PENDING");
    // absent leaves render as the placeholder, never as an error
    assert_eq!(crypto.customer_phone, "N/A");
    assert_eq!(
        crypto.items.first().map(|i| i.name.as_str()),
        Some("Care Kit")
    );
}
