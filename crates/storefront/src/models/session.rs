//! Session-related types.
//!
//! The session is the per-browser durable slot: the cart, the checkout form
//! and the pickup selection all survive reloads through it, but are never
//! shared across devices.

/// Session keys for checkout state.
pub mod keys {
    /// Key for the serialized cart collection.
    pub const CART: &str = "cart";

    /// Key for the customer-details checkout form.
    pub const CUSTOMER_DETAILS: &str = "customer_details";

    /// Key for the pickup selection state machine.
    pub const PICKUP_SELECTION: &str = "pickup_selection";
}
