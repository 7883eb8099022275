//! Session-scoped shopping cart.
//!
//! The cart lives in the browser's session slot and is re-serialized in full
//! after every mutation (see `routes::cart`). All operations here are pure so
//! the merge and clamping rules can be tested without a session store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use silkroots_core::{ProductId, VariantSelection};

/// Catalog data needed to add a product to the cart.
///
/// The storefront catalog is external; this is the slice of a product the
/// cart needs to build a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
    pub available_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One line of the cart.
///
/// Uniqueness key is `(product_id, variant)`; adding a matching key
/// increments quantity instead of appending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub variant: VariantSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// The line total (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The whole cart collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// True when the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total item count across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add a product to the cart.
    ///
    /// Silently ignored when the product has zero availability or the
    /// requested quantity is below one. A line whose `(product_id, variant)`
    /// key matches an existing line has its quantity incremented; otherwise
    /// a new line is appended.
    pub fn add(&mut self, product: &CatalogProduct, quantity: u32, variant: VariantSelection) {
        if product.available_quantity == 0 || quantity < 1 {
            return;
        }

        let variant = variant.normalized();

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id && line.variant == variant)
        {
            line.quantity += quantity;
            return;
        }

        self.lines.push(CartLine {
            product_id: product.id.clone(),
            title: product.title.clone(),
            unit_price: product.unit_price,
            quantity,
            variant,
            image_url: product.image_url.clone(),
        });
    }

    /// Remove the line at `index`. Out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Set the quantity of the line at `index`, clamped to a minimum of 1.
    ///
    /// Lines leave the cart only through [`Cart::remove`], never by hitting
    /// zero here.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) {
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity.max(1);
        }
    }

    /// Empty the collection.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64, available: u32) -> CatalogProduct {
        CatalogProduct {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            unit_price: Decimal::from(price),
            available_quantity: available,
            image_url: None,
        }
    }

    fn variant_color(color: &str) -> VariantSelection {
        VariantSelection {
            color: Some(color.to_owned()),
            ..VariantSelection::none()
        }
    }

    #[test]
    fn test_add_appends_line() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 2, VariantSelection::none());
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_zero_availability_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 0), 1, VariantSelection::none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 0, VariantSelection::none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_same_key_merges() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 2, variant_color("Black"));
        cart.add(&product("p1", 50, 10), 3, variant_color("Black"));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(5));
    }

    #[test]
    fn test_add_differing_variant_splits() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 1, variant_color("Black"));
        cart.add(&product("p1", 50, 10), 1, variant_color("Burgundy"));
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_add_na_sentinel_merges_with_missing() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 1, VariantSelection::none());
        cart.add(
            &product("p1", 50, 10),
            1,
            VariantSelection {
                color: Some("N/A".to_owned()),
                ..VariantSelection::none()
            },
        );
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 3, VariantSelection::none());
        cart.set_quantity(0, 0);
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(1));
    }

    #[test]
    fn test_remove_by_index() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 1, VariantSelection::none());
        cart.add(&product("p2", 30, 10), 1, VariantSelection::none());
        cart.remove(0);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(
            cart.lines().first().map(|l| l.product_id.as_str()),
            Some("p2")
        );

        // out of range is ignored
        cart.remove(5);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 2, VariantSelection::none());
        cart.add(&product("p2", 30, 10), 1, VariantSelection::none());
        assert_eq!(cart.subtotal(), Decimal::from(130));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 50, 10), 2, VariantSelection::none());
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }
}
