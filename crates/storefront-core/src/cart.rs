//! # Cart
//!
//! The shopping cart reducer and its derived totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action              CartAction               Item Change            │
//! │  ─────────              ──────────               ───────────            │
//! │                                                                         │
//! │  "Add to cart" ───────► Add(product) ──────────► qty += 1 / push       │
//! │                                                                         │
//! │  "−" button ──────────► Decrement(id) ─────────► qty -= 1 / remove     │
//! │                                                                         │
//! │  "Remove" ────────────► Remove(id) ────────────► remove                │
//! │                                                                         │
//! │  Quantity input ──────► SetQuantity{id, n} ────► qty = n / remove      │
//! │                                                                         │
//! │  "Clear cart" ────────► Clear ─────────────────► items.clear()         │
//! │                                                                         │
//! │  Every arm ends in recalculate(): totals are a pure function of items. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by product id, in order of first add
//! - Every item has quantity >= 1; an item is removed, never left at 0
//! - `total_items` / `total_price` are never assigned except by
//!   `recalculate()`, and the fields are private so nobody else can

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Item
// =============================================================================

/// A product in the cart with its quantity.
///
/// All product fields are copied at add time and carried unchanged; a
/// later catalog refresh does not touch items already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Snapshot of the product.
    #[serde(flatten)]
    pub product: Product,

    /// Quantity in cart (always >= 1).
    pub quantity: u32,
}

impl CartItem {
    fn from_product(product: &Product) -> Self {
        CartItem {
            product: product.clone(),
            quantity: 1,
        }
    }

    /// Product id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// Unrounded unit price × quantity.
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Cart Actions
// =============================================================================

/// The operations a UI can dispatch against the cart.
///
/// Serialized the way front-end action objects look:
/// `{ "type": "setQuantity", "payload": { "id": "3", "quantity": 2 } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
#[ts(export)]
pub enum CartAction {
    /// Add one unit of a product.
    Add(Product),
    /// Remove one unit; removes the item at quantity 1.
    Decrement(String),
    /// Remove the item regardless of quantity.
    Remove(String),
    /// Set an exact quantity; `<= 0` removes the item.
    SetQuantity { id: String, quantity: i64 },
    /// Empty the cart.
    Clear,
}

impl CartAction {
    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            CartAction::Add(_) => "add",
            CartAction::Decrement(_) => "decrement",
            CartAction::Remove(_) => "remove",
            CartAction::SetQuantity { .. } => "set_quantity",
            CartAction::Clear => "clear",
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartItem>,
    total_items: u64,
    total_price: Money,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Runs one reducer step. Returns `true` if the items changed.
    pub fn apply(&mut self, action: CartAction) -> bool {
        match action {
            CartAction::Add(product) => self.add_item(&product),
            CartAction::Decrement(id) => self.decrement_item(&id),
            CartAction::Remove(id) => self.remove_item(&id),
            CartAction::SetQuantity { id, quantity } => self.set_quantity(&id, quantity),
            CartAction::Clear => self.clear(),
        }
    }

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - Already in cart: quantity + 1, other fields untouched
    /// - Not in cart: appended with quantity 1
    pub fn add_item(&mut self, product: &Product) -> bool {
        match self.position(&product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity = item.quantity.saturating_add(1);
            }
            None => self.items.push(CartItem::from_product(product)),
        }

        self.recalculate();
        true
    }

    /// Removes one unit of the item, or the whole item at quantity 1.
    ///
    /// Unknown ids are ignored.
    pub fn decrement_item(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
        } else {
            self.items.remove(index);
        }

        self.recalculate();
        true
    }

    /// Removes the item regardless of its quantity.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let changed = self.items.len() != before;

        self.recalculate();
        changed
    }

    /// Sets the quantity of an item already in the cart.
    ///
    /// ## Behavior
    /// - `quantity > 0`: set exactly (clamped to `u32::MAX`)
    /// - `quantity <= 0`: item removed
    /// - Unknown id: no-op, nothing is added
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        if quantity > 0 {
            self.items[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        } else {
            self.items.remove(index);
        }

        self.recalculate();
        true
    }

    /// Resets the cart to empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        self.recalculate();
        changed
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Items in order of first add.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up an item by product id.
    pub fn item(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Checks if a product is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Σ price × quantity, rounded half-up to cents.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Number of distinct products.
    pub fn unique_items(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// The only writer of the derived totals.
    fn recalculate(&mut self) {
        self.total_items = self
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum();

        let exact: Decimal = self.items.iter().map(CartItem::line_total).sum();
        self.total_price = Money::from_decimal(exact);
    }
}

// =============================================================================
// Totals Summary
// =============================================================================

/// Cart totals summary for UI badges and the cart footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub unique_items: usize,
    pub total_items: u64,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            unique_items: cart.unique_items(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price,
            image: format!("/img/{}.png", id),
            description: "A product".to_string(),
            category: "misc".to_string(),
        }
    }

    fn assert_totals_consistent(cart: &Cart) {
        let quantities: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
        let exact: Decimal = cart.items().iter().map(CartItem::line_total).sum();
        assert_eq!(cart.total_items(), quantities);
        assert_eq!(cart.total_price(), Money::from_decimal(exact));
        assert!(cart.items().iter().all(|i| i.quantity >= 1));
    }

    #[test]
    fn test_add_item_appends_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", Decimal::new(999, 2)));

        assert_eq!(cart.unique_items(), 1);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price().cents(), 999);
        assert_eq!(cart.items()[0].product.category, "misc");
    }

    #[test]
    fn test_add_same_product_increments_without_duplicating() {
        let mut cart = Cart::new();
        let mouse = product("1", Decimal::new(999, 2));

        cart.add_item(&mouse);

        // A refreshed catalog record must not overwrite the snapshot
        let mut renamed = mouse.clone();
        renamed.name = "Renamed".to_string();
        cart.add_item(&renamed);

        assert_eq!(cart.unique_items(), 1);
        assert_eq!(cart.item("1").map(|i| i.quantity), Some(2));
        assert_eq!(cart.item("1").map(|i| i.product.name.as_str()), Some("Product 1"));
        assert_eq!(cart.total_price().cents(), 1998);
    }

    #[test]
    fn test_items_keep_first_add_order() {
        let mut cart = Cart::new();
        cart.add_item(&product("b", Decimal::ONE));
        cart.add_item(&product("a", Decimal::ONE));
        cart.add_item(&product("b", Decimal::ONE));

        let ids: Vec<&str> = cart.items().iter().map(CartItem::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_decrement_removes_item_at_quantity_one() {
        let mut cart = Cart::new();
        let p = product("1", Decimal::new(500, 2));
        cart.add_item(&p);
        cart.add_item(&p);

        assert!(cart.decrement_item("1"));
        assert_eq!(cart.item("1").map(|i| i.quantity), Some(1));

        assert!(cart.decrement_item("1"));
        assert!(!cart.contains("1"));
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", Decimal::ONE));
        let before = cart.clone();

        assert!(!cart.decrement_item("missing"));
        assert!(!cart.remove_item("missing"));
        assert!(!cart.set_quantity("missing", 4));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item_ignores_quantity() {
        let mut cart = Cart::new();
        let p = product("1", Decimal::ONE);
        for _ in 0..5 {
            cart.add_item(&p);
        }

        assert!(cart.remove_item("1"));
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", Decimal::new(250, 2)));

        cart.set_quantity("1", 4);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price().cents(), 1000);

        cart.set_quantity("1", 0);
        assert!(cart.is_empty());

        cart.add_item(&product("2", Decimal::ONE));
        cart.set_quantity("2", -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_huge_values() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", Decimal::ZERO));
        cart.set_quantity("1", i64::MAX);
        assert_eq!(cart.item("1").map(|i| i.quantity), Some(u32::MAX));
    }

    #[test]
    fn test_total_price_rounds_the_sum_not_the_lines() {
        let mut cart = Cart::new();
        // 0.335 + 0.335 = 0.67 exactly; per-line rounding would give 0.68
        cart.add_item(&product("1", Decimal::new(335, 3)));
        cart.add_item(&product("2", Decimal::new(335, 3)));
        assert_eq!(cart.total_price().cents(), 67);

        // 3 × 0.335 = 1.005 → 1.01 (half-up)
        cart.remove_item("2");
        cart.set_quantity("1", 3);
        assert_eq!(cart.total_price().cents(), 101);
    }

    #[test]
    fn test_clear_resets_totals() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", Decimal::new(1999, 2)));
        cart.add_item(&product("2", Decimal::new(5, 0)));

        assert!(cart.clear());
        assert_eq!(cart, Cart::new());
        assert!(!cart.clear());
    }

    #[test]
    fn test_totals_follow_any_action_sequence() {
        let a = product("a", Decimal::new(1099, 2));
        let b = product("b", Decimal::new(3, 1));
        let c = product("c", Decimal::new(12345, 3));

        let actions = vec![
            CartAction::Add(a.clone()),
            CartAction::Add(b.clone()),
            CartAction::Add(a.clone()),
            CartAction::Add(c.clone()),
            CartAction::SetQuantity { id: "b".into(), quantity: 7 },
            CartAction::Decrement("a".into()),
            CartAction::Decrement("a".into()),
            CartAction::Decrement("a".into()),
            CartAction::Remove("zzz".into()),
            CartAction::Add(c),
            CartAction::SetQuantity { id: "b".into(), quantity: 0 },
            CartAction::Add(b),
            CartAction::Remove("c".into()),
            CartAction::Add(a),
        ];

        let mut cart = Cart::new();
        for action in actions {
            cart.apply(action);
            assert_totals_consistent(&cart);
        }

        let ids: Vec<&str> = cart.items().iter().map(CartItem::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price().cents(), 1129);
    }

    #[test]
    fn test_action_wire_format() {
        let action: CartAction =
            serde_json::from_str(r#"{"type":"setQuantity","payload":{"id":"3","quantity":2}}"#)
                .unwrap();
        assert_eq!(
            action,
            CartAction::SetQuantity {
                id: "3".to_string(),
                quantity: 2
            }
        );

        let clear: CartAction = serde_json::from_str(r#"{"type":"clear"}"#).unwrap();
        assert_eq!(clear, CartAction::Clear);
    }

    #[test]
    fn test_cart_serializes_flat_items() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", Decimal::new(150, 2)));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["totalPrice"], 150);
        assert_eq!(json["items"][0]["id"], "1");
        assert_eq!(json["items"][0]["quantity"], 1);
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = Cart::new();
        let p = product("1", Decimal::new(200, 2));
        cart.add_item(&p);
        cart.add_item(&p);
        cart.add_item(&product("2", Decimal::new(50, 2)));

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.unique_items, 2);
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.total_price.cents(), 450);
    }
}
