//! # Cart Store
//!
//! Shared handle around the cart reducer.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` so every UI surface (product
//! grid, cart page, navigation badge) can hold a handle. Each dispatch runs
//! one reducer step under the lock and returns the totals it produced.
//!
//! ```text
//!   Product card "Add" ───► dispatch(Add)         ─┐
//!   Cart page "-"      ───► dispatch(Decrement)    │   lock ► Cart::apply
//!   Cart page input    ───► dispatch(SetQuantity)  ├─► ► recalculate
//!   Cart page "Remove" ───► dispatch(Remove)       │   unlock ► CartTotals
//!   "Clear cart"       ───► dispatch(Clear)       ─┘
//! ```

use std::sync::{Arc, Mutex};

use storefront_core::{Cart, CartAction, CartTotals, Product};
use tracing::debug;

use crate::lock;

/// Shared cart state.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
}

impl CartStore {
    /// Creates a store holding an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one action and returns the resulting totals.
    pub fn dispatch(&self, action: CartAction) -> CartTotals {
        let name = action.name();
        let mut cart = lock(&self.cart);
        let changed = cart.apply(action);
        let totals = CartTotals::from(&*cart);

        debug!(
            action = name,
            changed,
            unique_items = totals.unique_items,
            total_items = totals.total_items,
            total_price = %totals.total_price,
            "Cart action applied"
        );
        totals
    }

    pub fn add_item(&self, product: &Product) -> CartTotals {
        self.dispatch(CartAction::Add(product.clone()))
    }

    pub fn decrement_item(&self, id: &str) -> CartTotals {
        self.dispatch(CartAction::Decrement(id.to_string()))
    }

    pub fn remove_item(&self, id: &str) -> CartTotals {
        self.dispatch(CartAction::Remove(id.to_string()))
    }

    pub fn set_quantity(&self, id: &str, quantity: i64) -> CartTotals {
        self.dispatch(CartAction::SetQuantity {
            id: id.to_string(),
            quantity,
        })
    }

    pub fn clear(&self) -> CartTotals {
        self.dispatch(CartAction::Clear)
    }

    /// Current totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&*lock(&self.cart))
    }

    /// Reads the cart under the lock.
    pub fn with_cart<R>(&self, read: impl FnOnce(&Cart) -> R) -> R {
        read(&lock(&self.cart))
    }

    /// Copy of the whole cart.
    pub fn snapshot(&self) -> Cart {
        lock(&self.cart).clone()
    }
}
