//! # storefront-core: Pure State Logic for the Storefront Demos
//!
//! This crate holds the client-side state rules shared by the storefront
//! front ends, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI layer (out of scope)                      │   │
//! │  │    Product grid ──► Cart page ──► Theme toggle ──► Lang switch  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ user actions, OS events, responses     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-runtime                              │   │
//! │  │    CartStore, ThemeResolver, LanguageSwitcher, ProductFetcher   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   theme   │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ Preference│  │   │
//! │  │   │  Catalog  │  │  rounding │  │  reducer  │  │  resolve  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog and cart product records
//! - [`money`] - Money type in integer cents
//! - [`cart`] - Cart reducer with derived totals
//! - [`theme`] - Theme preference and effective theme resolution
//! - [`locale`] - Supported languages and text direction
//! - [`error`] - Domain error types
//! - [`validation`] - Record validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront_core::{Cart, Product};
//!
//! let mut cart = Cart::new();
//! let mug = Product::new("mug", "Mug", Decimal::new(1999, 2));
//!
//! cart.add_item(&mug);
//! cart.add_item(&mug);
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().cents(), 3998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod locale;
pub mod money;
pub mod theme;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAction, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use locale::{Direction, Language, FALLBACK_LANGUAGE, SUPPORTED_LANGUAGES};
pub use money::Money;
pub use theme::{resolve_effective, EffectiveTheme, ThemePreference};
pub use types::{CatalogProduct, Product};
