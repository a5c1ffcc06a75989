//! # Domain Types
//!
//! Product records consumed by the storefront demos.
//!
//! ## Two Catalog Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Product Records                                 │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────┐      │
//! │  │     CatalogProduct       │        │        Product           │      │
//! │  │  (loading-states grid)   │  From  │     (cart catalog)       │      │
//! │  │  ──────────────────────  │ ─────► │  ──────────────────────  │      │
//! │  │  id: number              │        │  id: string              │      │
//! │  │  title                   │        │  name                    │      │
//! │  │  price                   │        │  price                   │      │
//! │  │  image                   │        │  image                   │      │
//! │  └──────────────────────────┘        │  description, category   │      │
//! │                                      └──────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `image`, `description` and `category` are display metadata: the cart
//! copies them into its items and never looks at them again.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::validation::{validate_non_negative, validate_required};

// =============================================================================
// Product (cart catalog)
// =============================================================================

/// A product the cart can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub price: Decimal,

    /// Image URL or path.
    #[serde(default)]
    pub image: String,

    /// Long description.
    #[serde(default)]
    pub description: String,

    /// Category label.
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Creates a product with empty display metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price,
            image: String::new(),
            description: String::new(),
            category: String::new(),
        }
    }

    /// Checks the fields the cart relies on.
    ///
    /// ## Rules
    /// - `id` and `name` must not be blank
    /// - `price` must not be negative
    pub fn validate(&self) -> CoreResult<()> {
        let check = || {
            validate_required("id", &self.id)?;
            validate_required("name", &self.name)?;
            validate_non_negative("price", self.price)
        };

        check().map_err(|source| CoreError::InvalidProduct {
            id: self.id.clone(),
            source,
        })
    }
}

// =============================================================================
// Catalog Product (loading-states grid)
// =============================================================================

/// A product card as served by the public catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogProduct {
    /// Numeric identifier.
    pub id: u64,

    /// Card title.
    pub title: String,

    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub price: Decimal,

    /// Image URL.
    #[serde(default)]
    pub image: String,
}

impl From<CatalogProduct> for Product {
    fn from(card: CatalogProduct) -> Self {
        Product {
            id: card.id.to_string(),
            name: card.title,
            price: card.price,
            image: card.image,
            description: String::new(),
            category: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_product_deserializes_cart_catalog_record() {
        let json = r#"{
            "id": "p-1",
            "name": "Wireless Mouse",
            "price": 25.5,
            "image": "/img/mouse.png",
            "description": "Two buttons",
            "category": "electronics"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "p-1");
        assert_eq!(product.price, Decimal::new(255, 1));
        assert_eq!(product.category, "electronics");
    }

    #[test]
    fn test_product_metadata_is_optional() {
        let json = r#"{ "id": "p-2", "name": "Sticker", "price": 1.5 }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.image.is_empty());
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_catalog_product_converts_to_product() {
        let card = CatalogProduct {
            id: 3,
            title: "Backpack".to_string(),
            price: Decimal::new(10995, 2),
            image: "https://example.test/bag.jpg".to_string(),
        };

        let product = Product::from(card);
        assert_eq!(product.id, "3");
        assert_eq!(product.name, "Backpack");
        assert_eq!(product.price, Decimal::new(10995, 2));
        assert_eq!(product.image, "https://example.test/bag.jpg");
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let product = Product::new("x", "Broken", Decimal::new(-1, 0));
        let err = product.validate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidProduct {
                source: ValidationError::MustNotBeNegative { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let product = Product::new("x", "   ", Decimal::ONE);
        assert!(product.validate().is_err());
        assert!(Product::new("x", "Fine", Decimal::ZERO).validate().is_ok());
    }
}
