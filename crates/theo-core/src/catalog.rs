//! # Catalog Types
//!
//! Read-only product data supplied by the host page before the order
//! builder initializes.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog Data Flow                                 │
//! │                                                                         │
//! │  Host page (JSON) ──► Catalog ──► OrderBuilder (read-only reference)   │
//! │                          │                                              │
//! │                          ├── products: name, category, price, size,    │
//! │                          │             color                            │
//! │                          ├── sizes:    override choices                │
//! │                          └── colors:   override choices                │
//! │                                                                         │
//! │  NO component mutates the catalog after construction.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (host-assigned).
    pub id: String,

    /// Display name shown in the variant picker.
    pub name: String,

    /// Category label (e.g., "Panjabi", "Saree").
    pub category: String,

    /// Unit price in minor units.
    pub price: Money,

    /// Default size for this product.
    pub size: String,

    /// Default color for this product.
    pub color: String,
}

impl Product {
    /// Picker label in the format the sales form shows:
    /// `Name - Category (Size, Color) - ৳Price`.
    pub fn display_label(&self) -> String {
        format!(
            "{} - {} ({}, {}) - {}",
            self.name, self.category, self.size, self.color, self.price
        )
    }
}

/// A size choice offered as a per-line override.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SizeOption {
    pub name: String,
}

/// A color choice offered as a per-line override.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ColorOption {
    pub name: String,
}

/// The complete read-only catalog the host supplies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub sizes: Vec<SizeOption>,
    pub colors: Vec<ColorOption>,
}

impl Catalog {
    /// Creates a new catalog from its parts.
    pub fn new(products: Vec<Product>, sizes: Vec<SizeOption>, colors: Vec<ColorOption>) -> Self {
        Catalog {
            products,
            sizes,
            colors,
        }
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}
