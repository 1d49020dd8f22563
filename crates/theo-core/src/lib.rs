//! # theo-core: Pure Business Logic for THEO Inventory
//!
//! This crate is the **heart** of the THEO clothing-inventory system. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      THEO Inventory Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Host Surface (web page)                     │   │
//! │  │    Variant form ──► Totals display ──► Scanner dialog           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ★ theo-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   money   │  │   items   │  │   order   │  │   │
//! │  │   │  Product  │  │   Money   │  │  parsing  │  │  Builder  │  │   │
//! │  │   │  Catalog  │  │   ৳ i64   │  │  ranges   │  │  Totals   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CAMERA • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 theo-scan (barcode pipeline)                    │   │
//! │  │           camera sessions, decode loop, presenter               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Read-only product data supplied by the host
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`items`] - Item-expression parsing (`"1-5,10"` → 6)
//! - [`order`] - The multi-variant order builder and its running totals
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Camera, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in poisha (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use theo_core::{Catalog, Money, OrderBuilder};
//!
//! let mut order = OrderBuilder::new(Catalog::default());
//! let line = order.add_line();
//! order.set_item_expression(line, "1-5,10").unwrap();
//!
//! // "1-5" is five items, "10" is ten more
//! assert_eq!(order.totals().total_items, 15);
//! ```

pub mod catalog;
pub mod error;
pub mod items;
pub mod money;
pub mod order;

// Re-exports for convenience: `use theo_core::Money` instead of
// `use theo_core::money::Money`.
pub use catalog::{Catalog, ColorOption, Product, SizeOption};
pub use error::{CoreError, CoreResult};
pub use items::parse_item_count;
pub use money::Money;
pub use order::{OrderBuilder, OrderTotals, VariantLine, ViewMode};
