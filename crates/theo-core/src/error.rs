//! # Error Types
//!
//! Domain-specific error types for theo-core.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line id, product id, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Core business logic errors.
///
/// These errors represent order-editing operations that reference entities
/// that do not exist. Invalid *data* (unparseable item expressions, bad
/// range tokens) is deliberately not an error: it contributes zero to the
/// totals instead, so a typo never blocks the rest of the order.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Variant line cannot be found.
    ///
    /// ## When This Occurs
    /// - Line id was never allocated by this builder
    /// - Line was already removed (ids are never reused)
    #[error("Variant line not found: {0}")]
    LineNotFound(u64),

    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
