//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Poisha                                           │
//! │    Every amount is an i64 count of the smallest unit (poisha;           │
//! │    100 poisha = ৳1). The UI is the only place that formats.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use theo_core::money::Money;
//!
//! // Create from minor units (preferred)
//! let price = Money::from_minor(109900); // ৳1099.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = price + Money::from_minor(5000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// A monetary value in the smallest currency unit (poisha).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (poisha).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units (taka and poisha).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -৳5.50, not -৳4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units (poisha).
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (taka) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99, absolute value).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by an item count.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Panjabi ৳1250.00
    /// Item count: parse_item_count("1-3") = 3
    ///      │
    ///      ▼
    /// multiply_count(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: ৳3750.00
    /// ```
    ///
    /// Saturates at the i64 range, matching the saturating item counts,
    /// so a pathological expression cannot overflow a line total.
    #[inline]
    pub fn multiply_count(&self, count: u64) -> Self {
        let qty = i64::try_from(count).unwrap_or(i64::MAX);
        Money(self.0.saturating_mul(qty))
    }

    /// Adds two amounts, saturating at the i64 range.
    ///
    /// Used for running totals built from untrusted counts.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Display implementation shows money in the format the THEO UI uses.
///
/// This is for debugging and status lines. Use frontend formatting for
/// locale-aware display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}৳{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.minor(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.minor(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(1099)), "৳10.99");
        assert_eq!(format!("{}", Money::from_minor(500)), "৳5.00");
        assert_eq!(format!("{}", Money::from_minor(-550)), "-৳5.50");
        assert_eq!(format!("{}", Money::from_minor(0)), "৳0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        let result: Money = a * 3;
        assert_eq!(result.minor(), 3000);
    }

    #[test]
    fn test_multiply_count() {
        let unit_price = Money::from_minor(125000); // ৳1250.00
        let line_total = unit_price.multiply_count(3);
        assert_eq!(line_total.minor(), 375000);
    }

    #[test]
    fn test_multiply_count_saturates() {
        let unit_price = Money::from_minor(125000);
        let line_total = unit_price.multiply_count(u64::MAX);
        assert_eq!(line_total.minor(), i64::MAX);

        let refund = Money::from_minor(-100);
        assert_eq!(refund.multiply_count(u64::MAX).minor(), i64::MIN);
    }

    #[test]
    fn test_saturating_add() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max.saturating_add(Money::from_minor(1)).minor(), i64::MAX);
        assert_eq!(
            Money::from_minor(1000).saturating_add(Money::from_minor(500)).minor(),
            1500
        );
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_minor(-100);
        assert!(negative.is_negative());
    }
}
