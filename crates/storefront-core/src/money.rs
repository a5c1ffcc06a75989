//! # Money Module
//!
//! Provides the `Money` type for cart totals.
//!
//! ## Prices vs. Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog records carry decimal unit prices (109.95, 22.3, 0.333).      │
//! │  Those stay `Decimal` so that Σ price × quantity is computed exactly.  │
//! │                                                                         │
//! │  The cart total is rounded ONCE, half-up, to two decimals, and stored  │
//! │  as integer cents:                                                      │
//! │                                                                         │
//! │    Σ = 0.335  ──► round half-up ──► 0.34 ──► Money(34)                 │
//! │                                                                         │
//! │  Rounding each line first would drift from the rounded sum.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront_core::money::Money;
//!
//! let total = Money::from_decimal(Decimal::new(10995, 3)); // 10.995
//! assert_eq!(total.cents(), 1100);
//! assert_eq!(total.to_string(), "$11.00");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic on differences stays representable
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount to cents, rounding half-up at the second
    /// decimal.
    ///
    /// `MidpointAwayFromZero` is half-up for every non-negative amount, which
    /// is all a cart ever produces. Amounts outside the `i64` cent range
    /// saturate.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(1005, 3)).cents(), 101); // 1.005
    /// assert_eq!(Money::from_decimal(Decimal::new(1004, 3)).cents(), 100); // 1.004
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let saturated = if amount.is_sign_negative() {
            Money(i64::MIN)
        } else {
            Money(i64::MAX)
        };

        let Some(scaled) = amount.checked_mul(Decimal::ONE_HUNDRED) else {
            return saturated;
        };

        scaled
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map_or(saturated, Money)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal with two fractional digits.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds, like `from_decimal`.

/// Display is for logs and the demo binary; the UI formats per locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a cart quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(i64::from(qty)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_exact() {
        assert_eq!(Money::from_decimal(Decimal::new(10995, 2)).cents(), 10995);
        assert_eq!(Money::from_decimal(Decimal::ZERO).cents(), 0);
        assert_eq!(Money::from_decimal(Decimal::new(223, 1)).cents(), 2230); // 22.3
    }

    #[test]
    fn test_from_decimal_rounds_half_up() {
        // 0.125 → 0.13, 0.135 → 0.14: half-up, not half-to-even
        assert_eq!(Money::from_decimal(Decimal::new(125, 3)).cents(), 13);
        assert_eq!(Money::from_decimal(Decimal::new(135, 3)).cents(), 14);
        assert_eq!(Money::from_decimal(Decimal::new(1249, 4)).cents(), 12);
    }

    #[test]
    fn test_from_decimal_saturates() {
        assert_eq!(Money::from_decimal(Decimal::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_decimal(Decimal::MIN).cents(), i64::MIN);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(1099).to_decimal(), Decimal::new(1099, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3u32).cents(), 3000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        let min = Money::from_cents(i64::MIN);

        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(min - Money::from_cents(1), min);
        assert_eq!(max * 2, max);
        assert_eq!(Money::from_cents(-5) * u32::MAX, Money::from_cents(-5 * i64::from(u32::MAX)));

        let mut total = max;
        total += Money::from_cents(100);
        assert_eq!(total, max);
        let mut debt = min;
        debt -= Money::from_cents(100);
        assert_eq!(debt, min);
    }
}
