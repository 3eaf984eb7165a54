//! # Money Module
//!
//! Provides the `Money` type for purchase and selling prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Purchase $12.50, selling $18.75:                                       │
//! │    (18.75 - 12.50) / 12.50 * 100 in floats can land on 49.999...       │
//! │    and round the margin the wrong way.                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    (1875 - 1250) * 100 / 1250 = 50 exactly                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use equidesk_core::money::Money;
//! use equidesk_core::types::MarkupRate;
//!
//! let cost = Money::from_major_minor(12, 50);
//! let suggested = cost.apply_markup(MarkupRate::from_bps(4000));
//! assert_eq!(suggested.cents(), 1750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::types::MarkupRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Serialized as a bare integer of cents, so the UI sends
/// `"purchasePrice": 1250` for $12.50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Example
    /// ```rust
    /// use equidesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(18, 75).cents(), 1875);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a markup and returns the marked-up price.
    ///
    /// ## Implementation
    /// Integer math: `(amount * (10000 + bps) + 5000) / 10000`.
    /// The +5000 rounds half-up to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use equidesk_core::money::Money;
    /// use equidesk_core::types::MarkupRate;
    ///
    /// let cost = Money::from_cents(999);
    /// // $9.99 + 15% = $11.4885 → $11.49
    /// assert_eq!(cost.apply_markup(MarkupRate::from_bps(1500)).cents(), 1149);
    /// ```
    pub fn apply_markup(&self, rate: MarkupRate) -> Money {
        // i128 keeps large inventory values from overflowing
        let factor = 10_000i128 + rate.bps() as i128;
        let marked_up = (self.0 as i128 * factor + 5_000).div_euclid(10_000);
        Money::from_cents(saturate(marked_up))
    }

    /// Returns the margin of `self` (a selling price) over `cost`, as a whole
    /// percentage.
    ///
    /// `round((self - cost) / cost * 100)`, rounding halves toward positive
    /// infinity. Zero when `cost` is not positive.
    ///
    /// ## Example
    /// ```rust
    /// use equidesk_core::money::Money;
    ///
    /// let cost = Money::from_cents(1250);
    /// assert_eq!(Money::from_cents(1875).margin_percent_over(cost), 50);
    /// assert_eq!(Money::from_cents(1875).margin_percent_over(Money::zero()), 0);
    /// ```
    pub fn margin_percent_over(&self, cost: Money) -> i64 {
        if !cost.is_positive() {
            return 0;
        }

        // round(n / d) half-up == floor((2n + d) / 2d) for d > 0
        let numerator = (self.0 as i128 - cost.0 as i128) * 100;
        let denominator = cost.0 as i128;
        saturate((2 * numerator + denominator).div_euclid(2 * denominator))
    }
}

/// Clamps an intermediate result into the `i64` range.
fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display for logs and test output. The UI formats its own currency.
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
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(12, 50).cents(), 1250);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1875)), "$18.75");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "1250");
        let back: Money = serde_json::from_str("1875").unwrap();
        assert_eq!(back, Money::from_cents(1875));
    }

    #[test]
    fn test_apply_markup() {
        let cost = Money::from_cents(1000);
        assert_eq!(cost.apply_markup(MarkupRate::from_bps(4000)).cents(), 1400);
        assert_eq!(cost.apply_markup(MarkupRate::zero()).cents(), 1000);
        // $0.05 + 50% = $0.075 → $0.08
        assert_eq!(Money::from_cents(5).apply_markup(MarkupRate::from_bps(5000)).cents(), 8);
    }

    #[test]
    fn test_margin_exact() {
        let cost = Money::from_cents(1250);
        assert_eq!(Money::from_cents(1875).margin_percent_over(cost), 50);
        assert_eq!(Money::from_cents(1250).margin_percent_over(cost), 0);
        assert_eq!(Money::from_cents(2500).margin_percent_over(cost), 100);
    }

    #[test]
    fn test_margin_rounds_half_up() {
        // 1/8 = 12.5% → 13
        assert_eq!(Money::from_cents(900).margin_percent_over(Money::from_cents(800)), 13);
        // 1/3 = 33.33% → 33
        assert_eq!(Money::from_cents(400).margin_percent_over(Money::from_cents(300)), 33);
        // -2.5% → -2 (half toward +∞)
        assert_eq!(Money::from_cents(39).margin_percent_over(Money::from_cents(40)), -2);
    }

    #[test]
    fn test_margin_selling_below_cost() {
        let cost = Money::from_cents(1250);
        assert_eq!(Money::from_cents(1000).margin_percent_over(cost), -20);
    }

    #[test]
    fn test_margin_zero_cost() {
        assert_eq!(Money::from_cents(500).margin_percent_over(Money::zero()), 0);
        assert_eq!(Money::from_cents(500).margin_percent_over(Money::from_cents(-100)), 0);
    }

    #[test]
    fn test_large_values_saturate() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.margin_percent_over(Money::from_cents(1)), i64::MAX);
        assert_eq!(Money::from_cents(i64::MIN).margin_percent_over(Money::from_cents(1)), i64::MIN);
        assert_eq!(
            Money::from_cents(i64::MAX).apply_markup(MarkupRate::from_bps(10_000)).cents(),
            i64::MAX
        );
        assert_eq!(
            Money::from_cents(i64::MIN).apply_markup(MarkupRate::from_bps(5_000)).cents(),
            i64::MIN
        );
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!((Money::from_cents(500) - Money::from_cents(200)).cents(), 300);
        assert_eq!((Money::from_cents(500) + Money::from_cents(200)).cents(), 700);
    }
}
