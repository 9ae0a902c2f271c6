//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a till that converts between currencies all day:                    │
//! │    5000 Bs / 36.55 accumulated as f64 drifts a few cents per session   │
//! │    and the closing report stops matching the drawer.                    │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal (128-bit fixed-point decimal)               │
//! │    Division by an exchange rate is exact to 28 significant digits.      │
//! │    Rounding to 2 decimals happens ONLY at presentation time.            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fenix_core::money::Money;
//!
//! // Create from scaled integer units (1099 at scale 2 = $10.99)
//! let price = Money::new(1099, 2);
//!
//! // Arithmetic operations
//! let total = price + Money::new(500, 2); // $15.99
//! assert_eq!(total, Money::new(1599, 2));
//!
//! // NEVER do this:
//! // let bad = Money::from_f64(10.99); // NO SUCH METHOD EXISTS!
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in reference-currency units (USD), exact decimal.
///
/// ## Design Decisions
/// - **`rust_decimal::Decimal`**: exact base-10 arithmetic, supports the
///   exchange-rate division the engine needs (integer cents cannot)
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **Signed**: residuals and credit deltas can legitimately be negative
/// - **Wire format**: plain JSON numbers, matching the ledger store and
///   the dashboard (never the decimal-as-string encoding)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    /// Minor-unit precision of the reference currency (cents).
    pub const MINOR_UNITS: u32 = 2;

    /// Creates a Money value from a scaled integer.
    ///
    /// ## Example
    /// ```rust
    /// use fenix_core::money::Money;
    ///
    /// let price = Money::new(1099, 2); // $10.99
    /// let same = Money::new(29, 0) - Money::new(1801, 2);
    /// assert_eq!(same, Money::new(1099, 2));
    /// ```
    #[inline]
    pub fn new(units: i64, scale: u32) -> Self {
        Money(Decimal::new(units, scale))
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying exact decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// The rounding-noise tolerance used across the engine: 0.01 reference
    /// units. Totals that disagree by less than this are considered equal.
    #[inline]
    pub fn epsilon() -> Self {
        Money(Decimal::new(1, 2))
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Subtraction that floors at zero.
    ///
    /// Used wherever a bucket must never go negative (debt repayment,
    /// the credit-bucket correction in the reporter).
    ///
    /// ## Example
    /// ```rust
    /// use fenix_core::money::Money;
    ///
    /// let credit = Money::from_major(29);
    /// assert_eq!(credit.saturating_sub(Money::from_major(25)), Money::from_major(4));
    /// assert_eq!(credit.saturating_sub(Money::from_major(40)), Money::zero());
    /// ```
    #[inline]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other >= self {
            Money::zero()
        } else {
            self - other
        }
    }

    /// Rounds to minor-unit precision using Bankers Rounding.
    ///
    /// ## Presentation Only
    /// ```text
    /// Accumulation ──► exact decimals, never rounded
    ///      │
    ///      ▼
    /// rounded() ──► 2 decimals, round half to even ──► report / receipt
    /// ```
    /// Rounding inside accumulation is the drift bug this engine exists to
    /// prevent; call this only on final, presentation-ready figures.
    #[inline]
    pub fn rounded(&self) -> Self {
        Money(self.0.round_dp(Self::MINOR_UNITS))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money in a human-readable reference-currency format.
///
/// ## Note
/// This is for debugging and log output. Use frontend formatting for actual
/// UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0.is_sign_negative() { "-" } else { "" };
        write!(f, "{}${:.2}", sign, self.0.abs())
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Summation over breakdown buckets.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_construction() {
        assert_eq!(Money::new(1099, 2).amount(), dec!(10.99));
        assert_eq!(Money::from_major(29).amount(), dec!(29));
        assert_eq!(Money::from_decimal(dec!(0.01)), Money::epsilon());
    }

    #[test]
    fn test_value_equality_ignores_scale() {
        // 29 and 29.00 are the same amount of money
        assert_eq!(Money::from_major(29), Money::new(2900, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::new(1099, 2)), "$10.99");
        assert_eq!(format!("{}", Money::from_major(5)), "$5.00");
        assert_eq!(format!("{}", Money::new(-550, 2)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10);
        let b = Money::new(550, 2);

        assert_eq!(a + b, Money::new(1550, 2));
        assert_eq!(a - b, Money::new(450, 2));
        assert_eq!(-b, Money::new(-550, 2));

        let mut acc = Money::zero();
        acc += a;
        acc -= b;
        assert_eq!(acc, Money::new(450, 2));
    }

    #[test]
    fn test_saturating_sub() {
        let credit = Money::from_major(29);
        assert_eq!(credit.saturating_sub(Money::from_major(25)), Money::from_major(4));
        assert_eq!(credit.saturating_sub(Money::from_major(29)), Money::zero());
        assert_eq!(credit.saturating_sub(Money::from_major(54)), Money::zero());
    }

    #[test]
    fn test_rounded_is_bankers() {
        // round half to even at the 2nd decimal
        assert_eq!(Money::from_decimal(dec!(2.345)).rounded().amount(), dec!(2.34));
        assert_eq!(Money::from_decimal(dec!(2.355)).rounded().amount(), dec!(2.36));
    }

    #[test]
    fn test_exact_rate_division_survives_round_trip() {
        // 5000 Bs at rate 200 is exactly $25 - no float drift
        let bs = dec!(5000);
        let rate = dec!(200);
        assert_eq!(Money::from_decimal(bs / rate), Money::from_major(25));
    }

    #[test]
    fn test_sum() {
        let buckets = [Money::from_major(20), Money::from_major(60), Money::from_major(10)];
        let total: Money = buckets.iter().sum();
        assert_eq!(total, Money::from_major(90));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::epsilon().is_positive());
        assert!(Money::new(-1, 2).is_negative());
    }

    #[test]
    fn test_serde_accepts_json_numbers() {
        // ledger rows arrive with plain JSON numbers for amounts
        let m: Money = serde_json::from_str("29.5").unwrap();
        assert_eq!(m, Money::new(295, 1));
    }
}
