//! # Currency Normalization
//!
//! Converts monetary amounts between the local currency (VES) and the
//! reference currency (USD) using exact decimal arithmetic.
//!
//! ## Rate Resolution Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHICH RATE APPLIES?                                                    │
//! │                                                                         │
//! │  New payment, entry time                                                │
//! │    └── ALWAYS the current rate; the result is persisted on the line    │
//! │        as normalized_amount and never re-derived.                      │
//! │                                                                         │
//! │  Stored record, read time                                               │
//! │    ├── transaction_rate present → use it (the rate in force when the   │
//! │    │   transaction was recorded)                                       │
//! │    └── transaction_rate absent  → fall back to the caller-supplied     │
//! │        current rate                                                    │
//! │                                                                         │
//! │  A $29 sale recorded at rate 100 is 2,900 Bs forever - even after the  │
//! │  market rate doubles. Re-reading history through today's rate is the   │
//! │  defect that made old reports disagree with the drawer.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The current rate is never read from ambient global state: the caller
//! passes an [`ExchangeRateContext`] into every call that might need it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CurrencyCode;

// =============================================================================
// Exchange Rate Context
// =============================================================================

/// The currently active reference rate (VES per USD), supplied by the
/// caller. The engine never mutates it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExchangeRateContext {
    #[serde(with = "rust_decimal::serde::float")]
    current_rate: Decimal,
}

impl ExchangeRateContext {
    /// Wraps the configured market rate. Validity is checked at conversion
    /// time, not here: a bad rate only matters once a conversion needs it.
    pub const fn new(current_rate: Decimal) -> Self {
        ExchangeRateContext { current_rate }
    }

    /// The currently configured rate.
    #[inline]
    pub const fn current_rate(&self) -> Decimal {
        self.current_rate
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Normalizes an amount into the reference currency.
///
/// Reference-currency amounts pass through unchanged (and the rate is not
/// even inspected - no conversion, no rate requirement). Local-currency
/// amounts are divided by the rate with exact decimal division.
///
/// ## Example
/// ```rust
/// use fenix_core::currency::normalize;
/// use fenix_core::money::Money;
/// use fenix_core::types::CurrencyCode;
/// use rust_decimal::Decimal;
///
/// let bs = Money::from_major(5000);
/// let usd = normalize(bs, CurrencyCode::Ves, Decimal::from(200)).unwrap();
/// assert_eq!(usd, Money::from_major(25));
/// ```
pub fn normalize(amount: Money, currency: CurrencyCode, rate: Decimal) -> CoreResult<Money> {
    if currency.is_reference() {
        return Ok(amount);
    }
    if rate <= Decimal::ZERO {
        return Err(CoreError::InvalidRate(rate));
    }
    Ok(Money::from_decimal(amount.amount() / rate))
}

/// Projects a reference-currency amount into the local currency, for
/// display alongside the nominal figures customers recognize.
pub fn to_local(amount: Money, rate: Decimal) -> CoreResult<Money> {
    if rate <= Decimal::ZERO {
        return Err(CoreError::InvalidRate(rate));
    }
    Ok(Money::from_decimal(amount.amount() * rate))
}

/// Resolves which rate applies to a stored record: the historical
/// transaction rate when present, the current rate otherwise.
#[inline]
pub fn resolve_rate(transaction_rate: Option<Decimal>, ctx: &ExchangeRateContext) -> Decimal {
    transaction_rate.unwrap_or_else(|| ctx.current_rate())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_currency_passes_through() {
        let amount = Money::new(2950, 2);
        assert_eq!(
            normalize(amount, CurrencyCode::Usd, dec!(200)).unwrap(),
            amount
        );
    }

    #[test]
    fn test_reference_currency_ignores_bad_rate() {
        // no conversion required, so a garbage rate is not an error
        let amount = Money::from_major(10);
        assert_eq!(
            normalize(amount, CurrencyCode::Usd, dec!(0)).unwrap(),
            amount
        );
    }

    #[test]
    fn test_local_currency_divides_exactly() {
        let usd = normalize(Money::from_major(5000), CurrencyCode::Ves, dec!(200)).unwrap();
        assert_eq!(usd, Money::from_major(25));
    }

    #[test]
    fn test_invalid_rate_rejected_when_conversion_required() {
        let err = normalize(Money::from_major(100), CurrencyCode::Ves, dec!(0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRate(_)));

        let err = normalize(Money::from_major(100), CurrencyCode::Ves, dec!(-36.55)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRate(_)));

        let err = to_local(Money::from_major(29), dec!(0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRate(_)));
    }

    #[test]
    fn test_historical_rate_preserved() {
        // A $29 sale recorded at rate 100 stays 2,900 Bs even though the
        // configured rate is now 200.
        let ctx = ExchangeRateContext::new(dec!(200));

        let old = resolve_rate(Some(dec!(100)), &ctx);
        assert_eq!(to_local(Money::from_major(29), old).unwrap(), Money::from_major(2900));

        // A row without a stored rate uses the current one.
        let new = resolve_rate(None, &ctx);
        assert_eq!(to_local(Money::from_major(10), new).unwrap(), Money::from_major(2000));
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        for (amount, rate) in [
            (dec!(29), dec!(100)),
            (dec!(0.01), dec!(36.55)),
            (dec!(123.45), dec!(7)),
            (dec!(5000), dec!(213.4567)),
        ] {
            let local = to_local(Money::from_decimal(amount), rate).unwrap();
            let back = normalize(local, CurrencyCode::Ves, rate).unwrap();
            let diff = (back - Money::from_decimal(amount)).abs();
            assert!(diff < Money::epsilon(), "round trip drifted by {diff}");
        }
    }
}
