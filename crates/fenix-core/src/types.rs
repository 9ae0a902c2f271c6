//! # Domain Types
//!
//! Core domain types consumed by the reconciliation engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Transaction    │   │  PaymentLine    │   │ ClosingSession  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  method         │   │  id             │       │
//! │  │  kind / status  │   │  nominal_amount │   │  closed_at      │       │
//! │  │  gross_amount   │   │  currency_code  │   └─────────────────┘       │
//! │  │  is_credit      │   │  normalized_    │                             │
//! │  │  outstanding_   │   │    amount       │   ┌─────────────────┐       │
//! │  │    debt         │   └─────────────────┘   │ TransactionKind │       │
//! │  │  payments[]     │                         │  Sale           │       │
//! │  │  transaction_   │   ┌─────────────────┐   │  DebtCollection │       │
//! │  │    rate         │   │ CurrencyCode    │   └─────────────────┘       │
//! │  └─────────────────┘   │  Usd / Ves      │                             │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Schema Notes
//! Ledger rows come from several schema generations of the store. Fields
//! that older generations omit carry `#[serde(default)]` so a legacy row
//! deserializes instead of failing the whole import; the validation module
//! decides what is actually acceptable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::{self, ExchangeRateContext};
use crate::error::CoreResult;
use crate::money::Money;
use crate::CoreError;

// =============================================================================
// Currency Code
// =============================================================================

/// The two currencies a till operates in.
///
/// USD is the stable reference currency every total is kept in; VES is the
/// volatile local currency customers actually hand over. Anything priced in
/// VES must be normalized through an exchange rate before it is accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Reference currency. Amounts pass through normalization unchanged.
    Usd,
    /// Local currency. Amounts are divided by the exchange rate in force.
    Ves,
}

impl CurrencyCode {
    /// Whether this is the reference currency (no conversion needed).
    #[inline]
    pub const fn is_reference(&self) -> bool {
        matches!(self, CurrencyCode::Usd)
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::Usd
    }
}

// =============================================================================
// Transaction Kind / Status
// =============================================================================

/// The economic nature of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Goods sold. Counts toward gross sales.
    Sale,
    /// Settlement of a previously recorded receivable. Cash in, but NOT
    /// new revenue - it was already counted as a sale when the credit was
    /// extended.
    DebtCollection,
}

impl Default for TransactionKind {
    fn default() -> Self {
        // Oldest schema generation had no kind field; everything was a sale.
        TransactionKind::Sale
    }
}

/// The status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Finalized and countable.
    Completed,
    /// Cancelled. Contributes nothing to any total, ever.
    Voided,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Completed
    }
}

// =============================================================================
// Payment Line
// =============================================================================

/// One tender instance attached to a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLine {
    /// Payment channel name as configured by the merchant
    /// ("Efectivo", "Pago Móvil", "Zelle", ...). Free-form.
    pub method: String,

    /// Amount in the currency actually handed over.
    #[ts(type = "number")]
    pub nominal_amount: Money,

    /// Currency the nominal amount is denominated in.
    #[serde(default)]
    pub currency_code: CurrencyCode,

    /// Amount in reference currency, computed ONCE at entry time with the
    /// rate active at that moment, and immutable thereafter.
    ///
    /// Re-deriving this from `nominal_amount` with a present-day rate
    /// rewrites history and is exactly the defect class this field exists
    /// to prevent. `None` only on legacy rows recorded before the field
    /// existed; reads then fall back to the historical-rate policy in
    /// [`crate::currency`].
    #[ts(type = "number | null")]
    #[serde(default)]
    pub normalized_amount: Option<Money>,
}

impl PaymentLine {
    /// Records a new payment at entry time.
    ///
    /// This is the ONLY place a normalized amount is computed from a
    /// nominal one using the current rate: at the moment the cashier takes
    /// the money. From here on the line is a historical fact.
    ///
    /// ## Example
    /// ```rust
    /// use fenix_core::currency::ExchangeRateContext;
    /// use fenix_core::money::Money;
    /// use fenix_core::types::{CurrencyCode, PaymentLine};
    ///
    /// let ctx = ExchangeRateContext::new(rust_decimal::Decimal::from(200));
    /// let line = PaymentLine::record("Pago Móvil", Money::from_major(5000), CurrencyCode::Ves, &ctx).unwrap();
    /// assert_eq!(line.normalized_amount, Some(Money::from_major(25)));
    /// ```
    pub fn record(
        method: impl Into<String>,
        nominal_amount: Money,
        currency_code: CurrencyCode,
        ctx: &ExchangeRateContext,
    ) -> CoreResult<Self> {
        let normalized = currency::normalize(nominal_amount, currency_code, ctx.current_rate())?;
        Ok(PaymentLine {
            method: method.into(),
            nominal_amount,
            currency_code,
            normalized_amount: Some(normalized),
        })
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// An immutable fact about one economic event at the till.
///
/// ## Field Semantics
/// - `gross_amount` is the full face value of a sale in reference currency.
///   For a debt collection it is the amount collected in this event (a debt
///   collection has no sale value of its own).
/// - `outstanding_debt` is the unpaid remainder of a credit sale; zero for
///   everything else.
/// - `closing_session_ref` absent means the row belongs to the currently
///   open session and is eligible for accumulation; present means it was
///   settled in a prior closing and must be excluded.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque unique identifier.
    pub id: String,

    #[serde(default)]
    pub kind: TransactionKind,

    #[serde(default)]
    pub status: TransactionStatus,

    /// Closing session this row was settled under, if any. Written exactly
    /// once, at closing time, and never cleared.
    #[serde(default)]
    pub closing_session_ref: Option<String>,

    /// Total value in reference currency.
    #[ts(type = "number")]
    #[serde(default)]
    pub gross_amount: Money,

    /// Whether part or all of the payment was deferred. Only meaningful
    /// for sales.
    #[serde(default)]
    pub is_credit: bool,

    /// Remaining unpaid portion of a credit sale.
    #[ts(type = "number")]
    #[serde(default)]
    pub outstanding_debt: Money,

    /// Tender lines, possibly empty on legacy rows.
    #[serde(default)]
    pub payments: Vec<PaymentLine>,

    /// Exchange rate in force when this transaction was recorded. Absent
    /// on old rows; readers then fall back to the caller-supplied current
    /// rate.
    #[ts(type = "number | null")]
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub transaction_rate: Option<Decimal>,
}

impl Transaction {
    /// Stamps this transaction with the closing session it was settled
    /// under. Exactly-once: stamping an already-closed row is a caller bug
    /// and fails with [`CoreError::AlreadyClosed`].
    pub fn assign_closing(&mut self, session: &ClosingSession) -> CoreResult<()> {
        if let Some(existing) = &self.closing_session_ref {
            return Err(CoreError::AlreadyClosed {
                id: self.id.clone(),
                closing_session: existing.clone(),
            });
        }
        self.closing_session_ref = Some(session.id.clone());
        Ok(())
    }
}

// =============================================================================
// Closing Session ("corte")
// =============================================================================

/// A bounded accounting period. Owns zero or more transactions once closed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClosingSession {
    /// Opaque unique identifier.
    pub id: String,

    /// When the drawer was counted and the session sealed.
    #[ts(as = "String")]
    pub closed_at: DateTime<Utc>,
}

impl ClosingSession {
    pub fn new(id: impl Into<String>, closed_at: DateTime<Utc>) -> Self {
        ClosingSession {
            id: id.into(),
            closed_at,
        }
    }
}

/// Claims every still-open transaction for the given closing session.
///
/// Rows already stamped by a prior closing are left untouched - a
/// transaction must never be attributed to two closings. Returns how many
/// rows were claimed. The caller is responsible for making this mutually
/// exclusive with any other closing operation on the same session.
pub fn close_session(transactions: &mut [Transaction], session: &ClosingSession) -> usize {
    let mut claimed = 0;
    for tx in transactions.iter_mut() {
        if tx.closing_session_ref.is_none() {
            tx.closing_session_ref = Some(session.id.clone());
            claimed += 1;
        }
    }
    claimed
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale(id: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind: TransactionKind::Sale,
            status: TransactionStatus::Completed,
            closing_session_ref: None,
            gross_amount: Money::from_major(20),
            is_credit: false,
            outstanding_debt: Money::zero(),
            payments: vec![],
            transaction_rate: None,
        }
    }

    fn session(id: &str) -> ClosingSession {
        ClosingSession::new(id, Utc.with_ymd_and_hms(2026, 1, 20, 18, 0, 0).unwrap())
    }

    #[test]
    fn test_legacy_row_deserializes_with_defaults() {
        // oldest schema generation: just an id and a total
        let tx: Transaction = serde_json::from_str(r#"{ "id": "old_sale", "grossAmount": 29 }"#)
            .unwrap();
        assert_eq!(tx.kind, TransactionKind::Sale);
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.gross_amount, Money::from_major(29));
        assert!(tx.closing_session_ref.is_none());
        assert!(tx.payments.is_empty());
        assert!(tx.transaction_rate.is_none());
    }

    #[test]
    fn test_kind_and_status_wire_format() {
        let tx: Transaction = serde_json::from_str(
            r#"{ "id": "a1", "kind": "DEBT_COLLECTION", "status": "VOIDED", "grossAmount": 10 }"#,
        )
        .unwrap();
        assert_eq!(tx.kind, TransactionKind::DebtCollection);
        assert_eq!(tx.status, TransactionStatus::Voided);
    }

    #[test]
    fn test_assign_closing_is_exactly_once() {
        let mut tx = sale("v1");
        tx.assign_closing(&session("corte_1")).unwrap();
        assert_eq!(tx.closing_session_ref.as_deref(), Some("corte_1"));

        let err = tx.assign_closing(&session("corte_2")).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyClosed { .. }));
        // first stamp survives
        assert_eq!(tx.closing_session_ref.as_deref(), Some("corte_1"));
    }

    #[test]
    fn test_close_session_skips_prior_closings() {
        let mut rows = vec![sale("v1"), sale("v2"), sale("v3")];
        rows[1].closing_session_ref = Some("corte_prev".to_string());

        let claimed = close_session(&mut rows, &session("corte_9"));
        assert_eq!(claimed, 2);
        assert_eq!(rows[0].closing_session_ref.as_deref(), Some("corte_9"));
        assert_eq!(rows[1].closing_session_ref.as_deref(), Some("corte_prev"));
        assert_eq!(rows[2].closing_session_ref.as_deref(), Some("corte_9"));
    }
}
