//! # Aggregation Reporter
//!
//! Finalizes a treasury pass into the presentation-ready reconciliation
//! report, and owns the one invariant the whole subsystem exists for:
//!
//! ```text
//!        | Σ breakdown − collected |  <  0.01
//! ```
//!
//! ## The Double-Count Hazard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Credit sale $29 ──► "credit" bucket: +29        (face value)          │
//! │  Collection  $25 ──► "Punto de Venta": +25       (the same money!)     │
//! │                                                                         │
//! │  Naive chart total: $54  ─── but only $25 ever entered the till.       │
//! │                                                                         │
//! │  Correction: every collected amount leaves the "credit" bucket         │
//! │  (floored at zero) and stays attributed to the channel that actually   │
//! │  collected it.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! If the buckets still disagree with collected cash after correction, the
//! residual lands in an `"other"` bucket and the report carries a
//! [`ReportWarning::BreakdownMismatch`] - that situation means an upstream
//! classification defect, not a normal till.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::classify::{classify, Classified};
use crate::currency::ExchangeRateContext;
use crate::error::CoreError;
use crate::money::Money;
use crate::treasury::{TreasuryAccumulator, TreasuryTotals, METHOD_CREDIT, METHOD_OTHER};
use crate::types::Transaction;
use crate::validation::validate_transaction;

// =============================================================================
// Report Types
// =============================================================================

/// Non-fatal conditions surfaced alongside the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ReportWarning {
    /// The per-method buckets could not be made to agree with collected
    /// cash; the residual was moved to the `"other"` bucket.
    BreakdownMismatch {
        #[ts(type = "number")]
        breakdown_total: Money,
        #[ts(type = "number")]
        collected: Money,
    },
}

/// The reconciliation report every view of the application renders from.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    /// Fiscal total of goods sold (credit sales at full face value).
    #[ts(type = "number")]
    pub gross_sales: Money,

    /// Money actually received into the till.
    #[ts(type = "number")]
    pub collected: Money,

    /// Per-payment-method decomposition of `collected`. Guaranteed to sum
    /// to `collected` within the rounding epsilon.
    #[ts(type = "Record<string, number>")]
    pub breakdown: BTreeMap<String, Money>,

    /// Records excluded by per-record failures (malformed row, unusable
    /// exchange rate). Exclusions for voided or already-closed rows are
    /// normal and NOT counted here.
    pub skipped_count: usize,

    /// Non-fatal conditions the caller should show or log.
    pub warnings: Vec<ReportWarning>,

    /// Eligible sales in this pass (debt collections are not sales).
    #[ts(type = "number")]
    pub sale_count: u64,

    /// Average sale value, rounded for presentation.
    #[ts(type = "number")]
    pub average_ticket: Money,

    /// Net change in accounts receivable: credit extended this session
    /// minus debt collected. Negative when the store recovered more than
    /// it lent.
    #[ts(type = "number")]
    pub credit_outstanding_delta: Money,
}

// =============================================================================
// Top-Level Reconcile
// =============================================================================

/// Runs the full single-pass pipeline over an ordered batch of ledger rows.
///
/// `auditing_session` is the closing session under audit, or `None` for the
/// currently open session. Per-record failures never abort the pass: the
/// offending row is skipped, counted, and logged. No error escapes this
/// call - every failure mode is represented in the returned report.
///
/// ## Example
/// ```rust
/// use fenix_core::currency::ExchangeRateContext;
/// use fenix_core::money::Money;
/// use fenix_core::report::reconcile;
/// use fenix_core::types::{Transaction, TransactionKind, TransactionStatus};
/// use rust_decimal::Decimal;
///
/// let rows = vec![Transaction {
///     id: "v1".to_string(),
///     kind: TransactionKind::Sale,
///     status: TransactionStatus::Completed,
///     closing_session_ref: None,
///     gross_amount: Money::from_major(20),
///     is_credit: false,
///     outstanding_debt: Money::zero(),
///     payments: vec![],
///     transaction_rate: None,
/// }];
///
/// let report = reconcile(&rows, None, &ExchangeRateContext::new(Decimal::from(200)));
/// assert_eq!(report.gross_sales, Money::from_major(20));
/// assert_eq!(report.collected, Money::from_major(20));
/// ```
pub fn reconcile(
    transactions: &[Transaction],
    auditing_session: Option<&str>,
    ctx: &ExchangeRateContext,
) -> ReconciliationReport {
    let mut acc = TreasuryAccumulator::new();
    let mut skipped_count = 0;

    for tx in transactions {
        if let Err(error) = validate_transaction(tx) {
            warn!(%error, "record skipped");
            skipped_count += 1;
            continue;
        }

        match classify(tx, auditing_session, ctx) {
            Ok(Classified::Eligible(classified)) => acc.accumulate(&classified),
            Ok(Classified::Excluded(reason)) => {
                debug!(id = %tx.id, ?reason, "record excluded");
            }
            Err(error) => {
                warn!(id = %tx.id, %error, "record skipped");
                skipped_count += 1;
            }
        }
    }

    finalize(acc.finish(), skipped_count)
}

// =============================================================================
// Breakdown Reconciliation
// =============================================================================

/// Corrects the per-method map against collected cash.
///
/// Policy for the credit bucket (deliberate design choice, see DESIGN.md):
/// the collected total of debt-collection events is subtracted from the
/// face-value `"credit"` bucket, floored at zero - the money changed
/// nature from receivable to cash and is now attributed to the channel
/// that collected it.
pub fn reconcile_breakdown(
    totals: &TreasuryTotals,
) -> (BTreeMap<String, Money>, Vec<ReportWarning>) {
    let mut breakdown = totals.breakdown.clone();
    let mut warnings = Vec::new();

    if totals.debt_collected.is_positive() {
        if let Some(credit) = breakdown.get_mut(METHOD_CREDIT) {
            let corrected = credit.saturating_sub(totals.debt_collected);
            debug!(
                before = %credit,
                after = %corrected,
                debt_collected = %totals.debt_collected,
                "credit bucket corrected for collections"
            );
            *credit = corrected;
            if corrected.is_zero() {
                breakdown.remove(METHOD_CREDIT);
            }
        }
    }

    let breakdown_total: Money = breakdown.values().sum();
    let residual = totals.collected - breakdown_total;
    if residual.abs() >= Money::epsilon() {
        let error = CoreError::BreakdownMismatch {
            breakdown_total,
            collected: totals.collected,
        };
        warn!(%error, %residual, "residual moved to fallback bucket");
        warnings.push(ReportWarning::BreakdownMismatch {
            breakdown_total,
            collected: totals.collected,
        });
        *breakdown
            .entry(METHOD_OTHER.to_string())
            .or_insert_with(Money::zero) += residual;
    }

    (breakdown, warnings)
}

fn finalize(totals: TreasuryTotals, skipped_count: usize) -> ReconciliationReport {
    let (breakdown, warnings) = reconcile_breakdown(&totals);

    let average_ticket = if totals.sale_count == 0 {
        Money::zero()
    } else {
        Money::from_decimal(totals.gross_sales.amount() / Decimal::from(totals.sale_count))
            .rounded()
    };

    ReconciliationReport {
        gross_sales: totals.gross_sales,
        collected: totals.collected,
        breakdown,
        skipped_count,
        warnings,
        sale_count: totals.sale_count,
        average_ticket,
        credit_outstanding_delta: totals.credit_extended - totals.debt_collected,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
