//! # Treasury Accumulator
//!
//! Folds the classified stream into the two numbers that must never
//! disagree anywhere in the application: **gross sales** and **cash
//! collected**, plus the incremental per-method breakdown.
//!
//! ## Settlement Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 WHAT COUNTS WHERE                                       │
//! │                                                                         │
//! │                       gross_sales          collected                    │
//! │  Cash sale            + gross              + gross                      │
//! │  Credit sale          + gross (face)       + (gross − debt) if > ε      │
//! │  Debt collection      nothing              + amount                     │
//! │                                                                         │
//! │  The receivable portion of a credit sale is NOT cash. The later        │
//! │  debt collection that settles it is cash but NOT revenue - counting    │
//! │  it again as a sale is the classic double-count.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Accumulation is commutative and associative: replaying the same set of
//! transactions in any order yields identical totals.

use std::collections::BTreeMap;

use crate::classify::{ClassifiedKind, ClassifiedTransaction};
use crate::money::Money;

// =============================================================================
// Breakdown Labels
// =============================================================================
// Fallback bucket names used when a row carries no explicit tender lines.
// Explicit lines always take precedence over these.

/// Lump bucket for a cash sale without explicit tender lines.
pub const METHOD_CASH_SALE: &str = "cash-sale";

/// The paid-up-front portion of a credit sale, inferred from
/// `gross − outstanding_debt`.
pub const METHOD_CREDIT_IMPLICIT: &str = "credit-implicit-payment";

/// Lump bucket for a debt collection without explicit tender lines.
pub const METHOD_DEBT_COLLECTION: &str = "debt-collection";

/// Face-value credit bucket produced by legacy credit-labeled tender
/// lines. Target of the reporter's double-count correction.
pub const METHOD_CREDIT: &str = "credit";

/// Residual bucket of last resort when the breakdown cannot be made to
/// agree with collected cash.
pub const METHOD_OTHER: &str = "other";

// =============================================================================
// Accumulator
// =============================================================================

/// Running totals over one reconciliation pass.
///
/// One accumulator per session audit; a single session's accumulation is
/// exactly one logical pass (spawning several accumulators against the
/// same open session is a caller bug).
#[derive(Debug, Default)]
pub struct TreasuryAccumulator {
    gross_sales: Money,
    collected: Money,
    breakdown: BTreeMap<String, Money>,
    /// Total received via debt-collection events, tracked separately for
    /// the reporter's credit-bucket correction.
    debt_collected: Money,
    /// New receivables recorded this session (outstanding debt on credit
    /// sales).
    credit_extended: Money,
    sale_count: u64,
}

/// Final accumulator output handed to the reporter.
#[derive(Debug)]
pub struct TreasuryTotals {
    pub gross_sales: Money,
    pub collected: Money,
    pub breakdown: BTreeMap<String, Money>,
    pub debt_collected: Money,
    pub credit_extended: Money,
    pub sale_count: u64,
}

impl TreasuryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one classified transaction into the running totals.
    pub fn accumulate(&mut self, tx: &ClassifiedTransaction) {
        match tx.kind {
            ClassifiedKind::Sale {
                is_credit,
                gross,
                outstanding_debt,
            } => {
                // Fiscal gross includes credit sales at full face value.
                self.gross_sales += gross;
                self.sale_count += 1;

                if is_credit {
                    self.credit_extended += outstanding_debt;

                    // Whatever was paid up front is cash; the receivable
                    // is not.
                    let implied_paid = gross.saturating_sub(outstanding_debt);
                    if implied_paid > Money::epsilon() {
                        self.collected += implied_paid;
                        self.add(METHOD_CREDIT_IMPLICIT, implied_paid);
                    }
                } else {
                    self.collected += gross;
                    if tx.cash_lines.is_empty() {
                        self.add(METHOD_CASH_SALE, gross);
                    } else {
                        for line in &tx.cash_lines {
                            self.add(&line.method, line.amount);
                        }
                    }
                }
            }
            ClassifiedKind::DebtCollection { amount } => {
                // Settlement of an existing receivable: cash in, zero new
                // revenue.
                self.collected += amount;
                self.debt_collected += amount;

                if tx.cash_lines.is_empty() {
                    self.add(METHOD_DEBT_COLLECTION, amount);
                } else {
                    for line in &tx.cash_lines {
                        self.add(&line.method, line.amount);
                    }
                }
            }
        }
    }

    /// Fiscal total of goods sold so far.
    #[inline]
    pub fn gross_sales(&self) -> Money {
        self.gross_sales
    }

    /// Cash received into the till so far.
    #[inline]
    pub fn collected(&self) -> Money {
        self.collected
    }

    /// Consumes the accumulator into its terminal totals.
    pub fn finish(self) -> TreasuryTotals {
        TreasuryTotals {
            gross_sales: self.gross_sales,
            collected: self.collected,
            breakdown: self.breakdown,
            debt_collected: self.debt_collected,
            credit_extended: self.credit_extended,
            sale_count: self.sale_count,
        }
    }

    fn add(&mut self, method: &str, amount: Money) {
        *self
            .breakdown
            .entry(method.to_string())
            .or_insert_with(Money::zero) += amount;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
