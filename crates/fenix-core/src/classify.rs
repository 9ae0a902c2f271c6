//! # Transaction Classifier
//!
//! Resolves a raw ledger row into a typed, normalized view exactly once.
//! Downstream components consume only the classified variant - nobody
//! shape-sniffs raw rows after this point.
//!
//! ```text
//! Transaction ──► classify ──┬──► Eligible(ClassifiedTransaction) ──► fold
//!                            └──► Excluded(Voided | ForeignClosing) ──► drop
//! ```

use tracing::trace;

use crate::currency::{self, ExchangeRateContext};
use crate::error::CoreResult;
use crate::money::Money;
use crate::treasury::METHOD_CREDIT;
use crate::types::{Transaction, TransactionKind, TransactionStatus};

// =============================================================================
// Classified View
// =============================================================================

/// Outcome of classification.
#[derive(Debug, Clone)]
pub enum Classified {
    /// Counts toward the session under audit.
    Eligible(ClassifiedTransaction),
    /// Contributes nothing to any total.
    Excluded(ExclusionReason),
}

/// Why a row was excluded. Exclusion is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Row was voided.
    Voided,
    /// Row was already settled under a different closing session.
    ForeignClosing,
}

/// A transaction resolved to its economic meaning, with every monetary
/// figure already in reference currency.
#[derive(Debug, Clone)]
pub struct ClassifiedTransaction {
    pub id: String,
    pub kind: ClassifiedKind,
    /// Cash tender lines (reference currency). Empty when the row carries
    /// no usable lines; the accumulator then falls back to lump labels.
    pub cash_lines: Vec<CashLine>,
}

/// The tagged variant the rest of the pipeline dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedKind {
    Sale {
        is_credit: bool,
        gross: Money,
        outstanding_debt: Money,
    },
    DebtCollection {
        amount: Money,
    },
}

/// One normalized tender line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashLine {
    pub method: String,
    pub amount: Money,
}

// =============================================================================
// Label Heuristics
// =============================================================================
// Legacy rows have no medium tag on their lines; the channel name is the
// only signal. Mirrors how the store's configured method names read.

fn is_credit_label(method: &str) -> bool {
    let m = method.to_lowercase();
    m.contains("credit") || m.contains("crédito") || m.contains("credito")
}

fn is_internal_label(method: &str) -> bool {
    let m = method.to_lowercase();
    m.contains("internal") || m.contains("interno")
}

// =============================================================================
// Classification
// =============================================================================

/// Classifies one ledger row against the session under audit.
///
/// - Voided rows and rows settled under a *different* closing session are
///   `Excluded`.
/// - `auditing_session` is `None` when auditing the currently open session;
///   eligible rows then have no closing reference at all.
/// - Classification is pure and total on validated input. The only
///   fallible part is normalizing a legacy payment line that never had its
///   reference-currency amount persisted; that conversion follows the
///   historical-rate policy and can surface `InvalidRate`.
pub fn classify(
    tx: &Transaction,
    auditing_session: Option<&str>,
    ctx: &ExchangeRateContext,
) -> CoreResult<Classified> {
    if tx.status == TransactionStatus::Voided {
        return Ok(Classified::Excluded(ExclusionReason::Voided));
    }

    if let Some(closing) = tx.closing_session_ref.as_deref() {
        if auditing_session != Some(closing) {
            return Ok(Classified::Excluded(ExclusionReason::ForeignClosing));
        }
    }

    let kind = match tx.kind {
        TransactionKind::Sale => ClassifiedKind::Sale {
            is_credit: tx.is_credit,
            gross: tx.gross_amount,
            outstanding_debt: tx.outstanding_debt,
        },
        TransactionKind::DebtCollection => ClassifiedKind::DebtCollection {
            amount: tx.gross_amount,
        },
    };

    let cash_lines = match kind {
        // Ghost payments: schema generations that attached a face-value
        // "Crédito" line to a flagged credit sale. The money never entered
        // the till; the implicit-payment rule in the accumulator covers
        // whatever portion actually did.
        ClassifiedKind::Sale { is_credit: true, .. } => Vec::new(),
        _ => normalize_lines(tx, ctx)?,
    };

    trace!(id = %tx.id, ?kind, lines = cash_lines.len(), "classified");

    Ok(Classified::Eligible(ClassifiedTransaction {
        id: tx.id.clone(),
        kind,
        cash_lines,
    }))
}

/// Resolves every usable tender line to reference currency.
///
/// The persisted `normalized_amount` always wins - it is the write-once
/// historical fact. Only legacy lines without one are converted here, at
/// the rate in force when the transaction was recorded.
fn normalize_lines(tx: &Transaction, ctx: &ExchangeRateContext) -> CoreResult<Vec<CashLine>> {
    let rate = currency::resolve_rate(tx.transaction_rate, ctx);
    let mut lines = Vec::with_capacity(tx.payments.len());

    for line in &tx.payments {
        if is_internal_label(&line.method) {
            continue;
        }

        let amount = match line.normalized_amount {
            Some(normalized) => normalized,
            None => currency::normalize(line.nominal_amount, line.currency_code, rate)?,
        };

        // Collapse every credit-ish channel name onto one bucket so the
        // reporter's double-count correction has a single target.
        let method = if is_credit_label(&line.method) {
            METHOD_CREDIT.to_string()
        } else {
            line.method.clone()
        };

        lines.push(CashLine { method, amount });
    }

    Ok(lines)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CurrencyCode, PaymentLine};
    use rust_decimal_macros::dec;

    fn ctx() -> ExchangeRateContext {
        ExchangeRateContext::new(dec!(200))
    }

    fn sale(id: &str, gross: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind: TransactionKind::Sale,
            status: TransactionStatus::Completed,
            closing_session_ref: None,
            gross_amount: Money::from_major(gross),
            is_credit: false,
            outstanding_debt: Money::zero(),
            payments: vec![],
            transaction_rate: None,
        }
    }

    fn eligible(c: Classified) -> ClassifiedTransaction {
        match c {
            Classified::Eligible(tx) => tx,
            Classified::Excluded(reason) => panic!("unexpectedly excluded: {reason:?}"),
        }
    }

    #[test]
    fn test_voided_excluded() {
        let mut tx = sale("v1", 500);
        tx.status = TransactionStatus::Voided;
        let c = classify(&tx, None, &ctx()).unwrap();
        assert!(matches!(c, Classified::Excluded(ExclusionReason::Voided)));
    }

    #[test]
    fn test_foreign_closing_excluded() {
        let mut tx = sale("v1", 500);
        tx.closing_session_ref = Some("prior".to_string());
        let c = classify(&tx, None, &ctx()).unwrap();
        assert!(matches!(
            c,
            Classified::Excluded(ExclusionReason::ForeignClosing)
        ));
    }

    #[test]
    fn test_own_closing_still_eligible() {
        // re-running the audit for the closing currently being sealed
        let mut tx = sale("v1", 20);
        tx.closing_session_ref = Some("corte_9".to_string());
        let c = classify(&tx, Some("corte_9"), &ctx()).unwrap();
        assert!(matches!(c, Classified::Eligible(_)));
    }

    #[test]
    fn test_debt_collection_kind() {
        let mut tx = sale("ab1", 25);
        tx.kind = TransactionKind::DebtCollection;
        let c = eligible(classify(&tx, None, &ctx()).unwrap());
        assert_eq!(
            c.kind,
            ClassifiedKind::DebtCollection {
                amount: Money::from_major(25)
            }
        );
    }

    #[test]
    fn test_credit_sale_drops_ghost_lines() {
        let mut tx = sale("v2", 50);
        tx.is_credit = true;
        tx.outstanding_debt = Money::from_major(50);
        tx.payments.push(PaymentLine {
            method: "Crédito".to_string(),
            nominal_amount: Money::from_major(50),
            currency_code: CurrencyCode::Usd,
            normalized_amount: Some(Money::from_major(50)),
        });

        let c = eligible(classify(&tx, None, &ctx()).unwrap());
        assert!(c.cash_lines.is_empty());
    }

    #[test]
    fn test_persisted_normalized_amount_wins() {
        let mut tx = sale("v3", 25);
        // entry-time normalization said $25; a different current rate must
        // not change that
        tx.payments.push(PaymentLine {
            method: "Pago Móvil".to_string(),
            nominal_amount: Money::from_major(5000),
            currency_code: CurrencyCode::Ves,
            normalized_amount: Some(Money::from_major(25)),
        });

        let c = eligible(classify(&tx, None, &ExchangeRateContext::new(dec!(500))).unwrap());
        assert_eq!(c.cash_lines[0].amount, Money::from_major(25));
    }

    #[test]
    fn test_legacy_line_uses_historical_rate() {
        let mut tx = sale("old", 50);
        tx.transaction_rate = Some(dec!(100));
        tx.payments.push(PaymentLine {
            method: "Efectivo (Bs)".to_string(),
            nominal_amount: Money::from_major(5000),
            currency_code: CurrencyCode::Ves,
            normalized_amount: None,
        });

        // current rate is 200; the stored rate of 100 must win: 5000/100 = 50
        let c = eligible(classify(&tx, None, &ctx()).unwrap());
        assert_eq!(c.cash_lines[0].amount, Money::from_major(50));
    }

    #[test]
    fn test_legacy_line_without_any_rate_fails_per_record() {
        let mut tx = sale("old2", 50);
        tx.payments.push(PaymentLine {
            method: "Efectivo (Bs)".to_string(),
            nominal_amount: Money::from_major(5000),
            currency_code: CurrencyCode::Ves,
            normalized_amount: None,
        });

        let err = classify(&tx, None, &ExchangeRateContext::new(dec!(0))).unwrap_err();
        assert!(matches!(err, crate::CoreError::InvalidRate(_)));
    }

    #[test]
    fn test_credit_labels_collapse_and_internal_lines_drop() {
        let mut tx = sale("v4", 29);
        tx.payments = vec![
            PaymentLine {
                method: "Credito Tienda".to_string(),
                nominal_amount: Money::from_major(9),
                currency_code: CurrencyCode::Usd,
                normalized_amount: Some(Money::from_major(9)),
            },
            PaymentLine {
                method: "Ajuste Interno".to_string(),
                nominal_amount: Money::from_major(99),
                currency_code: CurrencyCode::Usd,
                normalized_amount: Some(Money::from_major(99)),
            },
            PaymentLine {
                method: "Efectivo".to_string(),
                nominal_amount: Money::from_major(20),
                currency_code: CurrencyCode::Usd,
                normalized_amount: Some(Money::from_major(20)),
            },
        ];

        let c = eligible(classify(&tx, None, &ctx()).unwrap());
        let methods: Vec<_> = c.cash_lines.iter().map(|l| l.method.as_str()).collect();
        assert_eq!(methods, vec![METHOD_CREDIT, "Efectivo"]);
    }
}
