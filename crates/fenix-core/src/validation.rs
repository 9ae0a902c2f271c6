//! # Validation Module
//!
//! Ledger row validation for the reconciliation engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Type shape, enum tags, numeric parsing                            │
//! │  └── Missing optional fields filled with schema defaults               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business invariants per row                    │
//! │  ├── Required identity, non-negative money                             │
//! │  └── Credit/debt consistency                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Reconciliation invariants (report module)                    │
//! │  └── Breakdown sum vs collected, post-hoc                              │
//! │                                                                         │
//! │  A row failing Layer 2 is skipped and counted, never fatal to the pass │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Transaction, TransactionKind};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Row Validators
// =============================================================================

/// Validates a ledger row against the engine's input contract.
///
/// ## Rules
/// - `id` must be present (non-empty)
/// - monetary fields must not be negative
/// - a sale's outstanding debt can never exceed its face value
/// - only credit sales may carry outstanding debt
/// - every payment line needs a method label and a non-negative amount
///
/// Failures wrap into [`CoreError::MalformedTransaction`] carrying the row
/// id, so a skipped record is identifiable in the logs.
pub fn validate_transaction(tx: &Transaction) -> CoreResult<()> {
    validate_fields(tx).map_err(|source| CoreError::MalformedTransaction {
        id: tx.id.clone(),
        source,
    })
}

fn validate_fields(tx: &Transaction) -> ValidationResult<()> {
    if tx.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if tx.gross_amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "grossAmount".to_string(),
        });
    }

    if tx.outstanding_debt.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "outstandingDebt".to_string(),
        });
    }

    if tx.kind == TransactionKind::Sale {
        if tx.outstanding_debt > tx.gross_amount {
            return Err(ValidationError::DebtExceedsGross {
                debt: tx.outstanding_debt,
                gross: tx.gross_amount,
            });
        }

        if !tx.is_credit && tx.outstanding_debt.is_positive() {
            return Err(ValidationError::Inconsistent {
                field: "outstandingDebt".to_string(),
                reason: "non-credit sale cannot carry outstanding debt".to_string(),
            });
        }
    }

    for line in &tx.payments {
        if line.method.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "payments.method".to_string(),
            });
        }
        if line.nominal_amount.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "payments.nominalAmount".to_string(),
            });
        }
        if line.normalized_amount.is_some_and(|n| n.is_negative()) {
            return Err(ValidationError::MustBeNonNegative {
                field: "payments.normalizedAmount".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{PaymentLine, TransactionStatus};

    fn base_sale() -> Transaction {
        Transaction {
            id: "v1".to_string(),
            kind: TransactionKind::Sale,
            status: TransactionStatus::Completed,
            closing_session_ref: None,
            gross_amount: Money::from_major(29),
            is_credit: false,
            outstanding_debt: Money::zero(),
            payments: vec![],
            transaction_rate: None,
        }
    }

    #[test]
    fn test_valid_sale_passes() {
        assert!(validate_transaction(&base_sale()).is_ok());
    }

    #[test]
    fn test_missing_id_rejected() {
        let mut tx = base_sale();
        tx.id = "  ".to_string();
        let err = validate_transaction(&tx).unwrap_err();
        assert!(matches!(err, CoreError::MalformedTransaction { .. }));
    }

    #[test]
    fn test_negative_gross_rejected() {
        let mut tx = base_sale();
        tx.gross_amount = Money::from_major(-5);
        assert!(validate_transaction(&tx).is_err());
    }

    #[test]
    fn test_debt_exceeding_gross_rejected() {
        let mut tx = base_sale();
        tx.is_credit = true;
        tx.outstanding_debt = Money::from_major(50);
        let err = validate_transaction(&tx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed transaction v1: outstanding debt $50.00 exceeds gross amount $29.00"
        );
    }

    #[test]
    fn test_debt_on_non_credit_sale_rejected() {
        let mut tx = base_sale();
        tx.outstanding_debt = Money::from_major(5);
        assert!(validate_transaction(&tx).is_err());
    }

    #[test]
    fn test_debt_collection_not_bound_by_gross() {
        // a collection row repurposes gross_amount as the collected amount;
        // the sale-only invariants must not fire
        let mut tx = base_sale();
        tx.kind = TransactionKind::DebtCollection;
        tx.outstanding_debt = Money::zero();
        assert!(validate_transaction(&tx).is_ok());
    }

    #[test]
    fn test_unlabeled_payment_line_rejected() {
        let mut tx = base_sale();
        tx.payments.push(PaymentLine {
            method: "".to_string(),
            nominal_amount: Money::from_major(29),
            currency_code: Default::default(),
            normalized_amount: None,
        });
        assert!(validate_transaction(&tx).is_err());
    }
}
