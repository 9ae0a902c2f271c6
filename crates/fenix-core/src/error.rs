//! # Error Types
//!
//! Domain-specific error types for fenix-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fenix-core errors (this file)                                         │
//! │  ├── CoreError        - Reconciliation domain errors                   │
//! │  └── ValidationError  - Malformed ledger row failures                  │
//! │                                                                         │
//! │  Propagation policy (per record):                                      │
//! │    InvalidRate / MalformedTransaction                                  │
//! │      → the offending record is skipped, counted, logged                │
//! │      → the accumulation pass continues                                 │
//! │    BreakdownMismatch                                                   │
//! │      → recoverable; residual lands in the "other" bucket               │
//! │      → surfaced as a warning on the report                             │
//! │                                                                        │
//! │  NO error escapes the top-level reconcile() call.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (transaction id, rate, amounts)
//! 3. Errors are enum variants, never String

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Reconciliation domain errors.
///
/// These represent per-record failures or post-hoc invariant violations.
/// They are caught inside `reconcile()` and never abort a whole pass.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A conversion was required but the exchange rate is unusable.
    ///
    /// ## When This Occurs
    /// - A VES payment line must be normalized and the resolved rate is ≤ 0
    /// - A local-currency projection is requested with a rate of ≤ 0
    #[error("Invalid exchange rate {0}: rate must be positive")]
    InvalidRate(Decimal),

    /// A ledger row is missing required data or violates a basic invariant.
    ///
    /// Fatal to that single record only; the pass continues.
    #[error("Malformed transaction {id}: {source}")]
    MalformedTransaction {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// The per-method breakdown disagrees with collected cash after
    /// correction. Indicates an upstream classification defect, not a
    /// normal operating condition.
    #[error(
        "Breakdown mismatch: methods sum to {breakdown_total} but collected is {collected}"
    )]
    BreakdownMismatch {
        breakdown_total: Money,
        collected: Money,
    },

    /// A transaction was already attributed to a closing session.
    ///
    /// The closing reference is written exactly once; a second closing
    /// attempting to claim the same row is a caller bug.
    #[error("Transaction {id} already belongs to closing session {closing_session}")]
    AlreadyClosed { id: String, closing_session: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Ledger row validation errors.
///
/// These occur when a stored record doesn't meet the engine's input
/// contract. Used for early validation before classification runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A monetary field is negative where it may not be.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// A sale claims more outstanding debt than its face value.
    #[error("outstanding debt {debt} exceeds gross amount {gross}")]
    DebtExceedsGross { debt: Money, gross: Money },

    /// Field combination is inconsistent.
    #[error("{field} is invalid: {reason}")]
    Inconsistent { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
