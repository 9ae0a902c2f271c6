//! # fenix-core: Pure Reconciliation Engine for Fenix POS
//!
//! This crate is the **heart** of Fenix POS treasury reporting. It contains
//! the whole reconciliation pipeline as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fenix POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Frontend (Dashboard / Cierre)                  │   │
//! │  │     Session totals ──► Method chart ──► Closing receipt        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fenix-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   Transaction rows                                              │   │
//! │  │        │                                                        │   │
//! │  │        ▼                                                        │   │
//! │  │   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   │   │
//! │  │   │ currency │──►│ classify │──►│ treasury │──►│  report  │   │   │
//! │  │   │normalize │   │ resolve  │   │   fold   │   │reconcile │   │   │
//! │  │   └──────────┘   └──────────┘   └──────────┘   └──────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     Ledger store (host app)                     │   │
//! │  │          fetches rows, persists closings, feeds rates           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Transaction, PaymentLine, ClosingSession)
//! - [`money`] - Money type with exact decimal arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Per-row input contract
//! - [`currency`] - VES/USD normalization with the historical-rate policy
//! - [`classify`] - Raw row → typed, normalized classified view
//! - [`treasury`] - The commutative fold into gross / collected / breakdown
//! - [`report`] - Breakdown reconciliation and the final report
//! - [`ledger`] - Customer debt / store-credit balance arithmetic
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, clock access is FORBIDDEN here
//! 3. **Exact Money**: All monetary values are exact decimals, rounded only for display
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Failure Isolation**: A bad record is skipped and counted; the pass survives
//!
//! ## Example Usage
//!
//! ```rust
//! use fenix_core::currency::ExchangeRateContext;
//! use fenix_core::money::Money;
//! use fenix_core::report::reconcile;
//! use fenix_core::types::Transaction;
//! use rust_decimal::Decimal;
//!
//! let rows: Vec<Transaction> = serde_json::from_str(
//!     r#"[{ "id": "v1", "grossAmount": 20 }]"#,
//! ).unwrap();
//!
//! let ctx = ExchangeRateContext::new(Decimal::from(200));
//! let report = reconcile(&rows, None, &ctx);
//!
//! assert_eq!(report.gross_sales, Money::from_major(20));
//! assert_eq!(report.collected, Money::from_major(20));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classify;
pub mod currency;
pub mod error;
pub mod ledger;
pub mod money;
pub mod report;
pub mod treasury;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fenix_core::Money` instead of
// `use fenix_core::money::Money`

pub use classify::{classify, Classified, ClassifiedKind, ClassifiedTransaction};
pub use currency::ExchangeRateContext;
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{CustomerBalance, SaleImpact};
pub use money::Money;
pub use report::{reconcile, ReconciliationReport, ReportWarning};
pub use treasury::{TreasuryAccumulator, TreasuryTotals};
pub use types::*;
