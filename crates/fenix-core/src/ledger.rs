//! # Customer Balance Ledger
//!
//! Per-customer debt / store-credit bookkeeping for credit sales and the
//! change customers leave in their wallet.
//!
//! ## The Golden Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A customer is never simultaneously a debtor and a creditor.            │
//! │                                                                         │
//! │      net = favor − debt                                                 │
//! │                                                                         │
//! │      net ≥ 0  →  { debt: 0,     favor: net }                            │
//! │      net < 0  →  { debt: −net,  favor: 0   }                            │
//! │                                                                         │
//! │  Every mutation ends with this normalization, so exactly one side is    │
//! │  ever nonzero. Both views of a customer (account screen, receivables    │
//! │  report) read the same pair and can never disagree.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Balance Types
// =============================================================================

/// One customer's position with the store. Both fields are non-negative;
/// after normalization at most one is nonzero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBalance {
    /// What the customer owes the store.
    #[ts(type = "number")]
    pub debt: Money,
    /// Store credit the customer can spend (their "wallet").
    #[ts(type = "number")]
    pub favor: Money,
}

/// The effect of one sale event on a customer's balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleImpact {
    /// Store credit the customer spent as tender in this sale.
    #[ts(type = "number")]
    pub wallet_used: Money,
    /// The portion of the sale taken on credit.
    #[ts(type = "number")]
    pub debt_created: Money,
    /// Change the customer chose to leave in their wallet instead of
    /// taking cash.
    #[ts(type = "number")]
    pub change_to_wallet: Money,
}

// =============================================================================
// Balance Arithmetic
// =============================================================================

impl CustomerBalance {
    pub const fn zero() -> Self {
        CustomerBalance {
            debt: Money::zero(),
            favor: Money::zero(),
        }
    }

    /// Signed position: positive when the store owes the customer.
    #[inline]
    pub fn net(&self) -> Money {
        self.favor - self.debt
    }

    /// Collapses the pair onto one side of the ledger.
    fn normalized(self) -> Self {
        let net = self.net();
        if net.is_negative() {
            CustomerBalance {
                debt: -net,
                favor: Money::zero(),
            }
        } else {
            CustomerBalance {
                debt: Money::zero(),
                favor: net,
            }
        }
    }

    /// Applies one sale's effect and renormalizes.
    ///
    /// Order matters within the event: the wallet is spent first, new debt
    /// is booked, and change routed to the wallet pays outstanding debt
    /// before it becomes store credit. The final normalization then makes
    /// the order of *events* irrelevant: only the net survives.
    pub fn apply_sale_impact(self, impact: &SaleImpact) -> Self {
        let mut debt = self.debt;
        let mut favor = self.favor.saturating_sub(impact.wallet_used);

        debt += impact.debt_created;

        // Change pays down debt first; only the remainder is credit.
        let change_after_debt = impact.change_to_wallet.saturating_sub(debt);
        debt = debt.saturating_sub(impact.change_to_wallet);
        favor += change_after_debt;

        let updated = CustomerBalance { debt, favor }.normalized();
        trace!(
            debt = %updated.debt,
            favor = %updated.favor,
            "balance updated"
        );
        updated
    }

    /// Records a payment against outstanding debt (a debt-collection
    /// event). Overpayment becomes store credit via normalization.
    pub fn apply_debt_payment(self, amount: Money) -> Self {
        CustomerBalance {
            debt: self.debt,
            favor: self.favor + amount,
        }
        .normalized()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
