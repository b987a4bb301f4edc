//! Ledger output structures

use serde::Serialize;

use super::account::AccountLeg;

/// One row of the replication ledger: a period, or the terminal liquidation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    /// Period number (0-indexed); the terminal row carries N
    pub period: usize,

    /// Raw transaction-account cashflow; `None` on the terminal row
    pub account_cashflow: Option<f64>,

    /// Real asset account
    pub asset: AccountLeg,

    /// Benchmark mirror account
    pub benchmark: AccountLeg,
}

impl LedgerRow {
    /// Whether this is the final liquidation row
    pub fn is_terminal(&self) -> bool {
        self.account_cashflow.is_none()
    }
}
