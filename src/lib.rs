//! Public Market Equivalent (PME) - compare an investment against a benchmark
//!
//! This library provides:
//! - Replication of an asset's cashflows into a benchmark account (buys copied at the
//!   same notional, sells at the same proportion of NAV)
//! - Periodic IRR and date-based XIRR of both accounts
//! - Nearest-date alignment of external benchmark price series
//! - Ledger tables for auditing a PME calculation
//! - Parallel batch evaluation

pub mod batch;
pub mod config;
pub mod error;
pub mod ledger;
pub mod pme;
pub mod prices;
pub mod provider;
pub mod returns;
pub mod trace;
pub mod validate;

// Re-export commonly used types
pub use batch::{PmeRequest, PmeRunner};
pub use config::{PmeConfig, SolverConfig};
pub use error::{Leg, PmeError, SolverError};
pub use ledger::{LedgerRow, Simulation};
pub use pme::{evaluate, pme, verbose_pme, verbose_xpme, xpme, PmeInputs, PmeReport};
pub use prices::{align_prices_to_dates, PriceHistory, PriceSource};
pub use provider::{source_verbose_xpme, source_xpme};
pub use trace::LedgerTable;
