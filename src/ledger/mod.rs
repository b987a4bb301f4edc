//! Replication ledger: asset and benchmark accounts walked in lockstep

mod account;
mod rows;
mod simulator;

pub use account::{AccountLeg, NavAccount};
pub use rows::LedgerRow;
pub use simulator::{simulate, Simulation};
