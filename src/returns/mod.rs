//! Rate-of-return solvers: periodic IRR and dated XIRR

mod solver;
pub mod irr;
pub mod xirr;

pub use irr::{annualize, irr, irr_with_config, npv};
pub use xirr::{xirr, xirr_with_config, xnpv, DAYS_PER_YEAR};
