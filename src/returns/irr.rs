//! Internal Rate of Return (IRR) for evenly spaced cashflows
//!
//! Cashflow `i` is discounted by `(1 + r)^i`.

use super::solver::find_rate;
use crate::config::SolverConfig;
use crate::error::SolverError;

/// Periodic IRR with the default solver settings
pub fn irr(cashflows: &[f64]) -> Result<f64, SolverError> {
    irr_with_config(cashflows, &SolverConfig::default())
}

/// Calculate the per-period IRR of `cashflows` using Newton-Raphson with a bisection
/// fallback.
///
/// # Returns
/// * `Ok(rate)` - Rate per period as a decimal (e.g., 0.05 for 5%)
/// * `Err(SolverError)` - No sign change, no real root, no convergence, or a root too
///   extreme to represent
pub fn irr_with_config(cashflows: &[f64], config: &SolverConfig) -> Result<f64, SolverError> {
    let periods: Vec<f64> = (0..cashflows.len()).map(|t| t as f64).collect();
    find_rate(cashflows, &periods, config)
}

/// NPV of evenly spaced cashflows at a periodic rate
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Convert a periodic rate to an annual one, e.g. 12 periods per year for monthly data
pub fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}
