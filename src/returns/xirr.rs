//! XIRR: rate of return for irregularly dated cashflows
//!
//! Cashflow `i` is discounted by `(1 + r)^((date_i - date_0) / basis)` using exact day
//! counts, with a 365 day basis by default.

use chrono::NaiveDate;

use super::solver::{find_rate, Schedule};
use crate::config::SolverConfig;
use crate::error::SolverError;

/// Default day count basis (actual/365)
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Annual XIRR with the default solver settings and an actual/365 day count
pub fn xirr(dates: &[NaiveDate], cashflows: &[f64]) -> Result<f64, SolverError> {
    xirr_with_config(dates, cashflows, &SolverConfig::default(), DAYS_PER_YEAR)
}

/// Calculate the annual XIRR of dated cashflows.
///
/// `dates` and `cashflows` are paired up in order; the first date is the discounting
/// origin.
pub fn xirr_with_config(
    dates: &[NaiveDate],
    cashflows: &[f64],
    config: &SolverConfig,
    day_count_basis: f64,
) -> Result<f64, SolverError> {
    let years = year_fractions(dates, day_count_basis);
    find_rate(cashflows, &years, config)
}

/// NPV of dated cashflows at an annual rate
pub fn xnpv(dates: &[NaiveDate], cashflows: &[f64], rate: f64, day_count_basis: f64) -> f64 {
    let years = year_fractions(dates, day_count_basis);
    Schedule::new(cashflows, &years).npv(rate)
}

/// Years elapsed since the first date, one entry per date
fn year_fractions(dates: &[NaiveDate], day_count_basis: f64) -> Vec<f64> {
    let origin = match dates.first() {
        Some(d) => *d,
        None => return Vec::new(),
    };
    dates
        .iter()
        .map(|d| d.signed_duration_since(origin).num_days() as f64 / day_count_basis)
        .collect()
}
