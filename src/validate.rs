//! Structural checks on PME inputs, run before any simulation

use chrono::NaiveDate;

use crate::error::{Leg, PmeError};

/// Validate cashflows against asset and benchmark prices.
///
/// Rejects, in this order: an empty cashflow series, non-finite cashflows, a series with
/// no negative (buy) cashflow, non-positive prices on either leg, and mismatched lengths
/// (`prices` and `benchmark_prices` must be one longer than `cashflows`).
pub fn validate_inputs(
    cashflows: &[f64],
    prices: &[f64],
    benchmark_prices: &[f64],
) -> Result<(), PmeError> {
    if cashflows.is_empty() {
        return Err(PmeError::EmptyCashflows);
    }

    if let Some(index) = cashflows.iter().position(|cf| !cf.is_finite()) {
        return Err(PmeError::NonFiniteCashflow { index });
    }

    if !cashflows.iter().any(|&cf| cf < 0.0) {
        return Err(PmeError::NoInvestment);
    }

    check_positive(prices, Leg::Asset)?;
    check_positive(benchmark_prices, Leg::Benchmark)?;

    if prices.len() != benchmark_prices.len() {
        return Err(PmeError::PriceLengthMismatch {
            prices: prices.len(),
            benchmark_prices: benchmark_prices.len(),
        });
    }

    if cashflows.len() + 1 != prices.len() {
        return Err(PmeError::CashflowLengthMismatch {
            cashflows: cashflows.len(),
            prices: prices.len(),
            expected: cashflows.len() + 1,
        });
    }

    Ok(())
}

/// Validate the date series of the dated variant on top of [`validate_inputs`].
///
/// Dates must line up 1:1 with prices and be non-decreasing; equal neighbours are fine.
pub fn validate_dated_inputs(
    dates: &[NaiveDate],
    cashflows: &[f64],
    prices: &[f64],
    benchmark_prices: &[f64],
) -> Result<(), PmeError> {
    validate_inputs(cashflows, prices, benchmark_prices)?;

    if dates.len() != prices.len() {
        return Err(PmeError::DateLengthMismatch {
            dates: dates.len(),
            prices: prices.len(),
        });
    }

    if let Some(index) = dates.windows(2).position(|pair| pair[1] < pair[0]) {
        return Err(PmeError::UnsortedDates { index: index + 1 });
    }

    Ok(())
}

fn check_positive(prices: &[f64], leg: Leg) -> Result<(), PmeError> {
    // NaN fails `> 0.0` as well
    match prices.iter().position(|&p| !(p > 0.0 && p.is_finite())) {
        Some(index) => Err(PmeError::NonPositivePrice {
            leg,
            index,
            value: prices[index],
        }),
        None => Ok(()),
    }
}
