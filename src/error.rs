//! Error types for PME calculations

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which of the two simulated accounts a value or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Leg {
    /// The real asset being evaluated
    Asset,
    /// The benchmark mirror (the PME account)
    Benchmark,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Asset => write!(f, "asset"),
            Leg::Benchmark => write!(f, "PME"),
        }
    }
}

/// Failure of a rate-of-return root finder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum SolverError {
    /// All cashflows share one sign, so NPV never crosses zero
    #[error("cashflows never change sign, no rate makes the NPV zero")]
    NoSignChange,

    /// NPV never reaches zero at any rate above -100%
    #[error("no real rate makes the NPV zero")]
    NoRealRoot,

    /// Iteration budget exhausted without meeting the tolerance
    #[error("root finder did not converge")]
    NotConverged,

    /// A root exists but the rate, discount factors or NPV leave the representable
    /// floating-point range
    #[error("NPV magnitude overflowed the representable range")]
    Overflow,
}

/// Errors raised by validation, simulation, solving and price alignment
#[derive(Debug, Error)]
pub enum PmeError {
    #[error("cashflow series is empty")]
    EmptyCashflows,

    #[error("no negative cashflow: at least one investment is needed to seed the accounts")]
    NoInvestment,

    #[error("cashflow {index} is not a finite number")]
    NonFiniteCashflow { index: usize },

    #[error("{leg} price {index} must be positive, got {value}")]
    NonPositivePrice { leg: Leg, index: usize, value: f64 },

    #[error("asset has {prices} prices but benchmark has {benchmark_prices}")]
    PriceLengthMismatch { prices: usize, benchmark_prices: usize },

    #[error("{cashflows} cashflows need {expected} prices, got {prices}")]
    CashflowLengthMismatch {
        cashflows: usize,
        prices: usize,
        expected: usize,
    },

    #[error("{dates} dates given for {prices} prices")]
    DateLengthMismatch { dates: usize, prices: usize },

    #[error("date {index} is earlier than the date before it")]
    UnsortedDates { index: usize },

    #[error("sale of {cashflow} in period {period} against an empty asset position")]
    SellAgainstEmptyPosition { period: usize, cashflow: f64 },

    #[error("{leg} rate of return: {source}")]
    Rate {
        leg: Leg,
        #[source]
        source: SolverError,
    },

    #[error("price history contains no entries")]
    EmptyPriceHistory,

    #[error("price history has no column named {0:?}")]
    UnknownColumn(String),

    #[error("price source: {0}")]
    PriceSource(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PmeError {
    /// Solver failure for one leg, if this is one
    pub fn solver_error(&self) -> Option<(Leg, SolverError)> {
        match self {
            PmeError::Rate { leg, source } => Some((*leg, *source)),
            _ => None,
        }
    }
}
