//! Batch runner for evaluating many PME requests
//!
//! Every evaluation is independent, so requests are spread over the rayon thread pool.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::config::PmeConfig;
use crate::error::PmeError;
use crate::pme::{evaluate, PmeInputs, PmeReport};

/// Owned inputs of one PME evaluation
#[derive(Debug, Clone)]
pub struct PmeRequest {
    /// Observation dates for XIRR; `None` for evenly spaced periods
    pub dates: Option<Vec<NaiveDate>>,
    pub cashflows: Vec<f64>,
    pub prices: Vec<f64>,
    pub benchmark_prices: Vec<f64>,
}

impl PmeRequest {
    pub fn periodic(cashflows: Vec<f64>, prices: Vec<f64>, benchmark_prices: Vec<f64>) -> Self {
        Self {
            dates: None,
            cashflows,
            prices,
            benchmark_prices,
        }
    }

    pub fn dated(
        dates: Vec<NaiveDate>,
        cashflows: Vec<f64>,
        prices: Vec<f64>,
        benchmark_prices: Vec<f64>,
    ) -> Self {
        Self {
            dates: Some(dates),
            cashflows,
            prices,
            benchmark_prices,
        }
    }

    pub fn inputs(&self) -> PmeInputs<'_> {
        PmeInputs {
            dates: self.dates.as_deref(),
            cashflows: &self.cashflows,
            prices: &self.prices,
            benchmark_prices: &self.benchmark_prices,
        }
    }
}

/// Evaluates batches of requests with one shared configuration
///
/// # Example
/// ```ignore
/// let runner = PmeRunner::new(PmeConfig::terse());
/// let reports = runner.run_batch(&requests);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PmeRunner {
    config: PmeConfig,
}

impl PmeRunner {
    pub fn new(config: PmeConfig) -> Self {
        Self { config }
    }

    /// Evaluate a single request
    pub fn run(&self, request: &PmeRequest) -> Result<PmeReport, PmeError> {
        evaluate(request.inputs(), &self.config)
    }

    /// Evaluate all requests in parallel; results come back in input order
    pub fn run_batch(&self, requests: &[PmeRequest]) -> Vec<Result<PmeReport, PmeError>> {
        requests.par_iter().map(|r| self.run(r)).collect()
    }

    pub fn config(&self) -> &PmeConfig {
        &self.config
    }
}
