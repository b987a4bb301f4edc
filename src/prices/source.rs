//! Benchmark price lookup capability

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use super::history::{midnight, PriceHistory};
use super::loader::load_price_history;
use crate::error::PmeError;

/// Something that can supply a price history for a ticker over a date range.
///
/// The returned history must be usable for nearest-date lookups across `from..=to`;
/// rows just outside the range are welcome.
pub trait PriceSource: Send + Sync {
    fn fetch(&self, ticker: &str, from: NaiveDate, to: NaiveDate) -> Result<PriceHistory, PmeError>;
}

/// Price histories held in memory, keyed by ticker
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    histories: HashMap<String, PriceHistory>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the history served for `ticker`
    pub fn with_history(mut self, ticker: &str, history: PriceHistory) -> Self {
        self.histories.insert(ticker.to_string(), history);
        self
    }
}

impl PriceSource for InMemoryPriceSource {
    fn fetch(&self, ticker: &str, from: NaiveDate, to: NaiveDate) -> Result<PriceHistory, PmeError> {
        self.histories
            .get(ticker)
            .map(|h| h.window(midnight(from), midnight(to)))
            .ok_or_else(|| PmeError::PriceSource(format!("unknown ticker {:?}", ticker)))
    }
}

/// Serves `<directory>/<ticker>.csv` files
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    directory: PathBuf,
}

impl CsvPriceSource {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.directory.join(format!("{}.csv", ticker))
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch(&self, ticker: &str, from: NaiveDate, to: NaiveDate) -> Result<PriceHistory, PmeError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(PmeError::PriceSource(format!(
                "no price file for {:?} at {}",
                ticker,
                path.display()
            )));
        }
        let history = load_price_history(&path)?;
        Ok(history.window(midnight(from), midnight(to)))
    }
}
