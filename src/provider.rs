//! PME against a benchmark whose prices come from a [`PriceSource`]
//!
//! The benchmark history is fetched over the span of the observation dates, aligned to
//! every date with the nearest-date rule, and then fed to the dated PME.

use chrono::NaiveDate;
use log::info;

use crate::error::PmeError;
use crate::pme::{verbose_xpme, xpme, PmeReport};
use crate::prices::{align_prices_to_dates, PriceSource};

/// Benchmark prices for `dates`, fetched from `source` and aligned by nearest date
pub fn fetch_benchmark_prices<S: PriceSource + ?Sized>(
    dates: &[NaiveDate],
    source: &S,
    ticker: &str,
    column: &str,
) -> Result<Vec<f64>, PmeError> {
    let (first, last) = match (dates.iter().min(), dates.iter().max()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok(Vec::new()),
    };

    info!("fetching {} prices for {} from {} to {}", column, ticker, first, last);
    let history = source.fetch(ticker, first, last)?;
    align_prices_to_dates(dates, &history, column)
}

/// Dated PME with the ledger table, benchmark prices looked up from `source`
pub fn source_verbose_xpme<S: PriceSource + ?Sized>(
    dates: &[NaiveDate],
    cashflows: &[f64],
    prices: &[f64],
    source: &S,
    ticker: &str,
    column: &str,
) -> Result<PmeReport, PmeError> {
    let benchmark_prices = fetch_benchmark_prices(dates, source, ticker, column)?;
    verbose_xpme(dates, cashflows, prices, &benchmark_prices)
}

/// Dated PME IRR, benchmark prices looked up from `source`
pub fn source_xpme<S: PriceSource + ?Sized>(
    dates: &[NaiveDate],
    cashflows: &[f64],
    prices: &[f64],
    source: &S,
    ticker: &str,
    column: &str,
) -> Result<f64, PmeError> {
    let benchmark_prices = fetch_benchmark_prices(dates, source, ticker, column)?;
    xpme(dates, cashflows, prices, &benchmark_prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::{InMemoryPriceSource, PriceHistory, CLOSE};
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn source(entries: &[(NaiveDate, f64)]) -> InMemoryPriceSource {
        InMemoryPriceSource::new()
            .with_history("dummy", PriceHistory::from_daily_closes(entries.iter().copied()))
    }

    #[test]
    fn test_single_entry_history_gives_flat_benchmark() {
        let dates = [date(2012, 1, 1), date(2013, 1, 1)];
        let source = source(&[(date(2012, 1, 1), 20.0)]);

        let report =
            source_verbose_xpme(&dates, &[-100.0], &[1.0, 1.0], &source, "dummy", CLOSE).unwrap();
        assert_abs_diff_eq!(report.pme_irr.unwrap(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(report.asset_irr.unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(report.table.unwrap().shape(), (2, 9));

        let rate = source_xpme(&dates, &[-100.0], &[1.0, 1.0], &source, "dummy", CLOSE).unwrap();
        assert_abs_diff_eq!(rate, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_far_away_nearest_entry_is_used() {
        // 2013-01-01 is a year away from both entries but 2012-01-02 is still the closest
        let dates = [date(2012, 1, 1), date(2013, 1, 1)];
        let source = source(&[(date(2012, 1, 1), 20.0), (date(2012, 1, 2), 40.0)]);

        let report =
            source_verbose_xpme(&dates, &[-100.0], &[1.0, 1.0], &source, "dummy", CLOSE).unwrap();
        let pme_pct = (report.pme_irr.unwrap() * 10000.0).round() / 100.0;
        assert_eq!(pme_pct, 99.62);
        assert_abs_diff_eq!(report.asset_irr.unwrap(), 0.0, epsilon = 1e-9);

        let rate = source_xpme(&dates, &[-100.0], &[1.0, 1.0], &source, "dummy", CLOSE).unwrap();
        assert_eq!((rate * 10000.0).round() / 100.0, 99.62);
    }

    #[test]
    fn test_unsorted_dates_fetch_full_span() {
        let source = source(&[(date(2012, 1, 1), 20.0), (date(2013, 1, 1), 30.0)]);
        let prices = fetch_benchmark_prices(
            &[date(2013, 1, 1), date(2012, 1, 1)],
            &source,
            "dummy",
            CLOSE,
        )
        .unwrap();
        assert_eq!(prices, vec![30.0, 20.0]);
    }

    #[test]
    fn test_unknown_ticker() {
        let source = source(&[(date(2012, 1, 1), 20.0)]);
        let err = source_xpme(
            &[date(2012, 1, 1), date(2013, 1, 1)],
            &[-100.0],
            &[1.0, 1.0],
            &source,
            "MSFT",
            CLOSE,
        )
        .unwrap_err();
        assert!(matches!(err, PmeError::PriceSource(_)));
    }
}
