//! Public Market Equivalent entry points
//!
//! Validation, simulation and both rate solves run through [`evaluate`]. The verbose
//! and terse entry points differ only in whether the ledger table is kept.

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::config::PmeConfig;
use crate::error::{Leg, PmeError, SolverError};
use crate::ledger::simulate;
use crate::returns::{irr_with_config, xirr_with_config};
use crate::trace::LedgerTable;
use crate::validate::{validate_dated_inputs, validate_inputs};

/// Borrowed inputs of one PME evaluation.
///
/// Cashflows use the transaction-account sign: negative buys the asset, positive sells
/// it. `prices` and `benchmark_prices` hold one more entry than `cashflows`, the last
/// being the valuation (reference) date. With `dates`, cashflow `i` happens on
/// `dates[i]` and XIRR is used; without, periods are evenly spaced and IRR is used.
#[derive(Debug, Clone, Copy)]
pub struct PmeInputs<'a> {
    pub dates: Option<&'a [NaiveDate]>,
    pub cashflows: &'a [f64],
    pub prices: &'a [f64],
    pub benchmark_prices: &'a [f64],
}

impl<'a> PmeInputs<'a> {
    pub fn periodic(cashflows: &'a [f64], prices: &'a [f64], benchmark_prices: &'a [f64]) -> Self {
        Self {
            dates: None,
            cashflows,
            prices,
            benchmark_prices,
        }
    }

    pub fn dated(
        dates: &'a [NaiveDate],
        cashflows: &'a [f64],
        prices: &'a [f64],
        benchmark_prices: &'a [f64],
    ) -> Self {
        Self {
            dates: Some(dates),
            cashflows,
            prices,
            benchmark_prices,
        }
    }
}

/// Result of a PME evaluation.
///
/// Each rate is solved independently, so one leg may fail while the other succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct PmeReport {
    /// IRR (periodic) or XIRR (dated) of the benchmark mirror's cashflows
    pub pme_irr: Result<f64, SolverError>,

    /// IRR (periodic) or XIRR (dated) of the asset's own cashflows
    pub asset_irr: Result<f64, SolverError>,

    /// Ledger table, present when the evaluation ran verbose
    pub table: Option<LedgerTable>,
}

impl PmeReport {
    /// PME rate, with a solver failure tagged as the benchmark leg's
    pub fn pme_rate(&self) -> Result<f64, PmeError> {
        self.pme_irr.map_err(|source| PmeError::Rate {
            leg: Leg::Benchmark,
            source,
        })
    }

    /// Asset rate, with a solver failure tagged as the asset leg's
    pub fn asset_rate(&self) -> Result<f64, PmeError> {
        self.asset_irr.map_err(|source| PmeError::Rate {
            leg: Leg::Asset,
            source,
        })
    }
}

/// Validate, simulate and solve both legs.
///
/// Fails when the inputs are invalid, when a sale hits an empty asset position, or
/// when neither rate can be solved (the PME leg's failure is reported then).
pub fn evaluate(inputs: PmeInputs<'_>, config: &PmeConfig) -> Result<PmeReport, PmeError> {
    let PmeInputs {
        dates,
        cashflows,
        prices,
        benchmark_prices,
    } = inputs;

    match dates {
        Some(dates) => validate_dated_inputs(dates, cashflows, prices, benchmark_prices)?,
        None => validate_inputs(cashflows, prices, benchmark_prices)?,
    }

    let simulation = simulate(cashflows, prices, benchmark_prices)?;

    let solve = |series: &[f64]| match dates {
        Some(dates) => xirr_with_config(dates, series, &config.solver, config.day_count_basis),
        None => irr_with_config(series, &config.solver),
    };
    let pme_cashflows = simulation.pme_cashflows();
    let asset_cashflows = simulation.asset_cashflows();
    let pme_irr = solve(&pme_cashflows[..]);
    let asset_irr = solve(&asset_cashflows[..]);

    debug!("PME rate {:?}, asset rate {:?}", pme_irr, asset_irr);

    if let (Err(source), Err(_)) = (pme_irr, asset_irr) {
        return Err(PmeError::Rate {
            leg: Leg::Benchmark,
            source,
        });
    }

    let table = config.verbose.then(|| match dates {
        Some(dates) => LedgerTable::from_dates(&simulation, dates),
        None => LedgerTable::from_periods(&simulation),
    });

    Ok(PmeReport {
        pme_irr,
        asset_irr,
        table,
    })
}

/// PME for evenly spaced cashflows, with the ledger table
pub fn verbose_pme(
    cashflows: &[f64],
    prices: &[f64],
    benchmark_prices: &[f64],
) -> Result<PmeReport, PmeError> {
    evaluate(
        PmeInputs::periodic(cashflows, prices, benchmark_prices),
        &PmeConfig::default(),
    )
}

/// PME IRR for evenly spaced cashflows
pub fn pme(cashflows: &[f64], prices: &[f64], benchmark_prices: &[f64]) -> Result<f64, PmeError> {
    evaluate(
        PmeInputs::periodic(cashflows, prices, benchmark_prices),
        &PmeConfig::terse(),
    )?
    .pme_rate()
}

/// PME for dated cashflows (XIRR), with the ledger table indexed by date
pub fn verbose_xpme(
    dates: &[NaiveDate],
    cashflows: &[f64],
    prices: &[f64],
    benchmark_prices: &[f64],
) -> Result<PmeReport, PmeError> {
    evaluate(
        PmeInputs::dated(dates, cashflows, prices, benchmark_prices),
        &PmeConfig::default(),
    )
}

/// PME XIRR for dated cashflows
pub fn xpme(
    dates: &[NaiveDate],
    cashflows: &[f64],
    prices: &[f64],
    benchmark_prices: &[f64],
) -> Result<f64, PmeError> {
    evaluate(
        PmeInputs::dated(dates, cashflows, prices, benchmark_prices),
        &PmeConfig::terse(),
    )?
    .pme_rate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::returns::{npv, xnpv, DAYS_PER_YEAR};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const CASHFLOWS: [f64; 4] = [-100.0, -50.0, 60.0, 100.0];
    const PRICES: [f64; 5] = [1.0, 1.15, 1.28939394, 1.18624242, 1.58165657];
    const BENCHMARK: [f64; 5] = [100.0, 105.0, 115.0, 100.0, 120.0];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pct(rate: f64) -> f64 {
        (rate * 10000.0).round() / 100.0
    }

    #[test]
    fn test_buy_then_sell() {
        let report = verbose_pme(&[-10.0, 5.0], &[1.0, 2.0, 1.0], &[1.0, 1.0, 0.5]).unwrap();
        assert_abs_diff_eq!(report.pme_irr.unwrap(), -0.25, epsilon = 1e-9);
        assert_eq!(pct(report.asset_irr.unwrap()), 15.14);
    }

    #[test]
    fn test_neutral_path() {
        let report = verbose_pme(&[-10.0, 1.0], &[1.0; 3], &[1.0; 3]).unwrap();
        assert_abs_diff_eq!(report.pme_irr.unwrap(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(report.asset_irr.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_multi_period() {
        let report = verbose_pme(&CASHFLOWS, &PRICES, &BENCHMARK).unwrap();
        assert_eq!(pct(report.pme_irr.unwrap()), 2.02);
        assert_eq!(pct(report.asset_irr.unwrap()), 7.77);

        let table = report.table.unwrap();
        assert_eq!(table.shape(), (5, 9));
        let terminal = table.rows.last().unwrap();
        assert_eq!(terminal.asset.nav_after, 0.0);
        assert_eq!(terminal.benchmark.nav_after, 0.0);
    }

    #[test]
    fn test_pme_rate_solves_npv() {
        let report = verbose_pme(&CASHFLOWS, &PRICES, &BENCHMARK).unwrap();
        let rate = report.pme_irr.unwrap();
        let pme_cashflows: Vec<f64> = report
            .table
            .unwrap()
            .rows
            .iter()
            .map(|r| r.benchmark.cashflow)
            .collect();
        assert_abs_diff_eq!(npv(&pme_cashflows, rate), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_terse_matches_verbose() {
        let terse = pme(&CASHFLOWS, &PRICES, &BENCHMARK).unwrap();
        let verbose = verbose_pme(&CASHFLOWS, &PRICES, &BENCHMARK).unwrap();
        assert_eq!(terse, verbose.pme_irr.unwrap());

        let dates = [
            date(2015, 1, 1),
            date(2015, 9, 15),
            date(2016, 2, 1),
            date(2017, 6, 30),
            date(2018, 1, 1),
        ];
        let terse = xpme(&dates, &CASHFLOWS, &PRICES, &BENCHMARK).unwrap();
        let verbose = verbose_xpme(&dates, &CASHFLOWS, &PRICES, &BENCHMARK).unwrap();
        assert_eq!(terse, verbose.pme_irr.unwrap());
    }

    #[test]
    fn test_terse_has_no_table() {
        let report = evaluate(
            PmeInputs::periodic(&CASHFLOWS, &PRICES, &BENCHMARK),
            &PmeConfig::terse(),
        )
        .unwrap();
        assert!(report.table.is_none());
    }

    #[test]
    fn test_dated_round_trip() {
        let dates = [
            date(2015, 1, 1),
            date(2015, 9, 15),
            date(2016, 2, 1),
            date(2017, 6, 30),
            date(2018, 1, 1),
        ];
        let report = verbose_xpme(&dates, &CASHFLOWS, &PRICES, &BENCHMARK).unwrap();
        let table = report.table.unwrap();
        let pme_cashflows: Vec<f64> = table.rows.iter().map(|r| r.benchmark.cashflow).collect();
        let asset_cashflows: Vec<f64> = table.rows.iter().map(|r| r.asset.cashflow).collect();

        let rate = report.pme_irr.unwrap();
        assert_abs_diff_eq!(xnpv(&dates, &pme_cashflows, rate, DAYS_PER_YEAR), 0.0, epsilon = 1e-6);
        let rate = report.asset_irr.unwrap();
        assert_abs_diff_eq!(xnpv(&dates, &asset_cashflows, rate, DAYS_PER_YEAR), 0.0, epsilon = 1e-6);

        assert_eq!(table.shape(), (5, 9));
        assert_eq!(table.labels[3].to_string(), "2017-06-30");
    }

    #[test]
    fn test_dated_one_year_hold() {
        let dates = [date(2012, 1, 1), date(2013, 1, 1)];
        let report = verbose_xpme(&dates, &[-100.0], &[1.0, 1.0], &[20.0, 40.0]).unwrap();
        assert_eq!(pct(report.pme_irr.unwrap()), 99.62);
        assert_abs_diff_eq!(report.asset_irr.unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(report.table.unwrap().shape(), (2, 9));
    }

    #[test]
    fn test_validation_errors_surface() {
        assert!(matches!(pme(&[], &[1.0], &[1.0]), Err(PmeError::EmptyCashflows)));
        assert!(matches!(
            pme(&[10.0], &[1.0, 1.0], &[1.0, 1.0]),
            Err(PmeError::NoInvestment)
        ));
        let dates = [date(2013, 1, 1), date(2012, 1, 1)];
        assert!(matches!(
            xpme(&dates, &[-10.0], &[1.0, 1.0], &[1.0, 1.0]),
            Err(PmeError::UnsortedDates { index: 1 })
        ));
    }

    #[test]
    fn test_sell_against_empty_position() {
        let err = verbose_pme(&[-10.0, 10.0, 5.0], &[1.0; 4], &[1.0; 4]).unwrap_err();
        assert!(matches!(err, PmeError::SellAgainstEmptyPosition { period: 2, .. }));
    }

    #[test]
    fn test_rates_outside_default_bracket() {
        // 10% in ten days annualizes to about 3142%
        let dates = [date(2020, 1, 1), date(2020, 1, 11)];
        let report = verbose_xpme(&dates, &[-100.0], &[1.0, 1.1], &[1.0, 1.0]).unwrap();
        assert_relative_eq!(
            report.asset_irr.unwrap(),
            1.1_f64.powf(36.5) - 1.0,
            max_relative = 1e-9
        );
        assert_abs_diff_eq!(report.pme_irr.unwrap(), 0.0, epsilon = 1e-9);

        // A 99.9% loss
        let report = verbose_pme(&[-10.0], &[1.0, 0.001], &[1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(report.asset_irr.unwrap(), -0.999, epsilon = 1e-9);

        // A millionfold jump
        let report = verbose_pme(&[-10.0], &[1.0, 1e6], &[1.0, 1e6]).unwrap();
        assert_relative_eq!(report.asset_irr.unwrap(), 999_999.0, max_relative = 1e-9);
        assert_relative_eq!(report.pme_irr.unwrap(), 999_999.0, max_relative = 1e-9);
    }

    #[test]
    fn test_one_leg_fails_other_reported() {
        // Selling 15 out of a 10 position leaves the asset short; a 20% rise then gives
        // asset flows 10, -15, 6 whose NPV never reaches zero. The flat benchmark's
        // flows 10, -15, 5 solve to zero.
        let report = verbose_pme(&[-10.0, 15.0], &[1.0, 1.0, 1.2], &[1.0, 1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(report.pme_irr.unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(report.asset_irr, Err(SolverError::NoRealRoot));
        assert!(matches!(
            report.asset_rate(),
            Err(PmeError::Rate { leg: Leg::Asset, source: SolverError::NoRealRoot })
        ));
        assert!(report.table.is_some());

        // The terse call only reports the PME leg, which succeeded
        let rate = pme(&[-10.0, 15.0], &[1.0, 1.0, 1.2], &[1.0, 1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(rate, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unrepresentable_asset_rate_is_overflow() {
        // Keeping 1e-10 of the stake after one day needs 1 + r = 1e-3650
        let dates = [date(2020, 1, 1), date(2020, 1, 2)];
        let report = verbose_xpme(&dates, &[-100.0], &[1.0, 1e-10], &[1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(report.pme_irr.unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(report.asset_irr, Err(SolverError::Overflow));
        assert!(matches!(
            report.asset_rate(),
            Err(PmeError::Rate { leg: Leg::Asset, source: SolverError::Overflow })
        ));
    }

    #[test]
    fn test_both_legs_failing_reports_pme_leg() {
        let err = verbose_pme(&[-10.0, 15.0], &[1.0, 1.0, 1.2], &[1.0, 1.0, 1.2]).unwrap_err();
        assert!(matches!(
            err,
            PmeError::Rate { leg: Leg::Benchmark, source: SolverError::NoRealRoot }
        ));

        let dates = [date(2020, 1, 1), date(2020, 1, 2)];
        let err = xpme(&dates, &[-100.0], &[1.0, 1e-10], &[1.0, 1e-10]).unwrap_err();
        assert!(matches!(
            err,
            PmeError::Rate { leg: Leg::Benchmark, source: SolverError::Overflow }
        ));
    }
}
