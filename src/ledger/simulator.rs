//! Replication of an asset's cashflows into a benchmark account

use log::debug;
use serde::Serialize;

use super::account::NavAccount;
use super::rows::LedgerRow;
use crate::error::PmeError;

/// Complete replication ledger: one row per period plus the terminal liquidation row
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub rows: Vec<LedgerRow>,
}

impl Simulation {
    fn with_capacity(periods: usize) -> Self {
        Self {
            rows: Vec::with_capacity(periods + 1),
        }
    }

    fn add_row(&mut self, row: LedgerRow) {
        self.rows.push(row);
    }

    /// Benchmark cashflows including the terminal liquidation: the series PME IRR is solved on
    pub fn pme_cashflows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.benchmark.cashflow).collect()
    }

    /// Asset cashflows including the terminal liquidation
    pub fn asset_cashflows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.asset.cashflow).collect()
    }

    /// The terminal liquidation row
    pub fn terminal(&self) -> Option<&LedgerRow> {
        self.rows.last()
    }
}

/// Walk the periods once, mirroring every cashflow into the benchmark.
///
/// Buys (`cf < 0`) are copied into the benchmark at the same notional. Sells (`cf >= 0`)
/// remove the same fraction of the benchmark NAV that the sale removes from the asset
/// NAV. Both positions are liquidated after the last period.
///
/// Inputs are expected to have passed [`crate::validate::validate_inputs`]; series too
/// short for the cashflows are still rejected here. A sale while the asset NAV is zero
/// fails with [`PmeError::SellAgainstEmptyPosition`].
pub fn simulate(
    cashflows: &[f64],
    prices: &[f64],
    benchmark_prices: &[f64],
) -> Result<Simulation, PmeError> {
    let mut simulation = Simulation::with_capacity(cashflows.len());
    let mut asset = NavAccount::empty();
    let mut benchmark = NavAccount::empty();

    let periods = cashflows
        .iter()
        .zip(prices.windows(2))
        .zip(benchmark_prices.windows(2))
        .enumerate();

    for (period, ((&cf, p), q)) in periods {
        let asset_cf = -cf;
        let benchmark_cf = if cf < 0.0 {
            -cf
        } else {
            if asset.nav == 0.0 {
                return Err(PmeError::SellAgainstEmptyPosition {
                    period,
                    cashflow: cf,
                });
            }
            let ratio = cf / asset.nav;
            -benchmark.nav * ratio
        };

        let (asset_leg, asset_next) = asset.step(asset_cf, p[0], p[1]);
        let (benchmark_leg, benchmark_next) = benchmark.step(benchmark_cf, q[0], q[1]);

        debug!(
            "period {:>3}: asset {:>12.2} {:>12.2} {:>12.2} | PME {:>12.2} {:>12.2} {:>12.2}",
            period,
            asset_leg.nav_before,
            asset_leg.cashflow,
            asset_leg.nav_after,
            benchmark_leg.nav_before,
            benchmark_leg.cashflow,
            benchmark_leg.nav_after,
        );

        simulation.add_row(LedgerRow {
            period,
            account_cashflow: Some(cf),
            asset: asset_leg,
            benchmark: benchmark_leg,
        });

        asset = asset_next;
        benchmark = benchmark_next;
    }

    let last = cashflows.len();
    let (price, benchmark_price) = match (prices.get(last), benchmark_prices.get(last)) {
        (Some(&p), Some(&q)) if simulation.rows.len() == last => (p, q),
        _ => {
            return Err(PmeError::CashflowLengthMismatch {
                cashflows: last,
                prices: prices.len().min(benchmark_prices.len()),
                expected: last + 1,
            })
        }
    };
    simulation.add_row(LedgerRow {
        period: last,
        account_cashflow: None,
        asset: asset.liquidate(price),
        benchmark: benchmark.liquidate(benchmark_price),
    });

    debug!(
        "liquidation: asset {:.2}, PME {:.2}",
        asset.nav, benchmark.nav
    );

    Ok(simulation)
}
