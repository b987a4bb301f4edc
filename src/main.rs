//! PME demonstration
//!
//! Runs a four-period investment against a benchmark, prints the ledger and both rates,
//! and writes the ledger to CSV. Pass --json for a JSON summary instead of the table.
//! Set RUST_LOG=debug to see the period-by-period replication.

use anyhow::Context;
use public_market_equivalent::verbose_pme;
use serde::Serialize;
use std::env;

#[derive(Serialize)]
struct Summary {
    pme_irr_pct: Option<f64>,
    asset_irr_pct: Option<f64>,
    periods: usize,
    pme_cashflows: Vec<f64>,
    asset_cashflows: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");

    let cashflows = [-100.0, -50.0, 60.0, 100.0];
    let prices = [1.0, 1.15, 1.28939394, 1.18624242, 1.58165657];
    let benchmark_prices = [100.0, 105.0, 115.0, 100.0, 120.0];

    let report = verbose_pme(&cashflows, &prices, &benchmark_prices)?;
    let table = report.table.as_ref().context("verbose run produced no ledger table")?;

    if json_output {
        let summary = Summary {
            pme_irr_pct: report.pme_irr.ok().map(|r| r * 100.0),
            asset_irr_pct: report.asset_irr.ok().map(|r| r * 100.0),
            periods: cashflows.len(),
            pme_cashflows: table.rows.iter().map(|r| r.benchmark.cashflow).collect(),
            asset_cashflows: table.rows.iter().map(|r| r.asset.cashflow).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Public Market Equivalent v{}", env!("CARGO_PKG_VERSION"));
    println!("==============================\n");
    println!("{}", table);

    match report.pme_rate() {
        Ok(rate) => println!("PME IRR:   {:>8.2}%", rate * 100.0),
        Err(e) => println!("PME IRR:   {}", e),
    }
    match report.asset_rate() {
        Ok(rate) => println!("Asset IRR: {:>8.2}%", rate * 100.0),
        Err(e) => println!("Asset IRR: {}", e),
    }

    let csv_path = "pme_ledger.csv";
    table
        .write_csv_file(csv_path)
        .with_context(|| format!("writing {}", csv_path))?;
    println!("\nLedger written to: {}", csv_path);

    Ok(())
}
