//! Inspectable ledger table for verbose PME results
//!
//! Nine columns in three groups: Account (cashflow), Asset (price, NAV before,
//! cashflow, NAV after) and PME (the same four). One row per period plus the terminal
//! liquidation row, labelled by period number or by date.

use std::fmt;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::PmeError;
use crate::ledger::{LedgerRow, Simulation};

/// (group, field) header for each of the nine columns
pub const COLUMNS: [(&str, &str); 9] = [
    ("Account", "CF"),
    ("Asset", "Price"),
    ("Asset", "NAV before"),
    ("Asset", "CF"),
    ("Asset", "NAV after"),
    ("PME", "Price"),
    ("PME", "NAV before"),
    ("PME", "CF"),
    ("PME", "NAV after"),
];

/// Row label of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RowLabel {
    Period(usize),
    Date(NaiveDate),
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLabel::Period(p) => write!(f, "{}", p),
            RowLabel::Date(d) => write!(f, "{}", d),
        }
    }
}

/// The replication ledger as a labelled table
#[derive(Debug, Clone, Serialize)]
pub struct LedgerTable {
    pub labels: Vec<RowLabel>,
    pub rows: Vec<LedgerRow>,
}

/// Flat CSV record for one ledger row
#[derive(Serialize)]
struct CsvRecord {
    label: String,
    account_cf: Option<f64>,
    asset_price: f64,
    asset_nav_before: f64,
    asset_cf: f64,
    asset_nav_after: f64,
    pme_price: f64,
    pme_nav_before: f64,
    pme_cf: f64,
    pme_nav_after: f64,
}

impl LedgerTable {
    /// Table indexed by period number
    pub fn from_periods(simulation: &Simulation) -> Self {
        Self {
            labels: simulation.rows.iter().map(|r| RowLabel::Period(r.period)).collect(),
            rows: simulation.rows.clone(),
        }
    }

    /// Table indexed by the observation dates, which must match the ledger rows 1:1
    pub fn from_dates(simulation: &Simulation, dates: &[NaiveDate]) -> Self {
        Self {
            labels: dates.iter().map(|&d| RowLabel::Date(d)).collect(),
            rows: simulation.rows.clone(),
        }
    }

    /// (rows, columns); always (N+1, 9)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), COLUMNS.len())
    }

    /// The nine values of a row, in [`COLUMNS`] order; the terminal account cashflow is NaN
    pub fn values(&self, row: usize) -> Option<[f64; 9]> {
        self.rows.get(row).map(|r| {
            [
                r.account_cashflow.unwrap_or(f64::NAN),
                r.asset.price,
                r.asset.nav_before,
                r.asset.cashflow,
                r.asset.nav_after,
                r.benchmark.price,
                r.benchmark.nav_before,
                r.benchmark.cashflow,
                r.benchmark.nav_after,
            ]
        })
    }

    /// Write the table as CSV with flattened `group_field` headers
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), PmeError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for (label, row) in self.labels.iter().zip(&self.rows) {
            csv_writer.serialize(CsvRecord {
                label: label.to_string(),
                account_cf: row.account_cashflow,
                asset_price: row.asset.price,
                asset_nav_before: row.asset.nav_before,
                asset_cf: row.asset.cashflow,
                asset_nav_after: row.asset.nav_after,
                pme_price: row.benchmark.price,
                pme_nav_before: row.benchmark.nav_before,
                pme_cf: row.benchmark.cashflow,
                pme_nav_after: row.benchmark.nav_after,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the table to a CSV file
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PmeError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

impl fmt::Display for LedgerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}", "")?;
        for (group, _) in COLUMNS {
            write!(f, " {:>12}", group)?;
        }
        writeln!(f)?;
        write!(f, "{:>10}", "")?;
        for (_, field) in COLUMNS {
            write!(f, " {:>12}", field)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(10 + 13 * COLUMNS.len()))?;

        for (i, label) in self.labels.iter().enumerate() {
            write!(f, "{:>10}", label.to_string())?;
            if let Some(values) = self.values(i) {
                for (column, value) in values.iter().enumerate() {
                    if column == 0 && value.is_nan() {
                        write!(f, " {:>12}", "")?;
                    } else {
                        write!(f, " {:>12.4}", value)?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
