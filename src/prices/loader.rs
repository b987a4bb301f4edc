//! Load price histories from CSV
//!
//! The first column holds a date (`2020-01-31`) or timestamp (`2020-01-31 16:00:00`,
//! `2020-01-31T16:00:00`); every other column is a numeric price column named by its
//! header.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::Reader;

use super::history::{midnight, PriceHistory};
use crate::error::PmeError;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load a price history from a CSV file
pub fn load_price_history<P: AsRef<Path>>(path: P) -> Result<PriceHistory, PmeError> {
    let reader = Reader::from_path(path)?;
    read_history(reader)
}

/// Load a price history from any reader (e.g., string buffer, network response body)
pub fn load_price_history_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<PriceHistory, PmeError> {
    read_history(Reader::from_reader(reader))
}

fn read_history<R: std::io::Read>(mut reader: Reader<R>) -> Result<PriceHistory, PmeError> {
    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(PmeError::PriceSource(
            "price CSV needs a date column and at least one price column".to_string(),
        ));
    }

    let names: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();
    let mut index = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let stamp = record.get(0).unwrap_or_default();
        index.push(parse_timestamp(stamp)?);

        for (column, target) in values.iter_mut().enumerate() {
            let raw = record.get(column + 1).unwrap_or_default().trim();
            let value = raw.parse::<f64>().map_err(|_| {
                PmeError::PriceSource(format!(
                    "row {}: {:?} is not a number in column {:?}",
                    line + 1,
                    raw,
                    names[column]
                ))
            })?;
            target.push(value);
        }
    }

    let columns: BTreeMap<String, Vec<f64>> = names.into_iter().zip(values).collect();
    PriceHistory::new(index, columns)
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, PmeError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(midnight(date));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| PmeError::PriceSource(format!("unrecognised date {:?}", raw)))
}
