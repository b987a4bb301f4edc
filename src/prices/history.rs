//! Chronologically keyed price series with named columns

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::PmeError;

/// Default column used for PME prices
pub const CLOSE: &str = "close";

/// A price series as returned by a market-data provider: one timestamp per row and any
/// number of named price columns (`open`, `close`, ...). Rows are kept sorted by time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceHistory {
    index: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl PriceHistory {
    /// Build from an index and columns of the same length. Rows are sorted by timestamp;
    /// column names are lower-cased.
    pub fn new(
        index: Vec<NaiveDateTime>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, PmeError> {
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != index.len()) {
            return Err(PmeError::PriceSource(format!(
                "column {:?} has {} values for {} timestamps",
                name,
                values.len(),
                index.len()
            )));
        }

        let mut order: Vec<usize> = (0..index.len()).collect();
        order.sort_by_key(|&i| index[i]);

        let sorted_index = order.iter().map(|&i| index[i]).collect();
        let sorted_columns = columns
            .into_iter()
            .map(|(name, values)| {
                let values = order.iter().map(|&i| values[i]).collect();
                (name.to_lowercase(), values)
            })
            .collect();

        Ok(Self {
            index: sorted_index,
            columns: sorted_columns,
        })
    }

    /// Single `close` column from (timestamp, price) pairs
    pub fn from_closes<I>(closes: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDateTime, f64)>,
    {
        let mut pairs: Vec<_> = closes.into_iter().collect();
        pairs.sort_by_key(|(t, _)| *t);
        let (index, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

        let mut columns = BTreeMap::new();
        columns.insert(CLOSE.to_string(), values);
        Self { index, columns }
    }

    /// Single `close` column keyed by calendar dates (midnight timestamps)
    pub fn from_daily_closes<I>(closes: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::from_closes(closes.into_iter().map(|(d, p)| (midnight(d), p)))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Timestamps in ascending order
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Values of a column, matched case-insensitively
    pub fn column(&self, name: &str) -> Result<&[f64], PmeError> {
        self.columns
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .ok_or_else(|| PmeError::UnknownColumn(name.to_string()))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Rows between `from` and `to` (inclusive), widened by one row on each side so a
    /// nearest-date lookup at the edges still sees its closest neighbour.
    pub fn window(&self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        let start = self.index.partition_point(|t| *t < from).saturating_sub(1);
        let end = (self.index.partition_point(|t| *t <= to) + 1).min(self.index.len());
        let end = end.max(start);

        Self {
            index: self.index[start..end].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), values[start..end].to_vec()))
                .collect(),
        }
    }
}

/// Midnight timestamp for a calendar date
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rows_are_sorted() {
        let history = PriceHistory::from_daily_closes([
            (date(2020, 1, 3), 3.0),
            (date(2020, 1, 1), 1.0),
            (date(2020, 1, 2), 2.0),
        ]);
        assert_eq!(history.column("Close").unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(history.index()[0], midnight(date(2020, 1, 1)));
    }

    #[test]
    fn test_new_sorts_every_column() {
        let index = vec![midnight(date(2020, 1, 2)), midnight(date(2020, 1, 1))];
        let mut columns = BTreeMap::new();
        columns.insert("Open".to_string(), vec![20.0, 10.0]);
        columns.insert("Close".to_string(), vec![21.0, 11.0]);

        let history = PriceHistory::new(index, columns).unwrap();
        assert_eq!(history.column("open").unwrap(), &[10.0, 20.0]);
        assert_eq!(history.column("close").unwrap(), &[11.0, 21.0]);
        assert!(matches!(history.column("volume"), Err(PmeError::UnknownColumn(_))));
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let mut columns = BTreeMap::new();
        columns.insert("close".to_string(), vec![1.0]);
        let err = PriceHistory::new(vec![], columns).unwrap_err();
        assert!(matches!(err, PmeError::PriceSource(_)));
    }

    #[test]
    fn test_window_keeps_edge_neighbours() {
        let history = PriceHistory::from_daily_closes(
            (1..=10).map(|d| (date(2020, 1, d), d as f64)),
        );
        let window = history.window(midnight(date(2020, 1, 4)), midnight(date(2020, 1, 6)));
        assert_eq!(window.column(CLOSE).unwrap(), &[3.0, 4.0, 5.0, 6.0, 7.0]);

        // Range entirely after the data still keeps the last row
        let window = history.window(midnight(date(2021, 1, 1)), midnight(date(2021, 2, 1)));
        assert_eq!(window.column(CLOSE).unwrap(), &[10.0]);
    }
}
