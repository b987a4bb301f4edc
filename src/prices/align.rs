//! Nearest-date alignment of an external price series onto observation dates
//!
//! Each requested date independently takes the row whose timestamp is closest in
//! absolute time. Equidistant rows resolve to the earlier one. No interpolation is done
//! and no maximum gap is enforced: a single row far away from every requested date is
//! still returned for all of them.

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use super::history::{midnight, PriceHistory};
use crate::error::PmeError;

/// Position of the entry in `index` (sorted ascending) closest to `target`, ties to the
/// earlier entry. `None` only when `index` is empty.
pub fn nearest_index(index: &[NaiveDateTime], target: NaiveDateTime) -> Option<usize> {
    if index.is_empty() {
        return None;
    }

    // First entry at or after the target
    let after = index.partition_point(|t| *t < target);
    if after == 0 {
        return Some(0);
    }
    if after == index.len() {
        return Some(index.len() - 1);
    }

    let before = after - 1;
    let gap_before = target - index[before];
    let gap_after = index[after] - target;
    if gap_after < gap_before {
        Some(after)
    } else {
        Some(before)
    }
}

/// One price per requested date, taken from `column` of `history` at the nearest row
pub fn align_prices_to_dates(
    dates: &[NaiveDate],
    history: &PriceHistory,
    column: &str,
) -> Result<Vec<f64>, PmeError> {
    let values = history.column(column)?;
    let index = history.index();

    dates
        .iter()
        .map(|&date| {
            let target = midnight(date);
            let i = nearest_index(index, target).ok_or(PmeError::EmptyPriceHistory)?;
            debug!(
                "{} -> {} ({} days away): {}",
                date,
                index[i],
                (index[i] - target).num_days().abs(),
                values[i]
            );
            Ok(values[i])
        })
        .collect()
}
