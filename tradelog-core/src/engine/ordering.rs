//! Default history order: newest `created_at` first.

use crate::domain::BacktestRecord;

/// Stable sort by `created_at` descending. Ties keep their input order.
pub fn sort_newest_first(records: &mut [BacktestRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
