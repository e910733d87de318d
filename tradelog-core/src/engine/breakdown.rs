//! Per-strategy and per-instrument breakdowns of the summary figures.

use std::collections::BTreeMap;

use super::summary::{summarize, SummaryStats};
use crate::domain::BacktestRecord;

/// Summary figures per strategy name, keyed alphabetically.
pub fn summary_by_strategy(records: &[BacktestRecord]) -> BTreeMap<String, SummaryStats> {
    group_and_summarize(records, |r| r.strategy_name.clone())
}

/// Summary figures per instrument, keyed alphabetically.
pub fn summary_by_instrument(records: &[BacktestRecord]) -> BTreeMap<String, SummaryStats> {
    group_and_summarize(records, |r| r.instrument.clone())
}

fn group_and_summarize<F>(records: &[BacktestRecord], key_fn: F) -> BTreeMap<String, SummaryStats>
where
    F: Fn(&BacktestRecord) -> String,
{
    let mut groups: BTreeMap<String, Vec<&BacktestRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key_fn(record)).or_default().push(record);
    }
    groups
        .into_iter()
        .map(|(key, members)| (key, summarize(members)))
        .collect()
}
