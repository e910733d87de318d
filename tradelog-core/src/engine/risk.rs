//! Risk signals: worst single result and losing-streak detection.
//!
//! Both are recomputed from scratch on every fetch. There is no acknowledged
//! state, so the streak warning fires again on every reload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::BacktestRecord;

/// Losing records in a row that raise the streak flag.
pub const DEFAULT_LOSS_STREAK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskSignals {
    /// Minimum `profit_loss` across all records (zero when empty).
    pub max_drawdown: Decimal,
    pub has_consecutive_losses: bool,
}

/// The single lowest `profit_loss` in the set.
///
/// This is the worst individual result, not a peak-to-trough drawdown of a
/// cumulative equity curve. When every record is profitable the value is the
/// smallest profit.
pub fn max_drawdown(records: &[BacktestRecord]) -> Decimal {
    records
        .iter()
        .map(|r| r.profit_loss)
        .min()
        .unwrap_or(Decimal::ZERO)
}

/// True as soon as `threshold` records in a row have `profit_loss < 0`.
///
/// Records are visited in the given order (newest first when they come from
/// a store). Any record with `profit_loss >= 0` resets the count. A threshold
/// of zero never fires.
pub fn has_consecutive_losses(records: &[BacktestRecord], threshold: usize) -> bool {
    if threshold == 0 {
        return false;
    }
    let mut run = 0;
    for record in records {
        if record.is_loss() {
            run += 1;
            if run >= threshold {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Length of the longest run of losing records.
pub fn longest_loss_streak(records: &[BacktestRecord]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for record in records {
        if record.is_loss() {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Risk signals with the default streak threshold.
pub fn detect_risk_signals(records: &[BacktestRecord]) -> RiskSignals {
    detect_risk_signals_with(records, DEFAULT_LOSS_STREAK)
}

pub fn detect_risk_signals_with(records: &[BacktestRecord], threshold: usize) -> RiskSignals {
    RiskSignals {
        max_drawdown: max_drawdown(records),
        has_consecutive_losses: has_consecutive_losses(records, threshold),
    }
}
