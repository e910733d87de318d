//! Summary aggregation: count, total P&L and mean win rate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::window::{partition_windows, TimeWindow};
use crate::domain::BacktestRecord;

/// Aggregate figures for a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_count: usize,
    /// Signed sum of `profit_loss`, saturating at `Decimal::MAX` / `Decimal::MIN`.
    pub total_profit_loss: Decimal,
    /// Mean of `win_rate`; zero for an empty set.
    pub average_win_rate: Decimal,
}

/// Reduce records to their summary figures.
///
/// Sums saturate instead of overflowing, so out-of-range rows clamp the
/// totals rather than abort the caller.
pub fn summarize<'a, I>(records: I) -> SummaryStats
where
    I: IntoIterator<Item = &'a BacktestRecord>,
{
    let mut count = 0usize;
    let mut pnl = Decimal::ZERO;
    let mut win_rate_sum = Decimal::ZERO;
    for record in records {
        count += 1;
        pnl = pnl.saturating_add(record.profit_loss);
        win_rate_sum = win_rate_sum.saturating_add(record.win_rate);
    }

    let average_win_rate = if count == 0 {
        Decimal::ZERO
    } else {
        win_rate_sum / Decimal::from(count)
    };

    SummaryStats {
        total_count: count,
        total_profit_loss: pnl,
        average_win_rate,
    }
}

/// Summary figures for each calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowStats {
    pub daily: SummaryStats,
    pub weekly: SummaryStats,
    pub monthly: SummaryStats,
}

impl WindowStats {
    pub fn get(&self, window: TimeWindow) -> &SummaryStats {
        match window {
            TimeWindow::Daily => &self.daily,
            TimeWindow::Weekly => &self.weekly,
            TimeWindow::Monthly => &self.monthly,
        }
    }
}

/// Window filter followed by summary aggregation for all three windows.
pub fn compute_window_stats(records: &[BacktestRecord], today: NaiveDate) -> WindowStats {
    let windows = partition_windows(records, today);
    WindowStats {
        daily: summarize(windows.daily),
        weekly: summarize(windows.weekly),
        monthly: summarize(windows.monthly),
    }
}
