//! Calendar windows: daily, weekly (Sunday start) and monthly record filters.
//!
//! Windows are independent inclusion filters, not a partition: a record that
//! ends today is in all three at once.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::BacktestRecord;

/// A calendar-aligned time range used to bucket records by `end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// `end_date == today`.
    Daily,
    /// `end_date` on or after the most recent Sunday.
    Weekly,
    /// `end_date` on or after the first of the current month.
    Monthly,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Daily, TimeWindow::Weekly, TimeWindow::Monthly];

    /// First date covered by the window.
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            TimeWindow::Daily => today,
            TimeWindow::Weekly => {
                today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
            }
            TimeWindow::Monthly => today - Duration::days(i64::from(today.day0())),
        }
    }

    /// Whether a record ending on `end_date` falls in this window.
    ///
    /// Weekly and monthly have no upper bound, so a future `end_date` counts.
    pub fn contains(self, end_date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            TimeWindow::Daily => end_date == today,
            TimeWindow::Weekly | TimeWindow::Monthly => end_date >= self.start(today),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::Daily => "Daily",
            TimeWindow::Weekly => "Weekly",
            TimeWindow::Monthly => "Monthly",
        }
    }
}

/// Records in `window`, input order preserved.
pub fn filter_window(
    records: &[BacktestRecord],
    window: TimeWindow,
    today: NaiveDate,
) -> Vec<&BacktestRecord> {
    records
        .iter()
        .filter(|r| window.contains(r.end_date, today))
        .collect()
}

/// The three window subsets of one record set.
#[derive(Debug, Clone, Default)]
pub struct WindowedRecords<'a> {
    pub daily: Vec<&'a BacktestRecord>,
    pub weekly: Vec<&'a BacktestRecord>,
    pub monthly: Vec<&'a BacktestRecord>,
}

impl<'a> WindowedRecords<'a> {
    pub fn get(&self, window: TimeWindow) -> &[&'a BacktestRecord] {
        match window {
            TimeWindow::Daily => &self.daily,
            TimeWindow::Weekly => &self.weekly,
            TimeWindow::Monthly => &self.monthly,
        }
    }
}

/// Split a record set into its daily, weekly and monthly subsets in one pass.
pub fn partition_windows(records: &[BacktestRecord], today: NaiveDate) -> WindowedRecords<'_> {
    let week_start = TimeWindow::Weekly.start(today);
    let month_start = TimeWindow::Monthly.start(today);
    tracing::debug!(%today, %week_start, %month_start, records = records.len(), "partitioning windows");

    let mut out = WindowedRecords::default();
    for record in records {
        if record.end_date == today {
            out.daily.push(record);
        }
        if record.end_date >= week_start {
            out.weekly.push(record);
        }
        if record.end_date >= month_start {
            out.monthly.push(record);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OwnerId, RecordId};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(id: &str, end: NaiveDate) -> BacktestRecord {
        BacktestRecord {
            id: RecordId::new(id),
            owner_id: OwnerId::new("alice"),
            strategy_name: "S".into(),
            instrument: "EURUSD".into(),
            timeframe: "H1".into(),
            start_date: end,
            end_date: end,
            initial_capital: Decimal::ONE_HUNDRED,
            profit_loss: Decimal::ONE,
            win_rate: Decimal::ONE,
            lot_size: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(TimeWindow::Weekly.start(d(2024, 5, 15)), d(2024, 5, 12));
    }

    #[test]
    fn sunday_is_its_own_week_start() {
        assert_eq!(TimeWindow::Weekly.start(d(2024, 5, 12)), d(2024, 5, 12));
    }

    #[test]
    fn saturday_reaches_back_six_days() {
        assert_eq!(TimeWindow::Weekly.start(d(2024, 5, 18)), d(2024, 5, 12));
    }

    #[test]
    fn week_start_can_cross_month_boundary() {
        // 2024-06-01 is a Saturday
        assert_eq!(TimeWindow::Weekly.start(d(2024, 6, 1)), d(2024, 5, 26));
    }

    #[test]
    fn month_start_is_first_day() {
        assert_eq!(TimeWindow::Monthly.start(d(2024, 2, 29)), d(2024, 2, 1));
        assert_eq!(TimeWindow::Monthly.start(d(2024, 2, 1)), d(2024, 2, 1));
    }

    #[test]
    fn daily_is_exact_match() {
        let today = d(2024, 5, 15);
        assert!(TimeWindow::Daily.contains(today, today));
        assert!(!TimeWindow::Daily.contains(d(2024, 5, 14), today));
        assert!(!TimeWindow::Daily.contains(d(2024, 5, 16), today));
    }

    #[test]
    fn future_end_date_counts_for_weekly_and_monthly() {
        let today = d(2024, 5, 15);
        let future = d(2024, 7, 1);
        assert!(TimeWindow::Weekly.contains(future, today));
        assert!(TimeWindow::Monthly.contains(future, today));
        assert!(!TimeWindow::Daily.contains(future, today));
    }

    #[test]
    fn record_ending_today_in_all_windows() {
        let today = d(2024, 5, 15);
        let records = vec![record("a", today)];
        let w = partition_windows(&records, today);
        for window in TimeWindow::ALL {
            assert_eq!(w.get(window).len(), 1, "{} should contain it", window.label());
        }
    }

    #[test]
    fn old_record_in_no_window() {
        let today = d(2024, 5, 15);
        let records = vec![record("old", d(2023, 1, 1))];
        let w = partition_windows(&records, today);
        assert!(w.daily.is_empty());
        assert!(w.weekly.is_empty());
        assert!(w.monthly.is_empty());
    }

    #[test]
    fn earlier_this_month_is_monthly_only() {
        // Wednesday 2024-05-15; the 2nd is before the Sunday 12th
        let today = d(2024, 5, 15);
        let records = vec![record("early", d(2024, 5, 2))];
        let w = partition_windows(&records, today);
        assert!(w.daily.is_empty());
        assert!(w.weekly.is_empty());
        assert_eq!(w.monthly.len(), 1);
    }

    #[test]
    fn last_week_of_previous_month_is_weekly_only() {
        // Saturday 2024-06-01: week began Sunday 2024-05-26
        let today = d(2024, 6, 1);
        let records = vec![record("spill", d(2024, 5, 28))];
        let w = partition_windows(&records, today);
        assert_eq!(w.weekly.len(), 1);
        assert!(w.monthly.is_empty());
    }

    #[test]
    fn partition_matches_filter_and_keeps_order() {
        let today = d(2024, 5, 15);
        let records = vec![
            record("a", d(2024, 5, 15)),
            record("b", d(2024, 5, 13)),
            record("c", d(2024, 5, 1)),
            record("d", d(2024, 4, 30)),
            record("e", d(2024, 5, 14)),
        ];
        let w = partition_windows(&records, today);
        for window in TimeWindow::ALL {
            let filtered = filter_window(&records, window, today);
            let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
            let part: Vec<&str> = w.get(window).iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, part);
        }
        let weekly: Vec<&str> = w.weekly.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(weekly, vec!["a", "b", "e"]);
    }

    #[test]
    fn empty_input_gives_empty_windows() {
        let w = partition_windows(&[], d(2024, 5, 15));
        assert!(w.daily.is_empty() && w.weekly.is_empty() && w.monthly.is_empty());
    }
}
