//! Tradelog Core: domain types and the aggregation engine for backtest journals.
//!
//! This crate contains:
//! - Domain types (records, submissions, owner and record IDs, timeframes)
//! - Submission validation and win-rate derivation
//! - Calendar window filters and summary statistics
//! - Risk signals (worst result, losing streaks)
//! - Newest-first ordering and pagination

pub mod domain;
pub mod engine;

pub use domain::{BacktestRecord, NewBacktest, OwnerId, RecordId, Timeframe, ValidationError};
pub use engine::{
    compute_window_stats, derive_win_rate, detect_risk_signals, paginate, summarize, Page,
    RiskSignals, SummaryStats, TimeWindow, WindowStats,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all public value types are Send + Sync so a
    /// presentation layer can move snapshots across threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<BacktestRecord>();
        require_sync::<BacktestRecord>();
        require_send::<NewBacktest>();
        require_sync::<NewBacktest>();
        require_send::<OwnerId>();
        require_sync::<OwnerId>();
        require_send::<RecordId>();
        require_sync::<RecordId>();
        require_send::<ValidationError>();
        require_sync::<ValidationError>();

        // Engine results
        require_send::<SummaryStats>();
        require_sync::<SummaryStats>();
        require_send::<WindowStats>();
        require_sync::<WindowStats>();
        require_send::<RiskSignals>();
        require_sync::<RiskSignals>();
        require_send::<Page<'static, BacktestRecord>>();
        require_sync::<Page<'static, BacktestRecord>>();
    }

    /// The engine never sees a store: every entry point takes records by
    /// slice and returns an owned value.
    #[test]
    fn engine_entry_points_are_pure_functions() {
        let records: Vec<BacktestRecord> = Vec::new();
        let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(compute_window_stats(&records, today), WindowStats::default());
        assert_eq!(detect_risk_signals(&records), RiskSignals::default());
        assert_eq!(summarize(&records), SummaryStats::default());
    }
}
