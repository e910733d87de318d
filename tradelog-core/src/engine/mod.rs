//! Aggregation engine: pure functions over a snapshot of backtest records.
//!
//! Nothing here performs I/O or holds state. Each call takes the records it
//! is given and returns a fresh result:
//!
//! 1. Window filter: daily / weekly / monthly inclusion by `end_date`
//! 2. Summary: count, total P&L, mean win rate per subset
//! 3. Risk: worst single result and losing-streak flag
//! 4. Pagination: newest-first history pages
//! 5. Breakdown: summary figures per strategy and per instrument
//!
//! Win-rate derivation lives here too, although it only runs when a record
//! is created.

pub mod breakdown;
pub mod ordering;
pub mod pagination;
pub mod risk;
pub mod summary;
pub mod win_rate;
pub mod window;

pub use breakdown::{summary_by_instrument, summary_by_strategy};
pub use ordering::sort_newest_first;
pub use pagination::{clamp_page, paginate, Page};
pub use risk::{
    detect_risk_signals, detect_risk_signals_with, has_consecutive_losses, longest_loss_streak,
    max_drawdown, RiskSignals, DEFAULT_LOSS_STREAK,
};
pub use summary::{compute_window_stats, summarize, SummaryStats, WindowStats};
pub use win_rate::derive_win_rate;
pub use window::{filter_window, partition_windows, TimeWindow, WindowedRecords};
