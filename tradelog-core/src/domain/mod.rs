//! Domain types for backtest journals

pub mod ids;
pub mod record;
pub mod submission;
pub mod timeframe;

pub use ids::{OwnerId, RecordId};
pub use record::BacktestRecord;
pub use submission::{NewBacktest, ValidationError};
pub use timeframe::Timeframe;
