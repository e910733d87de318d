//! NewBacktest: the payload a user submits to create a record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::timeframe::Timeframe;

/// Rejections raised before a record is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    #[error("unknown timeframe '{0}' (expected one of M1, M5, M15, M30, H1, H4, D1)")]
    UnknownTimeframe(String),
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("initial capital must be positive, got {0}")]
    NonPositiveCapital(Decimal),
    #[error("lot size must be positive, got {0}")]
    NonPositiveLotSize(Decimal),
}

/// Fields supplied by the user for a new backtest record.
///
/// `id`, `owner_id`, `win_rate` and `created_at` are assigned at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBacktest {
    pub strategy_name: String,
    pub instrument: String,
    pub timeframe: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: Decimal,
    pub profit_loss: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<Decimal>,
}

impl NewBacktest {
    /// Check every field. Returns the parsed timeframe on success.
    pub fn validate(&self) -> Result<Timeframe, ValidationError> {
        if self.strategy_name.trim().is_empty() {
            return Err(ValidationError::BlankField("strategy name"));
        }
        if self.instrument.trim().is_empty() {
            return Err(ValidationError::BlankField("instrument"));
        }
        let timeframe: Timeframe = self.timeframe.parse()?;
        if self.start_date > self.end_date {
            return Err(ValidationError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.initial_capital <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveCapital(self.initial_capital));
        }
        if let Some(lot) = self.lot_size {
            if lot <= Decimal::ZERO {
                return Err(ValidationError::NonPositiveLotSize(lot));
            }
        }
        Ok(timeframe)
    }
}
