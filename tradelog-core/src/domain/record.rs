//! BacktestRecord: one stored backtest result.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{OwnerId, RecordId};
use super::submission::{NewBacktest, ValidationError};
use crate::engine::win_rate::derive_win_rate;

/// A persisted backtest result.
///
/// `win_rate` is derived once at creation and stored with the raw fields;
/// reads never recompute it, so older records keep the value they were
/// created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRecord {
    pub id: RecordId,
    #[serde(alias = "user_id")]
    pub owner_id: OwnerId,

    // ── Description ──
    pub strategy_name: String,
    pub instrument: String,
    pub timeframe: String,

    // ── Period ──
    pub start_date: NaiveDate,
    /// Effective date for window bucketing.
    pub end_date: NaiveDate,

    // ── Outcome ──
    pub initial_capital: Decimal,
    pub profit_loss: Decimal,
    /// Percentage in `[0, 100]`.
    pub win_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<Decimal>,

    pub created_at: DateTime<Utc>,
}

impl BacktestRecord {
    /// Build a record from a validated submission.
    ///
    /// Derives the win rate and a content-addressed ID. The caller supplies
    /// the creation instant so this stays a pure function.
    pub fn create(
        owner: &OwnerId,
        submission: NewBacktest,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let timeframe = submission.validate()?;
        let win_rate = derive_win_rate(submission.profit_loss, submission.initial_capital)?;

        let payload = format!(
            "{}|{}|{}|{}|{}|{}|{}|{}",
            submission.strategy_name,
            submission.instrument,
            timeframe,
            submission.start_date,
            submission.end_date,
            submission.initial_capital,
            submission.profit_loss,
            submission.lot_size.map(|l| l.to_string()).unwrap_or_default(),
        );
        let id = RecordId::derive(owner, created_at, &payload);

        Ok(Self {
            id,
            owner_id: owner.clone(),
            strategy_name: submission.strategy_name.trim().to_string(),
            instrument: submission.instrument.trim().to_string(),
            timeframe: timeframe.as_str().to_string(),
            start_date: submission.start_date,
            end_date: submission.end_date,
            initial_capital: submission.initial_capital,
            profit_loss: submission.profit_loss,
            win_rate,
            lot_size: submission.lot_size,
            created_at,
        })
    }

    /// Strictly negative result. Breakeven is not a loss.
    pub fn is_loss(&self) -> bool {
        self.profit_loss < Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::dec;

    fn submission(pl: Decimal) -> NewBacktest {
        NewBacktest {
            strategy_name: " Trend Rider ".into(),
            instrument: "XAUUSD".into(),
            timeframe: "m15".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            initial_capital: dec!(1000),
            profit_loss: pl,
            lot_size: None,
        }
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn create_derives_win_rate_and_normalizes_fields() {
        let owner = OwnerId::new("alice");
        let record = BacktestRecord::create(&owner, submission(dec!(500)), instant()).unwrap();
        assert_eq!(record.win_rate, dec!(50.00));
        assert_eq!(record.strategy_name, "Trend Rider");
        assert_eq!(record.timeframe, "M15");
        assert_eq!(record.owner_id, owner);
        assert_eq!(record.created_at, instant());
    }

    #[test]
    fn create_rejects_invalid_submission() {
        let mut s = submission(dec!(10));
        s.initial_capital = dec!(-5);
        let err = BacktestRecord::create(&OwnerId::new("alice"), s, instant()).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveCapital(dec!(-5)));
    }

    #[test]
    fn create_is_deterministic() {
        let owner = OwnerId::new("alice");
        let a = BacktestRecord::create(&owner, submission(dec!(1)), instant()).unwrap();
        let b = BacktestRecord::create(&owner, submission(dec!(1)), instant()).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn lot_size_changes_the_id() {
        let owner = OwnerId::new("alice");
        let mut sized = submission(dec!(1));
        sized.lot_size = Some(dec!(0.5));
        let a = BacktestRecord::create(&owner, submission(dec!(1)), instant()).unwrap();
        let b = BacktestRecord::create(&owner, sized, instant()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn breakeven_is_not_a_loss() {
        let record =
            BacktestRecord::create(&OwnerId::new("a"), submission(Decimal::ZERO), instant())
                .unwrap();
        assert!(!record.is_loss());
        assert_eq!(record.win_rate, Decimal::ZERO);
    }

    #[test]
    fn win_rate_caps_at_one_hundred() {
        let record =
            BacktestRecord::create(&OwnerId::new("a"), submission(dec!(3000)), instant()).unwrap();
        assert_eq!(record.win_rate, dec!(100));
    }

    #[test]
    fn reads_hosted_table_column_names() {
        let json = r#"{
            "id": "r1",
            "user_id": "alice",
            "strategy_name": "S",
            "instrument": "EURUSD",
            "timeframe": "H1",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "initial_capital": 1000,
            "profit_loss": -25.5,
            "win_rate": 0,
            "created_at": "2024-02-01T10:00:00Z"
        }"#;
        let record: BacktestRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.owner_id, OwnerId::new("alice"));
        assert_eq!(record.profit_loss, dec!(-25.5));
        assert!(record.lot_size.is_none());
        assert!(record.is_loss());
    }
}
