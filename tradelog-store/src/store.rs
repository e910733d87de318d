//! Record Store contract: how records are fetched and created for an owner.
//!
//! The hosted backend owns storage and query semantics; this trait is the
//! seam the rest of the workspace talks to. Local implementations live in
//! [`crate::memory`] and [`crate::jsonl`].

use thiserror::Error;

use tradelog_core::domain::{BacktestRecord, NewBacktest, OwnerId, ValidationError};

/// Errors surfaced by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not signed in: the session has no owner")]
    Auth,
    #[error("invalid backtest: {0}")]
    Validation(#[from] ValidationError),
    #[error("record store unreachable: {0}")]
    Network(String),
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// The signed-in user, passed explicitly to every store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    owner: OwnerId,
}

impl Session {
    pub fn new(owner: OwnerId) -> Self {
        Self { owner }
    }

    /// The owner, or `StoreError::Auth` when nobody is signed in.
    pub fn owner(&self) -> Result<&OwnerId, StoreError> {
        if self.owner.is_blank() {
            return Err(StoreError::Auth);
        }
        Ok(&self.owner)
    }
}

/// Fetch and create backtest records scoped to one owner.
pub trait RecordStore {
    /// All records for the session's owner, newest `created_at` first.
    fn fetch_records(&self, session: &Session) -> Result<Vec<BacktestRecord>, StoreError>;

    /// Validate a submission, derive its win rate, persist it and return
    /// the stored record.
    fn create_record(
        &mut self,
        session: &Session,
        submission: NewBacktest,
    ) -> Result<BacktestRecord, StoreError>;
}
