//! In-memory record store for tests and one-shot sessions.

use chrono::{DateTime, Utc};

use tradelog_core::domain::{BacktestRecord, NewBacktest};
use tradelog_core::engine::sort_newest_first;

use crate::store::{RecordStore, Session, StoreError};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<BacktestRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with an explicit creation instant.
    pub fn insert_at(
        &mut self,
        session: &Session,
        submission: NewBacktest,
        created_at: DateTime<Utc>,
    ) -> Result<BacktestRecord, StoreError> {
        let owner = session.owner()?;
        let record = BacktestRecord::create(owner, submission, created_at)?;
        self.records.push(record.clone());
        Ok(record)
    }

    /// Records across every owner, in insertion order.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn fetch_records(&self, session: &Session) -> Result<Vec<BacktestRecord>, StoreError> {
        let owner = session.owner()?;
        let mut out: Vec<BacktestRecord> = self
            .records
            .iter()
            .filter(|r| &r.owner_id == owner)
            .cloned()
            .collect();
        sort_newest_first(&mut out);
        Ok(out)
    }

    fn create_record(
        &mut self,
        session: &Session,
        submission: NewBacktest,
    ) -> Result<BacktestRecord, StoreError> {
        self.insert_at(session, submission, Utc::now())
    }
}
