//! Journal file: JSONL append-only record persistence.
//!
//! Every created record is written as one JSON object per line. Records are
//! never updated or deleted, so the file is the full history for every owner
//! that shares it. Reads stream the whole file, keep the caller's records and
//! return them newest first.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use tradelog_core::domain::{BacktestRecord, NewBacktest};
use tradelog_core::engine::sort_newest_first;

use crate::store::{RecordStore, Session, StoreError};

/// Default file name inside the data directory.
pub const JOURNAL_FILE_NAME: &str = "backtests.jsonl";

/// JSONL journal file manager.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a record line, creating the file and its parent directory on
    /// first use.
    ///
    /// A final line left without its newline by an interrupted write is
    /// terminated first, so the new record always starts on its own line.
    pub fn append(&self, record: &BacktestRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        if ends_mid_line(&mut file)? {
            warn!(path = %self.path.display(), "terminating unfinished journal line");
            writeln!(file)?;
        }
        writeln!(file, "{json}")?;
        file.flush()?;
        Ok(())
    }

    /// Create a record with an explicit creation instant and append it.
    pub fn insert_at(
        &self,
        session: &Session,
        submission: NewBacktest,
        created_at: DateTime<Utc>,
    ) -> Result<BacktestRecord, StoreError> {
        let owner = session.owner()?;
        let record = BacktestRecord::create(owner, submission, created_at)?;
        self.append(&record)?;
        info!(
            id = %record.id,
            owner = %owner,
            strategy = %record.strategy_name,
            win_rate = %record.win_rate,
            "backtest recorded"
        );
        Ok(record)
    }

    /// Read every well-formed record in file order.
    ///
    /// Blank lines are ignored. Malformed lines, including ones that are not
    /// valid UTF-8, are logged and skipped; a torn write never hides the rest
    /// of the journal.
    pub fn read_all(&self) -> Result<Vec<BacktestRecord>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let reader = io::BufReader::new(file);
        let mut records = Vec::new();

        for (idx, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<BacktestRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = idx + 1,
                    error = %e,
                    "skipping malformed journal line"
                ),
            }
        }

        Ok(records)
    }

    /// Current file size in bytes (0 when the journal does not exist yet).
    pub fn file_size_bytes(&self) -> io::Result<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True when the file is non-empty and its last byte is not a newline.
fn ends_mid_line(file: &mut fs::File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl RecordStore for JsonlStore {
    fn fetch_records(&self, session: &Session) -> Result<Vec<BacktestRecord>, StoreError> {
        let owner = session.owner()?;
        let all = self.read_all()?;
        let total = all.len();
        let mut mine: Vec<BacktestRecord> =
            all.into_iter().filter(|r| &r.owner_id == owner).collect();
        sort_newest_first(&mut mine);
        debug!(total, owned = mine.len(), "journal scanned");
        info!(owner = %owner, count = mine.len(), "records fetched");
        Ok(mine)
    }

    fn create_record(
        &mut self,
        session: &Session,
        submission: NewBacktest,
    ) -> Result<BacktestRecord, StoreError> {
        self.insert_at(session, submission, Utc::now())
    }
}
