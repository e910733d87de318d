//! Tradelog Store: record persistence, configuration, dashboard assembly, export.
//!
//! This crate builds on `tradelog-core` to provide:
//! - The `RecordStore` contract and the signed-in `Session`
//! - In-memory and JSONL journal implementations
//! - `tradelog.toml` configuration
//! - Dashboard assembly (overall cards, windows, risk, history page)
//! - CSV / JSON / Markdown export and amount formatting

pub mod config;
pub mod dashboard;
pub mod export;
pub mod format;
pub mod jsonl;
pub mod memory;
pub mod store;

pub use config::{AppConfig, ConfigError, Currency, DisplayConfig, RiskConfig, CONFIG_FILE_NAME};
pub use dashboard::{Dashboard, DashboardOptions};
pub use export::{export_records_csv, export_records_json, generate_report};
pub use format::{format_amount, format_percent};
pub use jsonl::{JsonlStore, JOURNAL_FILE_NAME};
pub use memory::MemoryStore;
pub use store::{RecordStore, Session, StoreError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn stores_are_send_sync() {
        assert_send::<JsonlStore>();
        assert_sync::<JsonlStore>();
        assert_send::<MemoryStore>();
        assert_sync::<MemoryStore>();
    }

    #[test]
    fn dashboard_is_send_sync() {
        assert_send::<Dashboard>();
        assert_sync::<Dashboard>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<StoreError>();
        assert_sync::<StoreError>();
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
    }
}
