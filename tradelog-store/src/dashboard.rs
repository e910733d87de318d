//! Dashboard assembly: one fetch, every figure a dashboard view shows.
//!
//! Loads the owner's records once, then runs the aggregation engine over that
//! snapshot: overall cards, calendar windows, risk signals and the requested
//! history page. Nothing is cached; every load recomputes from scratch.

use std::num::NonZeroUsize;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use tradelog_core::domain::{BacktestRecord, OwnerId};
use tradelog_core::engine::{
    clamp_page, compute_window_stats, detect_risk_signals_with, longest_loss_streak, paginate,
    summarize, RiskSignals, SummaryStats, WindowStats, DEFAULT_LOSS_STREAK,
};

use crate::config::{AppConfig, DEFAULT_PAGE_SIZE};
use crate::store::{RecordStore, Session, StoreError};

/// History page size and streak threshold for a dashboard load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub page_size: NonZeroUsize,
    pub loss_streak: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            loss_streak: DEFAULT_LOSS_STREAK,
        }
    }
}

impl From<&AppConfig> for DashboardOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_size: config.display.page_size(),
            loss_streak: config.risk.loss_streak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub owner: OwnerId,
    pub today: NaiveDate,
    /// Cards across the entire history.
    pub overall: SummaryStats,
    pub windows: WindowStats,
    pub risk: RiskSignals,
    pub longest_loss_streak: usize,
    /// The requested page of history, newest first.
    pub history: Vec<BacktestRecord>,
    /// 1-based page actually shown after clamping.
    pub page: usize,
    pub total_pages: usize,
}

impl Dashboard {
    /// Load with the default page size and streak threshold.
    pub fn load<S>(
        store: &S,
        session: &Session,
        today: NaiveDate,
        page: usize,
    ) -> Result<Self, StoreError>
    where
        S: RecordStore + ?Sized,
    {
        Self::load_with(store, session, today, page, DashboardOptions::default())
    }

    pub fn load_with<S>(
        store: &S,
        session: &Session,
        today: NaiveDate,
        page: usize,
        options: DashboardOptions,
    ) -> Result<Self, StoreError>
    where
        S: RecordStore + ?Sized,
    {
        let owner = session.owner()?.clone();
        let records = store.fetch_records(session)?;
        Ok(Self::from_records(owner, &records, today, page, options))
    }

    /// Assemble from a newest-first snapshot that was already fetched.
    pub fn from_records(
        owner: OwnerId,
        records: &[BacktestRecord],
        today: NaiveDate,
        page: usize,
        options: DashboardOptions,
    ) -> Self {
        let overall = summarize(records);
        let windows = compute_window_stats(records, today);
        let risk = detect_risk_signals_with(records, options.loss_streak);
        let longest = longest_loss_streak(records);

        if risk.has_consecutive_losses {
            warn!(
                owner = %owner,
                streak = longest,
                threshold = options.loss_streak,
                "consecutive losses detected"
            );
        }

        let total_pages = paginate(records, options.page_size, 1).total_pages;
        let page = clamp_page(page, total_pages);
        let history = paginate(records, options.page_size, page).items.to_vec();
        debug!(page, total_pages, shown = history.len(), "history page sliced");

        Self {
            owner,
            today,
            overall,
            windows,
            risk,
            longest_loss_streak: longest,
            history,
            page,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overall.total_count == 0
    }
}
