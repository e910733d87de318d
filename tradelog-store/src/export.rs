//! Export: CSV, JSON, and Markdown artifacts for a backtest journal.
//!
//! - **CSV**: one row per record for spreadsheets
//! - **JSON**: the records as stored, pretty-printed
//! - **Markdown**: a performance report built from a [`Dashboard`]

use anyhow::{Context, Result};
use tradelog_core::domain::BacktestRecord;
use tradelog_core::engine::{summary_by_instrument, summary_by_strategy, SummaryStats, TimeWindow};

use crate::config::Currency;
use crate::dashboard::Dashboard;
use crate::format::{format_amount, format_percent};

/// CSV header, in column order.
pub const CSV_COLUMNS: [&str; 11] = [
    "id",
    "strategy_name",
    "instrument",
    "timeframe",
    "start_date",
    "end_date",
    "initial_capital",
    "profit_loss",
    "win_rate",
    "lot_size",
    "created_at",
];

// ─── CSV export ─────────────────────────────────────────────────────

/// Export records as CSV. Amounts are written unformatted so spreadsheets
/// read them as numbers.
pub fn export_records_csv(records: &[BacktestRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_COLUMNS)?;

    for r in records {
        wtr.write_record([
            r.id.to_string(),
            r.strategy_name.clone(),
            r.instrument.clone(),
            r.timeframe.clone(),
            r.start_date.to_string(),
            r.end_date.to_string(),
            r.initial_capital.to_string(),
            r.profit_loss.to_string(),
            r.win_rate.to_string(),
            r.lot_size.map(|l| l.to_string()).unwrap_or_default(),
            r.created_at.to_rfc3339(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_records_json(records: &[BacktestRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("failed to serialize records to JSON")
}

// ─── Markdown report ────────────────────────────────────────────────

/// Markdown performance report.
///
/// `records` is the owner's full newest-first history, used for the
/// per-strategy and per-instrument tables; the dashboard supplies everything
/// else.
pub fn generate_report(dashboard: &Dashboard, records: &[BacktestRecord], currency: Currency) -> String {
    let mut md = String::with_capacity(2048);
    let money = |amount| format_amount(amount, currency);

    md.push_str("# Backtest Journal Report\n\n");

    md.push_str("## Overview\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Owner | {} |\n", dashboard.owner));
    md.push_str(&format!("| As Of | {} |\n", dashboard.today));
    md.push_str(&format!("| Currency | {} |\n", currency.code()));
    md.push_str(&format!(
        "| Total Backtests | {} |\n",
        dashboard.overall.total_count
    ));
    md.push_str(&format!(
        "| Average Win Rate | {} |\n",
        format_percent(dashboard.overall.average_win_rate)
    ));
    md.push_str(&format!(
        "| Total P&L | {} |\n",
        money(dashboard.overall.total_profit_loss)
    ));
    md.push('\n');

    md.push_str("## Performance by Window\n\n");
    md.push_str("| Window | Backtests | Total P&L | Avg Win Rate |\n");
    md.push_str("| --- | ---: | ---: | ---: |\n");
    for window in TimeWindow::ALL {
        let stats = dashboard.windows.get(window);
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            window.label(),
            stats.total_count,
            money(stats.total_profit_loss),
            format_percent(stats.average_win_rate)
        ));
    }
    md.push('\n');

    md.push_str("## Risk\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Max Drawdown | {} |\n",
        money(dashboard.risk.max_drawdown)
    ));
    md.push_str(&format!(
        "| Longest Losing Streak | {} |\n",
        dashboard.longest_loss_streak
    ));
    md.push('\n');
    if dashboard.risk.has_consecutive_losses {
        md.push_str(
            "> **Warning:** consecutive losing backtests detected. Review the strategy before trading it live.\n\n",
        );
    }

    if !records.is_empty() {
        push_breakdown(&mut md, "By Strategy", "Strategy", &summary_by_strategy(records), currency);
        push_breakdown(&mut md, "By Instrument", "Instrument", &summary_by_instrument(records), currency);
    }

    md.push_str(&format!(
        "## Recent Backtests (page {} of {})\n\n",
        dashboard.page,
        dashboard.total_pages.max(1)
    ));
    if dashboard.history.is_empty() {
        md.push_str("_No backtests recorded yet._\n");
        return md;
    }
    md.push_str("| Strategy | Instrument | Timeframe | Period | P&L | Win Rate | Created |\n");
    md.push_str("| --- | --- | --- | --- | ---: | ---: | --- |\n");
    for r in &dashboard.history {
        md.push_str(&format!(
            "| {} | {} | {} | {} to {} | {} | {} | {} |\n",
            escape_cell(&r.strategy_name),
            escape_cell(&r.instrument),
            r.timeframe,
            r.start_date,
            r.end_date,
            money(r.profit_loss),
            format_percent(r.win_rate),
            r.created_at.date_naive()
        ));
    }

    md
}

// ── Helpers ──────────────────────────────────────────────────────────

fn push_breakdown<'a>(
    md: &mut String,
    title: &str,
    key_label: &str,
    groups: impl IntoIterator<Item = (&'a String, &'a SummaryStats)>,
    currency: Currency,
) {
    md.push_str(&format!("## {title}\n\n"));
    md.push_str(&format!("| {key_label} | Backtests | Total P&L | Avg Win Rate |\n"));
    md.push_str("| --- | ---: | ---: | ---: |\n");
    for (key, stats) in groups {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(key),
            stats.total_count,
            format_amount(stats.total_profit_loss, currency),
            format_percent(stats.average_win_rate)
        ));
    }
    md.push('\n');
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
