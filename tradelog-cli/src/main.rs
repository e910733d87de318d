//! Tradelog CLI: record backtests and review their performance.
//!
//! Commands:
//! - `add`: validate and record a backtest result
//! - `list`: page through the history, newest first
//! - `stats`: overall cards and daily / weekly / monthly windows
//! - `risk`: worst result and losing-streak warning
//! - `export`: CSV, JSON, or Markdown report
//! - `config`: print the effective configuration

mod logging;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info};

use tradelog_core::domain::{NewBacktest, OwnerId, Timeframe};
use tradelog_core::engine::TimeWindow;
use tradelog_store::{
    export_records_csv, export_records_json, format_amount, format_percent, generate_report,
    AppConfig, Dashboard, DashboardOptions, JsonlStore, RecordStore, Session,
    CONFIG_FILE_NAME, JOURNAL_FILE_NAME,
};

const APP_DIR: &str = "tradelog";

#[derive(Parser, Debug)]
#[command(
    name = "tradelog",
    version,
    about = "Tradelog: backtest journal with windowed performance stats"
)]
struct Cli {
    /// Path to tradelog.toml. Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Owner to act as. Overrides `[session] owner`.
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Journal file. Overrides `[store] path`.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a backtest result.
    Add {
        /// Strategy name.
        #[arg(long)]
        strategy: String,

        /// Instrument traded (e.g., EURUSD, XAUUSD).
        #[arg(long)]
        instrument: String,

        /// Chart timeframe: M1, M5, M15, M30, H1, H4, D1.
        #[arg(long)]
        timeframe: String,

        /// Starting capital (must be positive).
        #[arg(long)]
        capital: Decimal,

        /// Net profit or loss (negative for a loss).
        #[arg(long, allow_hyphen_values = true)]
        pnl: Decimal,

        /// First day of the backtest period (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the backtest period (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,

        /// Position size in lots.
        #[arg(long)]
        lot_size: Option<Decimal>,
    },
    /// Show a page of the history, newest first.
    List {
        /// 1-based page number (clamped to the last page).
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page. Overrides `[display] page_size`.
        #[arg(long)]
        page_size: Option<NonZeroUsize>,
    },
    /// Show overall and windowed performance.
    Stats {
        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print the dashboard as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the worst result and the losing-streak warning.
    Risk {
        /// Consecutive losses that trigger the warning. Overrides `[risk] loss_streak`.
        #[arg(long)]
        streak: Option<usize>,
    },
    /// Export the history.
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Reference date for the report windows (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print the effective configuration and resolved paths.
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
    Markdown,
}

/// Everything a command needs after merging flags over the config file.
struct Workspace {
    config: AppConfig,
    config_path: PathBuf,
    session: Session,
    store: JsonlStore,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut ws = resolve_workspace(&cli)?;
    debug!(
        config = %ws.config_path.display(),
        store = %ws.store.path().display(),
        "workspace resolved"
    );

    match cli.command {
        Commands::Add {
            strategy,
            instrument,
            timeframe,
            capital,
            pnl,
            start,
            end,
            lot_size,
        } => {
            let submission = NewBacktest {
                strategy_name: strategy,
                instrument,
                timeframe,
                start_date: start,
                end_date: end,
                initial_capital: capital,
                profit_loss: pnl,
                lot_size,
            };
            run_add(&mut ws, submission)
        }
        Commands::List { page, page_size } => run_list(&ws, page, page_size),
        Commands::Stats { today, json } => run_stats(&ws, today.unwrap_or_else(local_today), json),
        Commands::Risk { streak } => run_risk(&ws, streak),
        Commands::Export {
            format,
            output,
            today,
        } => run_export(&ws, format, output.as_deref(), today.unwrap_or_else(local_today)),
        Commands::Config => run_config(&ws),
    }
}

// ─── Resolution ─────────────────────────────────────────────────────

fn resolve_workspace(cli: &Cli) -> Result<Workspace> {
    let (config, config_path) = match &cli.config {
        Some(path) => (
            AppConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            path.clone(),
        ),
        None => {
            let path = default_config_path()?;
            (AppConfig::load_or_default(&path)?, path)
        }
    };

    let owner = pick_owner(cli.owner.as_deref(), &config);
    let store_path = match cli.store.clone().or_else(|| config.store.path.clone()) {
        Some(path) => path,
        None => default_store_path()?,
    };

    Ok(Workspace {
        config,
        config_path,
        session: Session::new(owner),
        store: JsonlStore::new(store_path),
    })
}

/// `--owner` beats `[session] owner`. A blank result is left for the store
/// to reject as signed out.
fn pick_owner(flag: Option<&str>, config: &AppConfig) -> OwnerId {
    let raw = flag
        .or(config.session.owner.as_deref())
        .unwrap_or_default();
    OwnerId::new(raw.trim())
}

fn default_config_path() -> Result<PathBuf> {
    let Some(dir) = dirs::config_dir() else {
        bail!("no platform config directory; pass --config");
    };
    Ok(dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

fn default_store_path() -> Result<PathBuf> {
    let Some(dir) = dirs::data_dir() else {
        bail!("no platform data directory; pass --store or set [store] path");
    };
    Ok(dir.join(APP_DIR).join(JOURNAL_FILE_NAME))
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn dashboard_options(config: &AppConfig) -> DashboardOptions {
    DashboardOptions::from(config)
}

// ─── Commands ───────────────────────────────────────────────────────

fn run_add(ws: &mut Workspace, submission: NewBacktest) -> Result<()> {
    let record = ws
        .store
        .create_record(&ws.session, submission)
        .context("could not record backtest")?;
    let currency = ws.config.display.currency;

    info!(id = %record.id, "added");
    println!(
        "Recorded {} on {} ({}) {} to {}",
        record.strategy_name, record.instrument, record.timeframe, record.start_date, record.end_date
    );
    println!(
        "  P&L {}  win rate {}  id {}",
        format_amount(record.profit_loss, currency),
        format_percent(record.win_rate),
        short_id(record.id.as_str())
    );
    Ok(())
}

fn run_list(ws: &Workspace, page: usize, page_size: Option<NonZeroUsize>) -> Result<()> {
    let mut options = dashboard_options(&ws.config);
    if let Some(size) = page_size {
        options.page_size = size;
    }
    let dash = Dashboard::load_with(&ws.store, &ws.session, local_today(), page, options)?;
    let currency = ws.config.display.currency;

    if dash.is_empty() {
        println!("No backtests recorded for {}.", dash.owner);
        return Ok(());
    }

    println!(
        "{:<24} {:<10} {:<5} {:<23} {:>14} {:>9} {:<10}",
        "Strategy", "Instrument", "TF", "Period", "P&L", "Win Rate", "Created"
    );
    println!("{}", "-".repeat(101));
    for r in &dash.history {
        println!(
            "{:<24} {:<10} {:<5} {:<23} {:>14} {:>9} {:<10}",
            truncate(&r.strategy_name, 24),
            truncate(&r.instrument, 10),
            r.timeframe,
            format!("{} to {}", r.start_date, r.end_date),
            format_amount(r.profit_loss, currency),
            format_percent(r.win_rate),
            r.created_at.date_naive()
        );
    }
    println!();
    println!(
        "Page {} of {} ({} backtests)",
        dash.page, dash.total_pages, dash.overall.total_count
    );
    Ok(())
}

fn run_stats(ws: &Workspace, today: NaiveDate, json: bool) -> Result<()> {
    let dash = Dashboard::load_with(
        &ws.store,
        &ws.session,
        today,
        1,
        dashboard_options(&ws.config),
    )?;

    if json {
        let text = serde_json::to_string_pretty(&dash).context("failed to serialize dashboard")?;
        println!("{text}");
        return Ok(());
    }

    let currency = ws.config.display.currency;
    println!("Backtests for {} as of {}", dash.owner, dash.today);
    println!();
    println!("Total backtests:  {}", dash.overall.total_count);
    println!("Average win rate: {}", format_percent(dash.overall.average_win_rate));
    println!(
        "Total P&L:        {}",
        format_amount(dash.overall.total_profit_loss, currency)
    );
    println!();
    println!(
        "{:<8} {:<12} {:>9} {:>16} {:>12}",
        "Window", "Since", "Backtests", "Total P&L", "Avg Win Rate"
    );
    println!("{}", "-".repeat(61));
    for window in TimeWindow::ALL {
        let stats = dash.windows.get(window);
        println!(
            "{:<8} {:<12} {:>9} {:>16} {:>12}",
            window.label(),
            window.start(today),
            stats.total_count,
            format_amount(stats.total_profit_loss, currency),
            format_percent(stats.average_win_rate)
        );
    }
    print_streak_warning(&dash, ws.config.risk.loss_streak);
    Ok(())
}

fn run_risk(ws: &Workspace, streak: Option<usize>) -> Result<()> {
    let mut options = dashboard_options(&ws.config);
    if let Some(threshold) = streak {
        options.loss_streak = threshold;
    }
    let dash = Dashboard::load_with(&ws.store, &ws.session, local_today(), 1, options)?;
    let currency = ws.config.display.currency;

    println!(
        "Max drawdown (worst single result): {}",
        format_amount(dash.risk.max_drawdown, currency)
    );
    println!("Longest losing streak:              {}", dash.longest_loss_streak);
    if !print_streak_warning(&dash, options.loss_streak) {
        println!("No losing streak of {} or more.", options.loss_streak);
    }
    Ok(())
}

fn run_export(ws: &Workspace, format: ExportFormat, output: Option<&Path>, today: NaiveDate) -> Result<()> {
    let records = ws.store.fetch_records(&ws.session)?;

    let content = match format {
        ExportFormat::Csv => export_records_csv(&records)?,
        ExportFormat::Json => export_records_json(&records)?,
        ExportFormat::Markdown => {
            let owner = ws.session.owner()?.clone();
            let dash = Dashboard::from_records(owner, &records, today, 1, dashboard_options(&ws.config));
            generate_report(&dash, &records, ws.config.display.currency)
        }
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
            }
            std::fs::write(path, &content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), records = records.len(), "export written");
            eprintln!("Exported {} backtests to {}", records.len(), path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn run_config(ws: &Workspace) -> Result<()> {
    println!("# config file: {}", ws.config_path.display());
    let size = ws
        .store
        .file_size_bytes()
        .with_context(|| format!("failed to stat {}", ws.store.path().display()))?;
    println!(
        "# journal:     {} ({})",
        ws.store.path().display(),
        format_size(size)
    );
    println!(
        "# timeframes:  {}",
        Timeframe::ALL.map(|t| t.as_str()).join(", ")
    );
    print!("{}", ws.config.to_toml().context("failed to render config")?);
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Prints the warning when flagged; returns whether it did.
fn print_streak_warning(dash: &Dashboard, threshold: usize) -> bool {
    if !dash.risk.has_consecutive_losses {
        return false;
    }
    println!();
    println!(
        "WARNING: {} consecutive losing backtests (threshold {}). Review the strategy before trading it live.",
        dash.longest_loss_streak, threshold
    );
    true
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tradelog_store::Currency;
    use rust_decimal::dec;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_accepts_negative_pnl() {
        let cli = Cli::try_parse_from([
            "tradelog", "add", "--strategy", "Asian Range", "--instrument", "USDJPY",
            "--timeframe", "m30", "--capital", "1000", "--pnl", "-45.50",
            "--start", "2024-05-01", "--end", "2024-05-07", "--lot-size", "0.05",
        ])
        .unwrap();
        match cli.command {
            Commands::Add { pnl, capital, start, lot_size, .. } => {
                assert_eq!(pnl, dec!(-45.50));
                assert_eq!(capital, dec!(1000));
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
                assert_eq!(lot_size, Some(dec!(0.05)));
            }
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn add_rejects_malformed_date() {
        let res = Cli::try_parse_from([
            "tradelog", "add", "--strategy", "S", "--instrument", "I", "--timeframe", "H1",
            "--capital", "1", "--pnl", "1", "--start", "05/01/2024", "--end", "2024-05-07",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn list_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["tradelog", "list"]).unwrap();
        match cli.command {
            Commands::List { page, page_size } => {
                assert_eq!(page, 1);
                assert!(page_size.is_none());
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["tradelog", "list", "--page-size", "0"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tradelog", "export", "--format", "markdown", "--owner", "bob", "--store", "j.jsonl", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.owner.as_deref(), Some("bob"));
        assert_eq!(cli.store, Some(PathBuf::from("j.jsonl")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Export { format: ExportFormat::Markdown, .. }
        ));
    }

    #[test]
    fn unknown_export_format_is_rejected() {
        assert!(Cli::try_parse_from(["tradelog", "export", "--format", "xlsx"]).is_err());
    }

    #[test]
    fn owner_flag_overrides_config() {
        let mut config = AppConfig::default();
        config.session.owner = Some("alice".into());
        assert_eq!(pick_owner(Some("bob"), &config), OwnerId::new("bob"));
        assert_eq!(pick_owner(None, &config), OwnerId::new("alice"));
        assert!(pick_owner(None, &AppConfig::default()).is_blank());
    }

    #[test]
    fn resolve_uses_explicit_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tradelog.toml");
        std::fs::write(
            &config_path,
            "[session]\nowner = \"carol\"\n[display]\ncurrency = \"IDR\"\npage_size = 5\n",
        )
        .unwrap();
        let journal = dir.path().join("journal.jsonl");

        let cli = Cli::try_parse_from([
            "tradelog",
            "--config",
            config_path.to_str().unwrap(),
            "--store",
            journal.to_str().unwrap(),
            "stats",
        ])
        .unwrap();
        let ws = resolve_workspace(&cli).unwrap();
        assert_eq!(ws.store.path(), journal.as_path());
        assert_eq!(ws.session.owner().unwrap().as_str(), "carol");
        assert_eq!(ws.config.display.currency, Currency::Idr);
        assert_eq!(dashboard_options(&ws.config).page_size.get(), 5);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let cli = Cli::try_parse_from([
            "tradelog",
            "--config",
            "/definitely/not/here/tradelog.toml",
            "config",
        ])
        .unwrap();
        assert!(resolve_workspace(&cli).is_err());
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long strategy name", 8), "a very …");
        assert_eq!(short_id("abcdef"), "abcdef");
    }

    #[test]
    fn journal_size_is_human_readable() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
