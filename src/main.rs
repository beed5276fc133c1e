use analytics::{
    AnalyticsEngine, DayDetail, DrawdownReport, DurationBucket, HourBucket, OverviewStats,
    SymbolRankings, WeeklyAutoStats, WeeklyTrendRow, consolidate_day, drawdown,
    duration_performance, symbol_rankings, time_of_day_performance, weekly_trend,
    weekly_auto_stats,
};
use anyhow::anyhow;
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use configuration::Config;
use core_types::TradeRecord;
use ledger::{DateRangePreset, TradeLedger, filter_by_date_range, filter_by_symbol};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// The main entry point for the Tradebook journal analytics application.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load the host configuration; a missing config.toml means defaults.
    let config = configuration::load_config().expect("invalid config.toml");

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Import(args) => handle_import(args),
        Commands::Report(args) => handle_report(args, &config),
        Commands::Month(args) => handle_month(args, &config),
        Commands::Day(args) => handle_day(args, &config),
        Commands::Review(args) => handle_review(args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A personal trading-journal analytics engine.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a broker CSV export and summarize what it merges into.
    Import(ImportArgs),
    /// Full performance report over a date range and optional symbol filter.
    Report(ReportArgs),
    /// Per-day breakdown of one calendar month.
    Month(MonthArgs),
    /// Consolidated detail for a single trading day.
    Day(DayArgs),
    /// Auto-computed weekly review figures for the week of a date.
    Review(ReviewArgs),
}

#[derive(Parser)]
struct ImportArgs {
    /// The broker CSV export to ingest.
    #[arg(long)]
    file: PathBuf,
}

#[derive(Parser)]
struct ReportArgs {
    /// The broker CSV export to ingest.
    #[arg(long)]
    file: PathBuf,

    /// Start of the reporting range (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the reporting range (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Named range preset (today, this-week, this-month, last-month,
    /// this-year, last-year, all). Overridden by --from/--to.
    #[arg(long)]
    range: Option<String>,

    /// Symbol filter; a trailing `*` makes it a prefix match (e.g. "SP*").
    #[arg(long)]
    symbol: Option<String>,

    /// Emit the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct MonthArgs {
    /// The broker CSV export to ingest.
    #[arg(long)]
    file: PathBuf,

    /// Year of the month to report.
    #[arg(long)]
    year: i32,

    /// Month number (1-12).
    #[arg(long)]
    month: u32,
}

#[derive(Parser)]
struct DayArgs {
    /// The broker CSV export to ingest.
    #[arg(long)]
    file: PathBuf,

    /// The trading day to detail (format: YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,

    /// Emit the detail as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ReviewArgs {
    /// The broker CSV export to ingest.
    #[arg(long)]
    file: PathBuf,

    /// Any date inside the week to review (format: YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,

    /// Emit the figures as JSON instead of text.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

/// Reads a broker export, merges it through the ledger, and returns the
/// canonical working set.
fn load_working_set(file: &Path) -> anyhow::Result<Vec<TradeRecord>> {
    let batch = import::load_file(file)?;
    let mut ledger = TradeLedger::new();
    ledger.merge_batch(batch);
    Ok(ledger.trades())
}

fn handle_import(args: ImportArgs) -> anyhow::Result<()> {
    let trades = load_working_set(&args.file)?;
    if trades.is_empty() {
        println!("No usable records in {}", args.file.display());
        return Ok(());
    }

    let first = trades.iter().map(|t| t.trade_date).min().expect("non-empty");
    let last = trades.iter().map(|t| t.trade_date).max().expect("non-empty");
    let closed = trades.iter().filter(|t| t.effect.is_close()).count();

    println!(
        "Imported {} records ({} closed fills) spanning {} to {}",
        trades.len(),
        closed,
        first,
        last
    );
    Ok(())
}

fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let trades = load_working_set(&args.file)?;

    // Resolve the working subset: explicit bounds beat a preset; the
    // default is everything.
    let (start, end) = match (args.from, args.to) {
        (Some(from), Some(to)) => (from, to),
        (None, None) => {
            let preset: DateRangePreset = args
                .range
                .as_deref()
                .unwrap_or("all")
                .parse()
                .map_err(|e: String| anyhow!(e))?;
            preset.resolve(Utc::now().date_naive())
        }
        _ => return Err(anyhow!("--from and --to must be given together")),
    };

    let mut working = filter_by_date_range(&trades, start, end);
    if let Some(pattern) = &args.symbol {
        working = filter_by_symbol(&working, pattern);
    }

    let engine = AnalyticsEngine::new(config.account_value);
    let overview = engine.overview(&working);
    let durations = duration_performance(&working);
    let hours = time_of_day_performance(&working);
    let dd = drawdown(&working);
    let weeks = weekly_trend(&working);
    let rankings = symbol_rankings(&working);

    if args.json {
        let report = serde_json::json!({
            "range": { "start": start, "end": end },
            "overview": overview,
            "duration_performance": durations,
            "time_of_day_performance": hours,
            "drawdown": dd,
            "weekly_trend": weeks,
            "symbol_rankings": rankings,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Report {start} to {end}");
    print_overview(&overview);
    print_durations(&durations);
    print_hours(&hours);
    print_drawdown(&dd);
    print_weeks(&weeks);
    print_rankings(&rankings);
    Ok(())
}

fn handle_month(args: MonthArgs, config: &Config) -> anyhow::Result<()> {
    let trades = load_working_set(&args.file)?;
    let engine = AnalyticsEngine::new(config.account_value);

    let month = engine.monthly_stats(&trades, args.year, args.month)?;
    println!(
        "{}-{:02}: {} over {} trading days",
        args.year,
        args.month,
        money(month.pnl),
        month.trading_days
    );

    let mut table = new_table(vec!["Date", "P&L", "Symbols", "Win Rate", "P&L %"]);
    let first = NaiveDate::from_ymd_opt(args.year, args.month, 1)
        .ok_or_else(|| anyhow!("invalid month: {}", args.month))?;
    for date in first.iter_days().take_while(|d| d.month() == args.month) {
        if let Some(day) = engine.daily_stats(&trades, date) {
            table.add_row(vec![
                date.to_string(),
                money(day.pnl),
                day.symbol_count.to_string(),
                percent(day.win_rate),
                percent(day.pnl_percentage),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

fn handle_day(args: DayArgs, config: &Config) -> anyhow::Result<()> {
    let trades = load_working_set(&args.file)?;
    let detail = consolidate_day(&trades, args.date);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    if detail.groups.is_empty() {
        println!("No closed trades on {}", args.date);
        return Ok(());
    }

    print_day_detail(&detail);

    // The per-day percentage view needs the account value, so it comes from
    // the stats engine rather than the consolidator.
    let engine = AnalyticsEngine::new(config.account_value);
    if let Some(day) = engine.daily_stats(&trades, args.date) {
        println!("Day P&L is {} of the account", percent(day.pnl_percentage));
    }
    Ok(())
}

fn handle_review(args: ReviewArgs, config: &Config) -> anyhow::Result<()> {
    let trades = load_working_set(&args.file)?;
    let stats = weekly_auto_stats(&trades, args.date, config.daily_trade_limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let (monday, friday) = analytics::week_range(args.date);
    println!("Weekly review {monday} to {friday}");
    print_review(&stats, config.daily_trade_limit);
    Ok(())
}

// ==============================================================================
// Table Rendering
// ==============================================================================

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(header);
    table
}

fn money(value: Decimal) -> String {
    if value < Decimal::ZERO {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

fn print_overview(overview: &OverviewStats) {
    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec!["Net P&L".to_string(), money(overview.net_pnl)]);
    table.add_row(vec!["Trades".to_string(), overview.trade_count.to_string()]);
    table.add_row(vec![
        "Trade Win %".to_string(),
        format!(
            "{} ({}W/{}N/{}L)",
            percent(overview.win_rate.percentage),
            overview.win_rate.winning,
            overview.win_rate.neutral,
            overview.win_rate.losing
        ),
    ]);
    table.add_row(vec![
        "Profit Factor".to_string(),
        format!("{:.2}", overview.profit_factor),
    ]);
    table.add_row(vec![
        "Day Win %".to_string(),
        format!(
            "{} ({}W/{}N/{}L)",
            percent(overview.day_win_rate.percentage),
            overview.day_win_rate.winning,
            overview.day_win_rate.neutral,
            overview.day_win_rate.losing
        ),
    ]);
    table.add_row(vec![
        "Avg Win/Loss".to_string(),
        format!(
            "{} ({} / {})",
            percent(overview.avg_trade.ratio_pct),
            money(overview.avg_trade.avg_win),
            money(overview.avg_trade.avg_loss)
        ),
    ]);
    println!("{table}");
}

fn print_durations(buckets: &[DurationBucket]) {
    let mut table = new_table(vec!["Held", "Fills", "Avg P&L", "Win Rate"]);
    for bucket in buckets {
        table.add_row(vec![
            bucket.label.to_string(),
            bucket.fills.to_string(),
            money(bucket.avg_pnl),
            percent(bucket.win_rate),
        ]);
    }
    println!("{table}");
}

fn print_hours(hours: &[HourBucket]) {
    let mut table = new_table(vec!["Hour", "Fills", "Avg P&L", "Win Rate"]);
    for bucket in hours {
        table.add_row(vec![
            format!("{:02}:00", bucket.hour),
            bucket.fills.to_string(),
            money(bucket.avg_pnl),
            percent(bucket.win_rate),
        ]);
    }
    println!("{table}");
}

fn print_drawdown(report: &DrawdownReport) {
    println!(
        "Max drawdown {} ({})",
        money(report.max_drawdown),
        percent(report.max_drawdown_pct)
    );
    if let Some((from, to)) = report.max_drawdown_period {
        println!("Worst streak {from} to {to}");
    }
}

fn print_weeks(weeks: &[WeeklyTrendRow]) {
    let mut table = new_table(vec![
        "Week", "Trades", "Win Rate", "Win Profit", "Loss Amount", "Avg W/L", "Turnover",
    ]);
    for week in weeks {
        table.add_row(vec![
            week.week.clone(),
            week.trade_count.to_string(),
            percent(week.win_rate),
            money(week.win_profit),
            money(week.loss_amount),
            percent(week.avg_win_loss),
            money(week.trade_amount),
        ]);
    }
    println!("{table}");
}

fn print_rankings(rankings: &SymbolRankings) {
    let mut table = new_table(vec!["", "Symbol", "Profit", "Loss", "Trades"]);
    for symbol in &rankings.top_profitable {
        table.add_row(vec![
            "top".to_string(),
            symbol.symbol.clone(),
            money(symbol.total_profit),
            money(symbol.total_loss),
            symbol.trade_count.to_string(),
        ]);
    }
    for symbol in &rankings.top_losses {
        table.add_row(vec![
            "worst".to_string(),
            symbol.symbol.clone(),
            money(symbol.total_profit),
            money(symbol.total_loss),
            symbol.trade_count.to_string(),
        ]);
    }
    println!("{table}");
}

fn print_day_detail(detail: &DayDetail) {
    println!(
        "{}: {} | {} winners / {} losers | win rate {}",
        detail.date,
        money(detail.net_pnl),
        detail.winners,
        detail.losers,
        percent(detail.win_rate)
    );
    let mut table = new_table(vec!["Symbol", "Side", "Time", "Qty", "Executions", "P&L"]);
    for group in &detail.groups {
        table.add_row(vec![
            group.symbol.clone(),
            group.side.to_string(),
            group.display_time.format("%H:%M:%S").to_string(),
            group.quantity.to_string(),
            group.executions.to_string(),
            money(group.pnl),
        ]);
    }
    println!("{table}");
}

fn print_review(stats: &WeeklyAutoStats, daily_trade_limit: usize) {
    println!("Total trades:  {}", stats.total_trades);
    println!("P&L result:    {}", money(stats.pnl_result));
    println!(
        "Max win/loss:  {} / {}",
        money(stats.max_win),
        money(stats.max_loss.abs())
    );
    println!("Win rate:      {}", percent(stats.win_rate));
    println!(
        "Max {daily_trade_limit}/day:     {}",
        if stats.follows_daily_limit { "kept" } else { "broken" }
    );
}
