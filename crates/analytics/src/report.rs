use chrono::{DateTime, NaiveDate, Utc};
use core_types::PositionSide;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-symbol quantity and P&L totals inside a single day's stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDayTotals {
    pub quantity: Decimal,
    pub pnl: Decimal,
}

/// One calendar day's performance, computed from closed fills only.
///
/// A day with no closed fills has no `DailyStat` at all: callers receive
/// `None` and must not conflate that with a break-even day whose `pnl` is
/// zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub pnl: Decimal,
    /// Number of distinct symbols traded that day.
    pub symbol_count: usize,
    /// Percentage of individual closed fills with positive P&L.
    pub win_rate: Decimal,
    /// `pnl` as a percentage of the configured account value.
    pub pnl_percentage: Decimal,
    /// Per-symbol breakdown in first-seen order.
    pub symbols: Vec<(String, SymbolDayTotals)>,
}

/// Aggregate over a span of calendar days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeStats {
    pub pnl: Decimal,
    /// Days in the range that had any closed fills.
    pub trading_days: usize,
}

/// Win/neutral/loss counts with the win percentage, used both at fill level
/// and at day level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLossBreakdown {
    pub percentage: Decimal,
    pub winning: usize,
    pub neutral: usize,
    pub losing: usize,
}

/// Average winning and losing trade sizes and their ratio (× 100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageTrade {
    pub ratio_pct: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
}

/// One date-keyed point of the daily or cumulative P&L series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// The headline numbers of the stats page, computed over the working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub net_pnl: Decimal,
    /// Closed fills in the working set.
    pub trade_count: usize,
    pub win_rate: WinLossBreakdown,
    /// Gross profit over gross loss; when there are no losses this reports
    /// the gross profit itself rather than a literal infinity.
    pub profit_factor: Decimal,
    pub day_win_rate: WinLossBreakdown,
    pub avg_trade: AverageTrade,
    pub daily_pnl: Vec<DailyPoint>,
    pub cumulative_pnl: Vec<DailyPoint>,
}

/// Performance of one holding-time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationBucket {
    pub label: &'static str,
    pub fills: usize,
    pub avg_pnl: Decimal,
    pub win_rate: Decimal,
}

/// Performance of one hour of the day (0–23). All 24 hours are always
/// reported, empty ones with zeroed figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub fills: usize,
    pub avg_pnl: Decimal,
    pub win_rate: Decimal,
}

/// One day of the equity/drawdown series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    pub equity: Decimal,
    /// Distance below the running peak; zero whenever equity sets the peak.
    pub drawdown: Decimal,
}

/// Running-peak drawdown over the working set's trading days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownReport {
    pub max_drawdown: Decimal,
    /// `max_drawdown` as a percentage of peak equity; zero when the peak
    /// never rose above zero.
    pub max_drawdown_pct: Decimal,
    /// First and last day of the losing streak that produced the maximum.
    pub max_drawdown_period: Option<(NaiveDate, NaiveDate)>,
    pub series: Vec<DrawdownPoint>,
}

/// One ISO week's trading figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrendRow {
    /// `YYYY-Www`; the week belongs to the year of its Thursday.
    pub week: String,
    /// Closed fills in the week.
    pub trade_count: usize,
    pub win_rate: Decimal,
    /// Sum of positive P&L.
    pub win_profit: Decimal,
    /// Sum of losing P&L magnitudes.
    pub loss_amount: Decimal,
    /// Average win over average loss, × 100.
    pub avg_win_loss: Decimal,
    /// Traded notional: |cost basis| summed over every fill of the week,
    /// opens included.
    pub trade_amount: Decimal,
}

/// Lifetime figures for one symbol within the working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPerformance {
    pub symbol: String,
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub trade_count: usize,
}

/// The best- and worst-performing symbols of the working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRankings {
    pub top_profitable: Vec<SymbolPerformance>,
    pub top_losses: Vec<SymbolPerformance>,
}

/// All closed fills of one symbol on one day, folded into a single row for
/// the day-detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDayGroup {
    pub symbol: String,
    /// Direction of the position the fills closed out.
    pub side: PositionSide,
    /// Timestamp of the earliest fill, shown as the group's time.
    pub display_time: DateTime<Utc>,
    pub pnl: Decimal,
    pub quantity: Decimal,
    /// Distinct execution timestamps, a rough how-many-times-traded count.
    pub executions: usize,
    /// Raw fills folded into this group.
    pub fills: usize,
}

/// The day-detail view: per-symbol groups plus day-level aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub groups: Vec<SymbolDayGroup>,
    pub net_pnl: Decimal,
    /// Groups that ended the day positive.
    pub winners: usize,
    pub losers: usize,
    pub win_rate: Decimal,
}

/// The auto-computed figures of the weekly review form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAutoStats {
    /// Distinct logical trades (by transaction id) in the week's closed
    /// fills; falls back to the raw fill count when ids are absent.
    pub total_trades: usize,
    pub pnl_result: Decimal,
    /// Largest single win, never negative.
    pub max_win: Decimal,
    /// Largest single loss, reported as a non-positive number.
    pub max_loss: Decimal,
    pub win_rate: Decimal,
    /// False when any single day of the week exceeded the configured
    /// trades-per-day limit.
    pub follows_daily_limit: bool,
}
