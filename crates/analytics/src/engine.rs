use crate::error::AnalyticsError;
use crate::report::{
    AverageTrade, DailyPoint, DailyStat, OverviewStats, RangeStats, SymbolDayTotals,
    WinLossBreakdown,
};
use crate::util::{average, percentage};
use chrono::{Days, NaiveDate};
use core_types::TradeRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// A stateless calculator for the journal's day-keyed statistics.
///
/// The only state it carries is the host-configured account value used as the
/// denominator for percentage P&L. Every method takes an immutable snapshot
/// of trade records and computes from scratch.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    account_value: Decimal,
}

impl AnalyticsEngine {
    pub fn new(account_value: Decimal) -> Self {
        Self { account_value }
    }

    /// One calendar day's stats over its closed fills.
    ///
    /// Returns `None` when the day has no closed fills. No trading activity
    /// is a different answer than a day that netted to zero, and callers
    /// (the calendar grid, the range iteration) rely on the distinction.
    pub fn daily_stats(&self, trades: &[TradeRecord], date: NaiveDate) -> Option<DailyStat> {
        let day_fills: Vec<&TradeRecord> = trades
            .iter()
            .filter(|record| record.trade_date == date && record.effect.is_close())
            .collect();

        if day_fills.is_empty() {
            return None;
        }

        // Fold fills into per-symbol totals, first-seen order.
        let mut symbols: Vec<(String, SymbolDayTotals)> = Vec::new();
        for fill in &day_fills {
            match symbols.iter_mut().find(|(symbol, _)| *symbol == fill.symbol) {
                Some((_, totals)) => {
                    totals.quantity += fill.quantity.abs();
                    totals.pnl += fill.realized_pnl;
                }
                None => symbols.push((
                    fill.symbol.clone(),
                    SymbolDayTotals {
                        quantity: fill.quantity.abs(),
                        pnl: fill.realized_pnl,
                    },
                )),
            }
        }

        let pnl: Decimal = symbols.iter().map(|(_, totals)| totals.pnl).sum();
        let winning = day_fills
            .iter()
            .filter(|fill| fill.realized_pnl > Decimal::ZERO)
            .count();

        Some(DailyStat {
            pnl,
            symbol_count: symbols.len(),
            win_rate: percentage(winning, day_fills.len()),
            pnl_percentage: self.pnl_percentage(pnl),
            symbols,
        })
    }

    /// Sums daily stats across every calendar day in `[start, end]`,
    /// counting the days that actually traded.
    pub fn range_stats(&self, trades: &[TradeRecord], start: NaiveDate, end: NaiveDate) -> RangeStats {
        let mut pnl = Decimal::ZERO;
        let mut trading_days = 0;

        for date in start.iter_days().take_while(|date| *date <= end) {
            if let Some(stats) = self.daily_stats(trades, date) {
                pnl += stats.pnl;
                trading_days += 1;
            }
        }

        RangeStats { pnl, trading_days }
    }

    /// Range stats over one calendar month.
    pub fn monthly_stats(
        &self,
        trades: &[TradeRecord],
        year: i32,
        month: u32,
    ) -> Result<RangeStats, AnalyticsError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(AnalyticsError::InvalidMonth(month))?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(AnalyticsError::InvalidMonth(month))?;

        Ok(self.range_stats(trades, first, next_month - Days::new(1)))
    }

    /// The stats-page headline numbers over the working set's closed fills.
    pub fn overview(&self, trades: &[TradeRecord]) -> OverviewStats {
        let closed: Vec<&TradeRecord> = trades
            .iter()
            .filter(|record| record.effect.is_close())
            .collect();

        let net_pnl: Decimal = closed.iter().map(|fill| fill.realized_pnl).sum();

        let winning = closed.iter().filter(|f| f.realized_pnl > Decimal::ZERO).count();
        let losing = closed.iter().filter(|f| f.realized_pnl < Decimal::ZERO).count();
        let neutral = closed.len() - winning - losing;

        let gross_profit: Decimal = closed
            .iter()
            .filter(|f| f.realized_pnl > Decimal::ZERO)
            .map(|f| f.realized_pnl)
            .sum();
        let gross_loss: Decimal = closed
            .iter()
            .filter(|f| f.realized_pnl < Decimal::ZERO)
            .map(|f| f.realized_pnl.abs())
            .sum();

        // Zero losses would make the factor infinite; report the raw profit
        // instead so the figure stays finite and comparable.
        let profit_factor = if gross_loss.is_zero() {
            gross_profit
        } else {
            gross_profit / gross_loss
        };

        // Day-level breakdown, keyed by trade date.
        let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for fill in &closed {
            *days.entry(fill.trade_date).or_insert(Decimal::ZERO) += fill.realized_pnl;
        }
        let winning_days = days.values().filter(|pnl| **pnl > Decimal::ZERO).count();
        let losing_days = days.values().filter(|pnl| **pnl < Decimal::ZERO).count();
        let neutral_days = days.len() - winning_days - losing_days;

        let avg_win = average(gross_profit, winning);
        let avg_loss = average(gross_loss, losing);
        let ratio_pct = if avg_loss.is_zero() {
            avg_win * dec!(100)
        } else {
            avg_win / avg_loss * dec!(100)
        };

        let daily_pnl: Vec<DailyPoint> = days
            .iter()
            .map(|(date, value)| DailyPoint { date: *date, value: *value })
            .collect();
        let mut cumulative_pnl = Vec::with_capacity(daily_pnl.len());
        let mut running = Decimal::ZERO;
        for point in &daily_pnl {
            running += point.value;
            cumulative_pnl.push(DailyPoint { date: point.date, value: running });
        }

        OverviewStats {
            net_pnl,
            trade_count: closed.len(),
            win_rate: WinLossBreakdown {
                percentage: percentage(winning, closed.len()),
                winning,
                neutral,
                losing,
            },
            profit_factor,
            day_win_rate: WinLossBreakdown {
                percentage: percentage(winning_days, days.len()),
                winning: winning_days,
                neutral: neutral_days,
                losing: losing_days,
            },
            avg_trade: AverageTrade { ratio_pct, avg_win, avg_loss },
            daily_pnl,
            cumulative_pnl,
        }
    }

    fn pnl_percentage(&self, pnl: Decimal) -> Decimal {
        if self.account_value.is_zero() {
            Decimal::ZERO
        } else {
            pnl / self.account_value * dec!(100)
        }
    }
}
