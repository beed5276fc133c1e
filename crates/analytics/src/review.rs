use crate::report::WeeklyAutoStats;
use crate::util::percentage;
use chrono::{Datelike, Days, NaiveDate};
use core_types::TradeRecord;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// The Monday–Friday span of the week containing `date`. A Saturday or
/// Sunday maps back to the trading week that just ended.
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Days::new(4))
}

/// The auto-filled figures of the weekly review form, for the week
/// containing `date`.
///
/// Trade counting works on distinct transaction ids so partial fills of one
/// order count once; when ids are missing entirely the raw fill count is the
/// fallback. The daily-limit check likewise counts distinct ids per trading
/// day, substituting a symbol/time/quantity composite for fills without an
/// id, and trips when any day exceeds `daily_trade_limit`.
pub fn weekly_auto_stats(
    trades: &[TradeRecord],
    date: NaiveDate,
    daily_trade_limit: usize,
) -> WeeklyAutoStats {
    let (monday, friday) = week_range(date);

    let closed: Vec<&TradeRecord> = trades
        .iter()
        .filter(|record| {
            record.effect.is_close()
                && record.trade_date >= monday
                && record.trade_date <= friday
        })
        .collect();

    let unique_ids: HashSet<&str> = closed
        .iter()
        .filter(|record| !record.id.is_empty())
        .map(|record| record.id.as_str())
        .collect();
    let total_trades = if unique_ids.is_empty() {
        closed.len()
    } else {
        unique_ids.len()
    };

    let pnl_result: Decimal = closed.iter().map(|record| record.realized_pnl).sum();
    let max_win = closed
        .iter()
        .map(|record| record.realized_pnl)
        .max()
        .map_or(Decimal::ZERO, |best| best.max(Decimal::ZERO));
    let max_loss = closed
        .iter()
        .map(|record| record.realized_pnl)
        .min()
        .map_or(Decimal::ZERO, |worst| worst.min(Decimal::ZERO));

    let winners = closed
        .iter()
        .filter(|record| record.realized_pnl > Decimal::ZERO)
        .count();

    let mut per_day: HashMap<NaiveDate, HashSet<String>> = HashMap::new();
    for record in &closed {
        let key = if record.id.is_empty() {
            format!("{}-{}-{}", record.symbol, record.date_time, record.quantity)
        } else {
            record.id.clone()
        };
        per_day.entry(record.trade_date).or_default().insert(key);
    }
    let follows_daily_limit = per_day.values().all(|ids| ids.len() <= daily_trade_limit);

    WeeklyAutoStats {
        total_trades,
        pnl_result,
        max_win,
        max_loss,
        win_rate: percentage(winners, closed.len()),
        follows_daily_limit,
    }
}
