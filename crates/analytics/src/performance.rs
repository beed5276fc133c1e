use crate::report::{
    DrawdownPoint, DrawdownReport, DurationBucket, HourBucket, SymbolPerformance,
    SymbolRankings, WeeklyTrendRow,
};
use crate::util::{average, percentage};
use chrono::{Datelike, NaiveDate, Timelike};
use core_types::TradeRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// The fixed holding-time ranges, ascending, with their upper bounds in
/// minutes. Anything past the last bound lands in `4h+`.
const DURATION_RANGES: [(&str, i64); 6] = [
    ("0-5m", 5),
    ("5-15m", 15),
    ("15-30m", 30),
    ("30-60m", 60),
    ("1-2h", 120),
    ("2-4h", 240),
];
const OVERFLOW_RANGE: &str = "4h+";

/// How many symbols each side of the rankings keeps.
const RANKING_SIZE: usize = 3;

#[derive(Default)]
struct BucketAccumulator {
    fills: usize,
    winners: usize,
    total_pnl: Decimal,
}

impl BucketAccumulator {
    fn add(&mut self, pnl: Decimal) {
        self.fills += 1;
        self.total_pnl += pnl;
        if pnl > Decimal::ZERO {
            self.winners += 1;
        }
    }
}

/// P&L and win rate by holding time.
///
/// Only closed fills with a resolved opening timestamp participate; a close
/// whose opening fill is unknown has no duration and is excluded rather than
/// guessed into a bucket. All seven ranges are always present, empty ones
/// reporting zeroes. Upper bounds are inclusive: a fill held exactly five
/// minutes is `0-5m`.
pub fn duration_performance(trades: &[TradeRecord]) -> Vec<DurationBucket> {
    let mut buckets: Vec<BucketAccumulator> = (0..=DURATION_RANGES.len())
        .map(|_| BucketAccumulator::default())
        .collect();

    for record in trades {
        if !record.effect.is_close() {
            continue;
        }
        let Some(opened) = record.open_date_time else {
            continue;
        };
        let held_seconds = (record.date_time - opened).num_seconds();
        let index = DURATION_RANGES
            .iter()
            .position(|(_, minutes)| held_seconds <= minutes * 60)
            .unwrap_or(DURATION_RANGES.len());
        buckets[index].add(record.realized_pnl);
    }

    buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| DurationBucket {
            label: DURATION_RANGES
                .get(index)
                .map(|(label, _)| *label)
                .unwrap_or(OVERFLOW_RANGE),
            fills: bucket.fills,
            avg_pnl: average(bucket.total_pnl, bucket.fills),
            win_rate: percentage(bucket.winners, bucket.fills),
        })
        .collect()
}

/// P&L and win rate by hour of day (UTC).
///
/// Every fill participates, opens included. This mirrors the journal's
/// historical behavior, where the hour chart answered "when am I active"
/// while the duration chart answered "how long do I hold". All 24 hours are
/// always present, ascending.
pub fn time_of_day_performance(trades: &[TradeRecord]) -> Vec<HourBucket> {
    let mut hours: Vec<BucketAccumulator> =
        (0..24).map(|_| BucketAccumulator::default()).collect();

    for record in trades {
        hours[record.date_time.hour() as usize].add(record.realized_pnl);
    }

    hours
        .iter()
        .enumerate()
        .map(|(hour, bucket)| HourBucket {
            hour: hour as u32,
            fills: bucket.fills,
            avg_pnl: average(bucket.total_pnl, bucket.fills),
            win_rate: percentage(bucket.winners, bucket.fills),
        })
        .collect()
}

/// Running-peak drawdown over the working set's trading days.
///
/// The equity curve cumulatively sums each trading day's closed P&L; days
/// without closed fills contribute no entry. A losing streak begins on the
/// first day below the running peak and ends when a fresh peak is set; the
/// reported period spans from the start of the streak containing the maximum
/// to the day the maximum was reached.
pub fn drawdown(trades: &[TradeRecord]) -> DrawdownReport {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in trades {
        if record.effect.is_close() {
            *days.entry(record.trade_date).or_insert(Decimal::ZERO) += record.realized_pnl;
        }
    }
    let dates: Vec<NaiveDate> = days.keys().copied().collect();

    let mut series = Vec::with_capacity(days.len());
    let mut equity = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_drawdown = Decimal::ZERO;
    let mut streak_start: Option<usize> = None;
    let mut max_streak: Option<(usize, usize)> = None;

    for (index, (date, day_pnl)) in days.iter().enumerate() {
        equity += *day_pnl;

        if equity > peak {
            peak = equity;
            streak_start = None;
        } else {
            let current = peak - equity;
            let start = *streak_start.get_or_insert(index);
            if current > max_drawdown {
                max_drawdown = current;
                max_streak = Some((start, index));
            }
        }

        series.push(DrawdownPoint {
            date: *date,
            equity,
            drawdown: peak - equity,
        });
    }

    let max_drawdown_pct = if peak > Decimal::ZERO {
        max_drawdown / peak * dec!(100)
    } else {
        Decimal::ZERO
    };

    DrawdownReport {
        max_drawdown,
        max_drawdown_pct,
        max_drawdown_period: max_streak.map(|(start, end)| (dates[start], dates[end])),
        series,
    }
}

#[derive(Default)]
struct WeekAccumulator {
    trade_count: usize,
    win_count: usize,
    loss_count: usize,
    win_profit: Decimal,
    loss_amount: Decimal,
    trade_amount: Decimal,
}

/// Per-ISO-week trading figures, ascending by week key.
///
/// The week key follows the Thursday rule: `2024-12-31` belongs to
/// `2025-W01`. Traded notional counts every fill of the week; the win/loss
/// figures count closed fills only, so a week of pure opens still appears,
/// with zero trades and its notional.
pub fn weekly_trend(trades: &[TradeRecord]) -> Vec<WeeklyTrendRow> {
    let mut weeks: BTreeMap<String, WeekAccumulator> = BTreeMap::new();

    for record in trades {
        let iso = record.trade_date.iso_week();
        let key = format!("{}-W{:02}", iso.year(), iso.week());
        let week = weeks.entry(key).or_default();

        week.trade_amount += record.cost_basis.abs();

        if record.effect.is_close() {
            week.trade_count += 1;
            if record.realized_pnl > Decimal::ZERO {
                week.win_count += 1;
                week.win_profit += record.realized_pnl;
            } else if record.realized_pnl < Decimal::ZERO {
                week.loss_count += 1;
                week.loss_amount += record.realized_pnl.abs();
            }
        }
    }

    weeks
        .into_iter()
        .map(|(week, acc)| {
            // Divisors fall back to 1 so an all-win or all-loss week stays
            // finite instead of dividing by zero.
            let avg_win = acc.win_profit / Decimal::from(acc.win_count.max(1));
            let avg_loss = acc.loss_amount / Decimal::from(acc.loss_count.max(1));
            let avg_win_loss = if avg_loss.is_zero() {
                avg_win * dec!(100)
            } else {
                avg_win / avg_loss * dec!(100)
            };

            WeeklyTrendRow {
                week,
                trade_count: acc.trade_count,
                win_rate: percentage(acc.win_count, acc.trade_count),
                win_profit: acc.win_profit,
                loss_amount: acc.loss_amount,
                avg_win_loss,
                trade_amount: acc.trade_amount,
            }
        })
        .collect()
}

/// The best and worst symbols of the working set, by gross profit and gross
/// loss respectively, three per side.
pub fn symbol_rankings(trades: &[TradeRecord]) -> SymbolRankings {
    let mut stats: Vec<SymbolPerformance> = Vec::new();

    for record in trades {
        if !record.effect.is_close() {
            continue;
        }
        let index = match stats.iter().position(|s| s.symbol == record.symbol) {
            Some(existing) => existing,
            None => {
                stats.push(SymbolPerformance {
                    symbol: record.symbol.clone(),
                    total_profit: Decimal::ZERO,
                    total_loss: Decimal::ZERO,
                    trade_count: 0,
                });
                stats.len() - 1
            }
        };
        let entry = &mut stats[index];

        entry.trade_count += 1;
        if record.realized_pnl >= Decimal::ZERO {
            entry.total_profit += record.realized_pnl;
        } else {
            entry.total_loss += record.realized_pnl.abs();
        }
    }

    let mut top_profitable = stats.clone();
    top_profitable.sort_by(|a, b| b.total_profit.cmp(&a.total_profit));
    top_profitable.truncate(RANKING_SIZE);

    let mut top_losses = stats;
    top_losses.sort_by(|a, b| b.total_loss.cmp(&a.total_loss));
    top_losses.truncate(RANKING_SIZE);

    SymbolRankings {
        top_profitable,
        top_losses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use core_types::{OrderSide, PositionEffect, parse_timestamp};

    fn ts(value: &str) -> DateTime<Utc> {
        parse_timestamp(value).unwrap()
    }

    fn fill(
        id: &str,
        symbol: &str,
        date: &str,
        effect: PositionEffect,
        pnl: Decimal,
    ) -> TradeRecord {
        TradeRecord {
            id: id.to_string(),
            symbol: symbol.to_string(),
            trade_date: date.parse().unwrap(),
            date_time: ts(&format!("{date} 10:00:00")),
            open_date_time: None,
            side: OrderSide::Sell,
            effect,
            quantity: dec!(10),
            realized_pnl: pnl,
            cost_basis: dec!(1000),
        }
    }

    fn close(id: &str, symbol: &str, date: &str, pnl: Decimal) -> TradeRecord {
        fill(id, symbol, date, PositionEffect::Close, pnl)
    }

    fn held_close(id: &str, opened: &str, closed: &str, pnl: Decimal) -> TradeRecord {
        let mut record = close(id, "AAPL", "2024-01-02", pnl);
        record.date_time = ts(closed);
        record.open_date_time = Some(ts(opened));
        record
    }

    #[test]
    fn exactly_five_minutes_lands_in_the_first_bucket() {
        let trades = vec![
            held_close("t1", "2024-01-02 09:30:00", "2024-01-02 09:35:00", dec!(10)),
            held_close("t2", "2024-01-02 09:30:00", "2024-01-02 09:35:01", dec!(-5)),
        ];

        let buckets = duration_performance(&trades);
        assert_eq!(buckets[0].label, "0-5m");
        assert_eq!(buckets[0].fills, 1);
        assert_eq!(buckets[1].label, "5-15m");
        assert_eq!(buckets[1].fills, 1);
    }

    #[test]
    fn very_long_holds_land_in_the_overflow_bucket() {
        let trades = vec![held_close(
            "t1",
            "2024-01-02 09:30:00",
            "2024-01-02 15:30:00",
            dec!(40),
        )];

        let buckets = duration_performance(&trades);
        assert_eq!(buckets.len(), 7);
        let overflow = buckets.last().unwrap();
        assert_eq!(overflow.label, "4h+");
        assert_eq!(overflow.fills, 1);
        assert_eq!(overflow.avg_pnl, dec!(40));
        assert_eq!(overflow.win_rate, dec!(100));
    }

    #[test]
    fn closes_without_an_open_time_are_excluded_from_duration_buckets() {
        let trades = vec![close("t1", "AAPL", "2024-01-02", dec!(50))];

        let buckets = duration_performance(&trades);
        assert!(buckets.iter().all(|bucket| bucket.fills == 0));
        assert!(buckets.iter().all(|bucket| bucket.avg_pnl.is_zero()));
    }

    #[test]
    fn every_hour_is_reported_even_when_empty() {
        let mut record = close("t1", "AAPL", "2024-01-02", dec!(30));
        record.date_time = ts("2024-01-02 14:25:00");

        let hours = time_of_day_performance(&[record]);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[14].fills, 1);
        assert_eq!(hours[14].avg_pnl, dec!(30));
        assert_eq!(hours[0].fills, 0);
        assert_eq!(hours[0].win_rate, Decimal::ZERO);
        // Ascending hour order.
        for (index, bucket) in hours.iter().enumerate() {
            assert_eq!(bucket.hour, index as u32);
        }
    }

    #[test]
    fn open_fills_are_counted_in_hour_buckets() {
        let mut open = fill("t1", "AAPL", "2024-01-02", PositionEffect::Open, dec!(0));
        open.date_time = ts("2024-01-02 09:15:00");

        let hours = time_of_day_performance(&[open]);
        assert_eq!(hours[9].fills, 1);
    }

    #[test]
    fn drawdown_tracks_the_running_peak() {
        // Daily P&Ls produce the equity sequence 100, 80, 120, 90.
        let trades = vec![
            close("t1", "AAPL", "2024-01-02", dec!(100)),
            close("t2", "AAPL", "2024-01-03", dec!(-20)),
            close("t3", "AAPL", "2024-01-04", dec!(40)),
            close("t4", "AAPL", "2024-01-05", dec!(-30)),
        ];

        let report = drawdown(&trades);
        let drawdowns: Vec<Decimal> = report.series.iter().map(|p| p.drawdown).collect();
        assert_eq!(drawdowns, vec![dec!(0), dec!(20), dec!(0), dec!(30)]);
        assert_eq!(report.max_drawdown, dec!(30));
        assert_eq!(report.max_drawdown_pct, dec!(30) / dec!(120) * dec!(100));
        assert_eq!(
            report.max_drawdown_period,
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
            ))
        );
    }

    #[test]
    fn drawdown_is_never_negative_and_zero_at_new_peaks() {
        let trades = vec![
            close("t1", "AAPL", "2024-01-02", dec!(-50)),
            close("t2", "AAPL", "2024-01-03", dec!(80)),
            close("t3", "AAPL", "2024-01-04", dec!(10)),
            close("t4", "AAPL", "2024-01-05", dec!(-5)),
        ];

        let report = drawdown(&trades);
        let mut peak = Decimal::ZERO;
        for point in &report.series {
            assert!(point.drawdown >= Decimal::ZERO);
            if point.equity > peak {
                peak = point.equity;
            }
            if point.equity == peak {
                assert_eq!(point.drawdown, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn drawdown_with_no_positive_peak_reports_zero_percent() {
        let trades = vec![
            close("t1", "AAPL", "2024-01-02", dec!(-40)),
            close("t2", "AAPL", "2024-01-03", dec!(-10)),
        ];

        let report = drawdown(&trades);
        assert_eq!(report.max_drawdown, dec!(50));
        assert_eq!(report.max_drawdown_pct, Decimal::ZERO);
    }

    #[test]
    fn weekly_trend_counts_notional_for_opens_but_trades_for_closes_only() {
        // 2024-01-02 is a Tuesday; both fills share ISO week 2024-W01.
        let mut open = fill("t1", "AAPL", "2024-01-02", PositionEffect::Open, dec!(0));
        open.cost_basis = dec!(500);
        let trades = vec![open, close("t2", "AAPL", "2024-01-03", dec!(25))];

        let rows = weekly_trend(&trades);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].week, "2024-W01");
        assert_eq!(rows[0].trade_count, 1);
        assert_eq!(rows[0].trade_amount, dec!(1500));
    }

    #[test]
    fn week_key_follows_the_thursday_rule_across_new_year() {
        // 2024-12-31 is a Tuesday whose week's Thursday is 2025-01-02.
        let trades = vec![close("t1", "AAPL", "2024-12-31", dec!(10))];

        let rows = weekly_trend(&trades);
        assert_eq!(rows[0].week, "2025-W01");
    }

    #[test]
    fn all_win_week_keeps_a_finite_ratio() {
        let trades = vec![
            close("t1", "AAPL", "2024-01-02", dec!(30)),
            close("t2", "AAPL", "2024-01-03", dec!(10)),
        ];

        let rows = weekly_trend(&trades);
        assert_eq!(rows[0].win_rate, dec!(100));
        // No losses: ratio falls back to the average win × 100.
        assert_eq!(rows[0].avg_win_loss, dec!(2000));
    }

    #[test]
    fn rankings_keep_three_per_side_sorted() {
        let trades = vec![
            close("t1", "AAPL", "2024-01-02", dec!(100)),
            close("t2", "TSLA", "2024-01-02", dec!(80)),
            close("t3", "MSFT", "2024-01-02", dec!(60)),
            close("t4", "NVDA", "2024-01-02", dec!(40)),
            close("t5", "AMD", "2024-01-02", dec!(-90)),
            close("t6", "META", "2024-01-02", dec!(-10)),
        ];

        let rankings = symbol_rankings(&trades);
        let profits: Vec<&str> = rankings
            .top_profitable
            .iter()
            .map(|s| s.symbol.as_str())
            .collect();
        assert_eq!(profits, ["AAPL", "TSLA", "MSFT"]);
        assert_eq!(rankings.top_losses[0].symbol, "AMD");
        assert_eq!(rankings.top_losses[0].total_loss, dec!(90));
    }
}
