//! End-to-end pass over the full pipeline: merge raw fills into the ledger,
//! take a filtered snapshot, and run every analytics stage against it.

use analytics::{AnalyticsEngine, consolidate_day, drawdown, duration_performance, weekly_trend, weekly_auto_stats};
use chrono::NaiveDate;
use core_types::{OrderSide, PositionEffect, TradeRecord, parse_timestamp};
use ledger::{TradeLedger, filter_by_date_range, filter_by_symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fill(
    id: &str,
    symbol: &str,
    date: &str,
    time: &str,
    side: OrderSide,
    effect: PositionEffect,
    quantity: Decimal,
    pnl: Decimal,
) -> TradeRecord {
    TradeRecord {
        id: id.to_string(),
        symbol: symbol.to_string(),
        trade_date: date.parse().unwrap(),
        date_time: parse_timestamp(&format!("{date} {time}")).unwrap(),
        open_date_time: None,
        side,
        effect,
        quantity,
        realized_pnl: pnl,
        cost_basis: quantity * dec!(100),
    }
}

/// A small but representative week: two symbols, partial fills, an open
/// without a close, and a losing day.
fn example_batch() -> Vec<TradeRecord> {
    vec![
        // Tuesday: AAPL round trip in two partial closes.
        fill("o1", "AAPL", "2024-01-09", "09:30:00", OrderSide::Buy, PositionEffect::Open, dec!(100), dec!(0)),
        fill("c1", "AAPL", "2024-01-09", "09:42:00", OrderSide::Sell, PositionEffect::Close, dec!(60), dec!(90)),
        fill("c2", "AAPL", "2024-01-09", "09:45:00", OrderSide::Sell, PositionEffect::Close, dec!(40), dec!(30)),
        // Wednesday: TSLA short covered at a loss.
        fill("o2", "TSLA", "2024-01-10", "10:00:00", OrderSide::Sell, PositionEffect::Open, dec!(50), dec!(0)),
        fill("c3", "TSLA", "2024-01-10", "13:30:00", OrderSide::Buy, PositionEffect::Close, dec!(50), dec!(-80)),
        // Thursday: an open with no close yet.
        fill("o3", "MSFT", "2024-01-11", "11:00:00", OrderSide::Buy, PositionEffect::Open, dec!(20), dec!(0)),
    ]
}

#[test]
fn merged_ledger_feeds_every_analytics_stage() {
    let mut ledger = TradeLedger::new();
    ledger.merge_batch(example_batch());
    let trades = ledger.trades();

    // The two AAPL partial closes share (symbol, date, effect) and fold into
    // one canonical row.
    let aapl_close = trades
        .iter()
        .find(|t| t.symbol == "AAPL" && t.effect.is_close())
        .unwrap();
    assert_eq!(aapl_close.quantity, dec!(100));
    assert_eq!(aapl_close.realized_pnl, dec!(120));
    // Resolved against the batch's opening fill.
    assert_eq!(
        aapl_close.open_date_time,
        Some(parse_timestamp("2024-01-09 09:30:00").unwrap())
    );

    let engine = AnalyticsEngine::new(dec!(100000));

    let tuesday = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
    let daily = engine.daily_stats(&trades, tuesday).unwrap();
    assert_eq!(daily.pnl, dec!(120));
    assert_eq!(daily.symbol_count, 1);

    let week = engine.range_stats(
        &trades,
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
    );
    assert_eq!(week.pnl, dec!(40));
    assert_eq!(week.trading_days, 2);

    // Duration analytics: the folded AAPL close keeps the first fill's
    // timestamp, a 12-minute hold (09:30 to 09:42); the TSLA cover 3.5 hours.
    let buckets = duration_performance(&trades);
    assert_eq!(buckets[1].label, "5-15m");
    assert_eq!(buckets[1].fills, 1);
    assert_eq!(buckets[5].label, "2-4h");
    assert_eq!(buckets[5].fills, 1);

    let dd = drawdown(&trades);
    assert_eq!(dd.max_drawdown, dec!(80));

    let weeks = weekly_trend(&trades);
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].trade_count, 2);
    // Notional counts the unclosed MSFT open as well; the folded AAPL close
    // keeps the first fill's cost basis.
    assert_eq!(weeks[0].trade_amount, dec!(28000));

    let detail = consolidate_day(&trades, tuesday);
    assert_eq!(detail.groups.len(), 1);
    assert_eq!(detail.groups[0].symbol, "AAPL");
    assert_eq!(detail.win_rate, dec!(100));

    let review = weekly_auto_stats(&trades, tuesday, 3);
    assert_eq!(review.total_trades, 2);
    assert_eq!(review.pnl_result, dec!(40));
    assert_eq!(review.max_win, dec!(120));
    assert_eq!(review.max_loss, dec!(-80));
    assert!(review.follows_daily_limit);
}

#[test]
fn filters_narrow_the_working_set_without_touching_the_ledger() {
    let mut ledger = TradeLedger::new();
    ledger.merge_batch(example_batch());
    let trades = ledger.trades();

    let tuesday_only = filter_by_date_range(
        &trades,
        NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
    );
    assert!(tuesday_only.iter().all(|t| t.symbol == "AAPL"));

    let engine = AnalyticsEngine::new(dec!(100000));
    let overview = engine.overview(&tuesday_only);
    assert_eq!(overview.net_pnl, dec!(120));

    // Prefix filtering keeps both TSLA and the unclosed MSFT open out.
    let aapl = filter_by_symbol(&trades, "AA*");
    assert_eq!(aapl.len(), 2);

    // The canonical set is unchanged underneath.
    assert_eq!(ledger.trades().len(), trades.len());
}
