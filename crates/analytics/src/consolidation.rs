use crate::report::{DayDetail, SymbolDayGroup};
use crate::util::percentage;
use chrono::NaiveDate;
use core_types::{PositionSide, TradeRecord};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Folds one day's closed fills into per-symbol rows for the day-detail
/// view, plus the day-level aggregates shown above the table.
///
/// Grouping is by symbol, in first-seen order. The position-side label is
/// derived from the group's first fill: a sell that closes was unwinding a
/// long, a buy that closes was covering a short. The group's display time is
/// the earliest fill, and `executions` counts distinct execution timestamps
/// as a how-often-traded proxy.
pub fn consolidate_day(trades: &[TradeRecord], date: NaiveDate) -> DayDetail {
    struct GroupAccumulator {
        group: SymbolDayGroup,
        times: BTreeSet<chrono::DateTime<chrono::Utc>>,
    }

    let mut accumulators: Vec<GroupAccumulator> = Vec::new();

    for record in trades {
        if record.trade_date != date || !record.effect.is_close() {
            continue;
        }

        let index = match accumulators
            .iter()
            .position(|acc| acc.group.symbol == record.symbol)
        {
            Some(existing) => existing,
            None => {
                accumulators.push(GroupAccumulator {
                    group: SymbolDayGroup {
                        symbol: record.symbol.clone(),
                        side: PositionSide::from_closing_side(record.side),
                        display_time: record.date_time,
                        pnl: Decimal::ZERO,
                        quantity: Decimal::ZERO,
                        executions: 0,
                        fills: 0,
                    },
                    times: BTreeSet::new(),
                });
                accumulators.len() - 1
            }
        };
        let accumulator = &mut accumulators[index];

        accumulator.group.pnl += record.realized_pnl;
        accumulator.group.quantity += record.quantity.abs();
        accumulator.group.fills += 1;
        accumulator.group.display_time = accumulator.group.display_time.min(record.date_time);
        accumulator.times.insert(record.date_time);
    }

    let groups: Vec<SymbolDayGroup> = accumulators
        .into_iter()
        .map(|mut acc| {
            acc.group.executions = acc.times.len();
            acc.group
        })
        .collect();

    let net_pnl: Decimal = groups.iter().map(|group| group.pnl).sum();
    let winners = groups
        .iter()
        .filter(|group| group.pnl > Decimal::ZERO)
        .count();

    DayDetail {
        date,
        net_pnl,
        winners,
        losers: groups.len() - winners,
        win_rate: percentage(winners, groups.len()),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{OrderSide, PositionEffect, parse_timestamp};
    use rust_decimal_macros::dec;

    fn close_at(id: &str, symbol: &str, time: &str, side: OrderSide, pnl: Decimal) -> TradeRecord {
        TradeRecord {
            id: id.to_string(),
            symbol: symbol.to_string(),
            trade_date: "2024-01-02".parse().unwrap(),
            date_time: parse_timestamp(&format!("2024-01-02 {time}")).unwrap(),
            open_date_time: None,
            side,
            effect: PositionEffect::Close,
            quantity: dec!(10),
            realized_pnl: pnl,
            cost_basis: dec!(1000),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn fills_of_one_symbol_fold_into_one_group() {
        let trades = vec![
            close_at("t1", "AAPL", "10:00:00", OrderSide::Sell, dec!(50)),
            close_at("t2", "AAPL", "09:30:00", OrderSide::Sell, dec!(-20)),
            close_at("t3", "TSLA", "11:00:00", OrderSide::Buy, dec!(30)),
        ];

        let detail = consolidate_day(&trades, day());
        assert_eq!(detail.groups.len(), 2);

        let aapl = &detail.groups[0];
        assert_eq!(aapl.symbol, "AAPL");
        assert_eq!(aapl.pnl, dec!(30));
        assert_eq!(aapl.quantity, dec!(20));
        assert_eq!(aapl.fills, 2);
        // Earliest fill's timestamp wins, even when it arrives second.
        assert_eq!(
            aapl.display_time,
            parse_timestamp("2024-01-02 09:30:00").unwrap()
        );
    }

    #[test]
    fn closing_side_determines_the_position_label() {
        let trades = vec![
            close_at("t1", "AAPL", "10:00:00", OrderSide::Sell, dec!(50)),
            close_at("t2", "TSLA", "10:05:00", OrderSide::Buy, dec!(20)),
        ];

        let detail = consolidate_day(&trades, day());
        assert_eq!(detail.groups[0].side, PositionSide::Long);
        assert_eq!(detail.groups[1].side, PositionSide::Short);
    }

    #[test]
    fn executions_count_distinct_timestamps() {
        let trades = vec![
            close_at("t1", "AAPL", "10:00:00", OrderSide::Sell, dec!(10)),
            close_at("t2", "AAPL", "10:00:00", OrderSide::Sell, dec!(10)),
            close_at("t3", "AAPL", "10:30:00", OrderSide::Sell, dec!(10)),
        ];

        let detail = consolidate_day(&trades, day());
        assert_eq!(detail.groups[0].executions, 2);
        assert_eq!(detail.groups[0].fills, 3);
    }

    #[test]
    fn day_aggregates_count_winning_groups_not_fills() {
        let trades = vec![
            close_at("t1", "AAPL", "10:00:00", OrderSide::Sell, dec!(50)),
            close_at("t2", "AAPL", "10:05:00", OrderSide::Sell, dec!(-10)),
            close_at("t3", "TSLA", "10:10:00", OrderSide::Sell, dec!(-30)),
        ];

        let detail = consolidate_day(&trades, day());
        assert_eq!(detail.net_pnl, dec!(10));
        assert_eq!(detail.winners, 1);
        assert_eq!(detail.losers, 1);
        assert_eq!(detail.win_rate, dec!(50));
    }

    #[test]
    fn a_day_without_closed_fills_is_empty() {
        let detail = consolidate_day(&[], day());
        assert!(detail.groups.is_empty());
        assert_eq!(detail.net_pnl, Decimal::ZERO);
        assert_eq!(detail.win_rate, Decimal::ZERO);
    }
}
