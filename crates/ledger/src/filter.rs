use chrono::{Datelike, Days, NaiveDate};
use core_types::TradeRecord;
use serde::{Deserialize, Serialize};

/// Selects the records whose trade date falls within `[start, end]`.
///
/// Bounds are inclusive UTC day boundaries: `start` is taken at 00:00:00 and
/// `end` at 23:59:59, so a trade dated on either endpoint matches. The input
/// is never mutated; a fresh working subset is returned.
pub fn filter_by_date_range(
    trades: &[TradeRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<TradeRecord> {
    trades
        .iter()
        .filter(|record| record.trade_date >= start && record.trade_date <= end)
        .cloned()
        .collect()
}

/// Selects the records matching a symbol pattern: exact match, or prefix
/// match when the pattern ends with `*` (so `SP*` finds `SPY` and `SPX`).
pub fn filter_by_symbol(trades: &[TradeRecord], pattern: &str) -> Vec<TradeRecord> {
    match pattern.strip_suffix('*') {
        Some(prefix) => trades
            .iter()
            .filter(|record| record.symbol.starts_with(prefix))
            .cloned()
            .collect(),
        None => trades
            .iter()
            .filter(|record| record.symbol == pattern)
            .cloned()
            .collect(),
    }
}

/// The named date ranges the host's quick-select buttons offer. Resolution is
/// relative to a supplied "today" so the core stays clock-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRangePreset {
    Today,
    ThisWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    All,
}

impl DateRangePreset {
    /// Resolves the preset into an inclusive `(start, end)` pair.
    ///
    /// `ThisWeek` runs Sunday through Saturday. `All` starts at 2000-01-01,
    /// comfortably before any personal journal's first fill.
    pub fn resolve(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            DateRangePreset::Today => (today, today),
            DateRangePreset::ThisWeek => {
                let sunday = today - Days::new(u64::from(today.weekday().num_days_from_sunday()));
                (sunday, sunday + Days::new(6))
            }
            DateRangePreset::ThisMonth => month_bounds(today.year(), today.month())
                .expect("current month is always valid"),
            DateRangePreset::LastMonth => {
                let (year, month) = if today.month() == 1 {
                    (today.year() - 1, 12)
                } else {
                    (today.year(), today.month() - 1)
                };
                month_bounds(year, month).expect("previous month is always valid")
            }
            DateRangePreset::ThisYear => year_bounds(today.year()),
            DateRangePreset::LastYear => year_bounds(today.year() - 1),
            DateRangePreset::All => (NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), today),
        }
    }
}

impl std::str::FromStr for DateRangePreset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "today" => Ok(DateRangePreset::Today),
            "this-week" => Ok(DateRangePreset::ThisWeek),
            "this-month" => Ok(DateRangePreset::ThisMonth),
            "last-month" => Ok(DateRangePreset::LastMonth),
            "this-year" => Ok(DateRangePreset::ThisYear),
            "last-year" => Ok(DateRangePreset::LastYear),
            "all" => Ok(DateRangePreset::All),
            other => Err(format!("unknown date range preset: {other:?}")),
        }
    }
}

/// First and last calendar day of the given month, or `None` for an invalid
/// month number.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    Some((first, next_month - Days::new(1)))
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1).expect("jan 1 always exists"),
        NaiveDate::from_ymd_opt(year, 12, 31).expect("dec 31 always exists"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{OrderSide, PositionEffect, parse_timestamp};
    use rust_decimal_macros::dec;

    fn record(symbol: &str, date: &str) -> TradeRecord {
        TradeRecord {
            id: format!("{symbol}-{date}"),
            symbol: symbol.to_string(),
            trade_date: date.parse().unwrap(),
            date_time: parse_timestamp(&format!("{date} 10:00:00")).unwrap(),
            open_date_time: None,
            side: OrderSide::Sell,
            effect: PositionEffect::Close,
            quantity: dec!(10),
            realized_pnl: dec!(5),
            cost_basis: dec!(100),
        }
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let trades = vec![
            record("AAPL", "2024-01-01"),
            record("AAPL", "2024-01-02"),
            record("AAPL", "2024-01-03"),
            record("AAPL", "2024-01-04"),
        ];

        let filtered = filter_by_date_range(
            &trades,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        );

        let dates: Vec<_> = filtered.iter().map(|t| t.trade_date.to_string()).collect();
        assert_eq!(dates, ["2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn symbol_filter_is_exact_without_a_wildcard() {
        let trades = vec![record("SPY", "2024-01-02"), record("SPX", "2024-01-02")];
        let filtered = filter_by_symbol(&trades, "SPY");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].symbol, "SPY");
    }

    #[test]
    fn trailing_star_matches_by_prefix() {
        let trades = vec![
            record("SPY", "2024-01-02"),
            record("SPX", "2024-01-02"),
            record("AAPL", "2024-01-02"),
        ];
        let filtered = filter_by_symbol(&trades, "SP*");
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn filters_do_not_mutate_their_input() {
        let trades = vec![record("SPY", "2024-01-02")];
        let _ = filter_by_symbol(&trades, "QQQ");
        assert_eq!(trades.len(), 1);
    }

    #[test]
    fn this_week_runs_sunday_through_saturday() {
        // 2024-01-10 is a Wednesday.
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let (start, end) = DateRangePreset::ThisWeek.resolve(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
    }

    #[test]
    fn last_month_wraps_the_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let (start, end) = DateRangePreset::LastMonth.resolve(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn month_bounds_handles_leap_february() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
