use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// `part / whole * 100`, with an empty population defined as 0 rather than a
/// division error. Every win-rate in this crate funnels through here so the
/// guard is applied uniformly.
pub(crate) fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(part) / Decimal::from(whole) * dec!(100)
    }
}

/// Average of a pre-summed total over a count, 0 for an empty population.
pub(crate) fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}
