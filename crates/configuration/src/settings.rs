use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every field has a default matching the journal's long-standing constants,
/// so a missing `config.toml` is not an error; the host simply runs with
/// the defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The account value used as the denominator for percentage P&L figures.
    #[serde(default = "default_account_value")]
    pub account_value: Decimal,

    /// The self-imposed maximum number of distinct trades per day; the
    /// weekly review reports whether any day of the week exceeded it.
    #[serde(default = "default_daily_trade_limit")]
    pub daily_trade_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_value: default_account_value(),
            daily_trade_limit: default_daily_trade_limit(),
        }
    }
}

fn default_account_value() -> Decimal {
    dec!(100000)
}

fn default_daily_trade_limit() -> usize {
    3
}
