use crate::enums::{OrderSide, PositionEffect};
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One execution fill exactly as it arrives from the broker's CSV export:
/// every field is still a string. Conversion into a typed [`TradeRecord`]
/// happens once, at the import boundary, so the analytics code never touches
/// untyped data.
///
/// The serde renames match the broker's column headers verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTradeRecord {
    #[serde(rename = "TransactionID", default)]
    pub transaction_id: String,
    #[serde(rename = "Symbol", default)]
    pub symbol: String,
    #[serde(rename = "TradeDate", default)]
    pub trade_date: String,
    #[serde(rename = "DateTime", default)]
    pub date_time: String,
    #[serde(rename = "Buy/Sell", default)]
    pub side: String,
    #[serde(rename = "Open/CloseIndicator", default)]
    pub indicator: String,
    #[serde(rename = "Quantity", default)]
    pub quantity: String,
    #[serde(rename = "FifoPnlRealized", default)]
    pub realized_pnl: String,
    #[serde(rename = "CostBasis", default)]
    pub cost_basis: String,
}

/// A single execution fill with typed fields, the unit every downstream
/// computation works on.
///
/// `realized_pnl` is only meaningful when `effect` is [`PositionEffect::Close`];
/// the broker reports FIFO-matched P&L on the closing fill. `open_date_time`
/// is derived during merging (the timestamp of the fill that opened the
/// position this close unwound) and stays `None` when no opening fill could
/// be found in the same batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub symbol: String,
    pub trade_date: NaiveDate,
    pub date_time: DateTime<Utc>,
    pub open_date_time: Option<DateTime<Utc>>,
    pub side: OrderSide,
    pub effect: PositionEffect,
    /// Unsigned magnitude of shares/contracts; the sign of the broker's
    /// quantity column is folded into `side`.
    pub quantity: Decimal,
    pub realized_pnl: Decimal,
    pub cost_basis: Decimal,
}

impl TradeRecord {
    /// Converts a raw CSV row into a typed record.
    ///
    /// Numeric fields follow the coercion rule: anything that does not parse
    /// becomes zero rather than failing the row. The two date fields are the
    /// only hard requirement: a fill that cannot be placed in time is
    /// useless to every downstream computation, so those rows error and the
    /// caller decides to skip them.
    pub fn from_raw(raw: &RawTradeRecord) -> Result<Self, CoreError> {
        let trade_date = parse_trade_date(&raw.trade_date)
            .ok_or_else(|| CoreError::InvalidDate("TradeDate".into(), raw.trade_date.clone()))?;
        let date_time = parse_timestamp(&raw.date_time)
            .ok_or_else(|| CoreError::InvalidDate("DateTime".into(), raw.date_time.clone()))?;

        Ok(Self {
            id: raw.transaction_id.trim().to_string(),
            symbol: raw.symbol.trim().to_string(),
            trade_date,
            date_time,
            open_date_time: None,
            side: OrderSide::from_csv_field(&raw.side),
            effect: PositionEffect::from_indicator(&raw.indicator),
            quantity: coerce_decimal(&raw.quantity).abs(),
            realized_pnl: coerce_decimal(&raw.realized_pnl),
            cost_basis: coerce_decimal(&raw.cost_basis),
        })
    }

    /// The duration this record's position was held, in whole minutes.
    /// `None` when the opening fill is unknown.
    pub fn holding_minutes(&self) -> Option<i64> {
        self.open_date_time
            .map(|open| (self.date_time - open).num_minutes())
    }
}

/// Parses a numeric CSV field. Trims whitespace and stray quotes first;
/// anything unparseable (including the empty string) coerces to zero so a
/// malformed row degrades instead of poisoning downstream sums.
pub fn coerce_decimal(value: &str) -> Decimal {
    let cleaned = value.trim().trim_matches('"').trim();
    cleaned.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Parses the broker's trade-date column. Both the ISO form and the compact
/// flex-report form (`20240102`) appear in the wild.
pub fn parse_trade_date(value: &str) -> Option<NaiveDate> {
    let cleaned = value.trim().trim_matches('"');
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(cleaned, "%Y%m%d"))
        .ok()
}

/// Parses an execution timestamp. Flex reports write `20240102;093005`,
/// other exports use ISO variants; all are interpreted as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let cleaned = value.trim().trim_matches('"');
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y%m%d;%H%M%S",
        "%Y%m%d %H%M%S",
    ];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}
