use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side of the order
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    /// Parses the broker's `Buy/Sell` column. Anything that is not
    /// recognizably a sell is treated as a buy, mirroring how the feed
    /// behaves for blank or unexpected values.
    pub fn from_csv_field(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("sell") {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        }
    }
}

/// Whether a fill opened a new position or closed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionEffect {
    Open,
    Close,
}

impl PositionEffect {
    /// Parses the broker's `Open/CloseIndicator` column: `"C"` marks a close,
    /// everything else is an open.
    pub fn from_indicator(value: &str) -> Self {
        if value.trim() == "C" {
            PositionEffect::Close
        } else {
            PositionEffect::Open
        }
    }

    pub fn is_close(&self) -> bool {
        matches!(self, PositionEffect::Close)
    }
}

/// The direction of the position a close fill unwound. A sell that closes
/// must have been closing a long; a buy that closes was covering a short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Derives the closed position's direction from the close fill's side.
    pub fn from_closing_side(side: OrderSide) -> Self {
        match side {
            OrderSide::Sell => PositionSide::Long,
            OrderSide::Buy => PositionSide::Short,
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSide::Long => write!(f, "LONG"),
            PositionSide::Short => write!(f, "SHORT"),
        }
    }
}
