pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{OrderSide, PositionEffect, PositionSide};
pub use error::CoreError;
pub use structs::{
    RawTradeRecord, TradeRecord, coerce_decimal, parse_timestamp, parse_trade_date,
};
