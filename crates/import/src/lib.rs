//! # Tradebook Import Boundary
//!
//! The one place where untyped broker data enters the system. Comma-separated
//! text (with optional quoting, as the flex exports produce) is parsed into
//! [`RawTradeRecord`] rows and converted into typed [`TradeRecord`]s before
//! anything downstream sees them.
//!
//! Malformed input degrades instead of aborting: rows that cannot be
//! deserialized or dated are skipped with a warning, and malformed numeric
//! fields coerce to zero inside the conversion. A partially broken export
//! still imports everything salvageable.

use core_types::{RawTradeRecord, TradeRecord};
use std::path::Path;
use tracing::{debug, warn};

pub mod error;

pub use error::ImportError;

/// Parses comma-separated text into raw rows.
///
/// The first line is the header; columns are matched by name, so column
/// order does not matter and unknown columns are ignored. Fields are trimmed
/// and unquoted. Rows the reader cannot make sense of are skipped with a
/// warning.
pub fn parse_csv(text: &str) -> Vec<RawTradeRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<RawTradeRecord>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(err) => warn!(row = index + 2, %err, "skipping unreadable CSV row"),
        }
    }
    rows
}

/// Converts raw rows into typed records, dropping the ones that cannot be
/// placed in time.
pub fn to_trade_records(rows: &[RawTradeRecord]) -> Vec<TradeRecord> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match TradeRecord::from_raw(row) {
            Ok(record) => records.push(record),
            Err(err) => warn!(id = %row.transaction_id, %err, "skipping undatable row"),
        }
    }
    records
}

/// Reads a broker export from disk and returns the typed batch, ready for
/// the ledger's merge.
pub fn load_file(path: &Path) -> Result<Vec<TradeRecord>, ImportError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ImportError::Io { path: path.to_path_buf(), source })?;
    let rows = parse_csv(&text);
    let records = to_trade_records(&rows);
    debug!(
        path = %path.display(),
        rows = rows.len(),
        records = records.len(),
        "imported broker export"
    );
    Ok(records)
}
