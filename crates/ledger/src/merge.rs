use chrono::{DateTime, NaiveDate, Utc};
use core_types::{PositionEffect, TradeRecord};
use indexmap::IndexMap;
use tracing::debug;

/// The canonical trade set, keyed by the broker's transaction id.
///
/// Two reconciliation policies live here, deliberately kept apart because
/// they serve different call sites:
///
/// - [`merge_batch`](TradeLedger::merge_batch) is last-write-wins on the id:
///   a second import pass carrying corrected data for a transaction simply
///   replaces the earlier row.
/// - [`trades`](TradeLedger::trades) folds records that share
///   (`symbol`, `trade_date`, `effect`) into one row with summed totals,
///   which is how partial fills of the same logical trade are presented.
#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    records: IndexMap<String, TradeRecord>,
}

impl TradeLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from previously merged records, e.g. a snapshot the
    /// host persisted. Insertion order is preserved.
    pub fn from_records(records: Vec<TradeRecord>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            ledger.records.insert(record.id.clone(), record);
        }
        ledger
    }

    /// Merges a freshly imported batch into the canonical set.
    ///
    /// For every close fill in the batch, the opening timestamp is resolved
    /// first: the latest `date_time` among fills of the *same batch* with the
    /// same symbol, an `Open` effect, and a strictly earlier timestamp. Close
    /// fills whose opening fill is not in the batch keep `open_date_time =
    /// None` and are later excluded from holding-time analytics.
    ///
    /// Insertion is last-write-wins on the transaction id, which makes
    /// re-importing the same file a no-op.
    pub fn merge_batch(&mut self, batch: Vec<TradeRecord>) {
        let opens: Vec<(String, DateTime<Utc>)> = batch
            .iter()
            .filter(|record| record.effect == PositionEffect::Open)
            .map(|record| (record.symbol.clone(), record.date_time))
            .collect();

        let incoming = batch.len();
        for mut record in batch {
            if record.effect.is_close() {
                record.open_date_time = opens
                    .iter()
                    .filter(|(symbol, opened)| {
                        *symbol == record.symbol && *opened < record.date_time
                    })
                    .map(|(_, opened)| *opened)
                    .max();
            }
            self.records.insert(record.id.clone(), record);
        }

        debug!(incoming, total = self.records.len(), "merged trade batch");
    }

    /// The canonical view: records in insertion order, with same-day
    /// duplicates folded together.
    ///
    /// Fills sharing (`symbol`, `trade_date`, `effect`) are one logical
    /// trade: quantities sum, and realized P&L sums for closes. The first
    /// record's id survives; the duplicate's slot is discarded. Running this
    /// twice over its own output changes nothing.
    pub fn trades(&self) -> Vec<TradeRecord> {
        let mut merged: Vec<TradeRecord> = Vec::with_capacity(self.records.len());
        let mut seen: IndexMap<(String, NaiveDate, PositionEffect), usize> = IndexMap::new();

        for record in self.records.values() {
            let key = (record.symbol.clone(), record.trade_date, record.effect);
            match seen.get(&key) {
                Some(&index) => {
                    let existing = &mut merged[index];
                    existing.quantity += record.quantity;
                    if existing.effect.is_close() {
                        existing.realized_pnl += record.realized_pnl;
                    }
                }
                None => {
                    seen.insert(key, merged.len());
                    merged.push(record.clone());
                }
            }
        }

        merged
    }

    /// Drops every record. The explicit end of the collection's lifecycle.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of distinct transaction ids held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
