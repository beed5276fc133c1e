//! # Tradebook Ledger
//!
//! This crate owns the canonical collection of trade records. It is the only
//! place in the system where that collection is mutated: imported batches are
//! merged in here, and every analytics consumer reads an immutable snapshot
//! back out.
//!
//! ## Architectural Principles
//!
//! - **Single mutation point:** `TradeLedger` replaces the global mutable
//!   array the system grew out of. Callers hold the ledger; nothing shares
//!   implicit state.
//! - **Merge-then-recompute:** `merge_batch` runs to completion before any
//!   snapshot is taken, so no reader ever observes a half-merged set.
//!
//! ## Public API
//!
//! - `TradeLedger`: the canonical, id-keyed trade set.
//! - `filter_by_date_range` / `filter_by_symbol`: working-subset selection.
//! - `DateRangePreset`: the named date ranges the UI shortcuts offer.

// Declare the modules that constitute this crate.
pub mod filter;
pub mod merge;

// Re-export the key components to create a clean, public-facing API.
pub use filter::{DateRangePreset, filter_by_date_range, filter_by_symbol};
pub use merge::TradeLedger;
