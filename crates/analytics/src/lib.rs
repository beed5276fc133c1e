//! # Tradebook Analytics Engine
//!
//! This crate turns the canonical trade set into every derived figure the
//! journal presents: daily, weekly, and monthly P&L, win rates, profit
//! factor, holding-time and time-of-day performance, drawdown, weekly
//! trends, per-symbol rankings, and the auto-filled numbers of the weekly
//! review form.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function takes an immutable snapshot of
//!   trade records plus scalar parameters and returns a freshly computed
//!   structure. Nothing here mutates its input or reads a clock; derived
//!   stats are recomputed from the current set on every call.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: daily/range/monthly stats and the overview report.
//! - `performance`: duration buckets, hour-of-day buckets, drawdown, weekly
//!   trend, symbol rankings.
//! - `consolidation`: per-symbol day groups for the day-detail view.
//! - `review`: Monday–Friday week ranges and weekly auto-stats.
//! - The report structs consumed by the rendering host.

// Declare the modules that constitute this crate.
pub mod consolidation;
pub mod engine;
pub mod error;
pub mod performance;
pub mod report;
pub mod review;
mod util;

// Re-export the key components to create a clean, public-facing API.
pub use consolidation::consolidate_day;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use performance::{
    drawdown, duration_performance, symbol_rankings, time_of_day_performance, weekly_trend,
};
pub use report::{
    DailyStat, DayDetail, DrawdownPoint, DrawdownReport, DurationBucket, HourBucket,
    OverviewStats, RangeStats, SymbolDayGroup, SymbolPerformance, SymbolRankings,
    WeeklyAutoStats, WeeklyTrendRow,
};
pub use review::{week_range, weekly_auto_stats};
