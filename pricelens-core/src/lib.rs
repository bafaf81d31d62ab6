//! PriceLens Core: market data fetch, series transform, export, and charting.
//!
//! This crate contains every stage of the per-symbol pipeline:
//! - Period tokens resolved to concrete date ranges
//! - Ticker normalization for the provider and for file names
//! - Data providers (Yahoo Finance chart API, deterministic synthetic bars)
//! - Series transform with percent/point change and day accounting
//! - CSV/JSON export with staged, all-or-nothing writes
//! - Two-panel PNG chart rendering
//! - The logging port every component writes through

pub mod chart;
pub mod data;
pub mod error;
pub mod export;
pub mod layout;
pub mod log;
pub mod period;
pub mod series;
pub mod symbol;

pub use chart::ChartRenderer;
pub use error::CoreError;
pub use export::{SeriesWriter, WrittenFiles};
pub use layout::OutputLayout;
pub use log::{LogLevel, LogSink, MemoryLog, NullLog};
pub use period::{resolve, DateRange, Period};
pub use series::{transform, DailyRecord, Series};
pub use symbol::{canonical_file_stem, normalize, MarketConvention};
