//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance,
//! synthetic bars) so the pipeline can swap implementations and mock for tests.

use crate::error::CoreError;
use crate::log::LogSink;
use crate::period::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily bar from a data provider (before transform).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

/// Structured error types for provider operations.
///
/// The pipeline folds all of these into a single `FetchFailed` kind; the
/// variants only exist so the message says what actually went wrong.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data for {symbol} in the requested range")]
    NoData { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::Synthetic => "synthetic",
        })
    }
}

/// Trait for data providers.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over `[start, end]`.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;

    /// Look up a display name for the symbol. `None` when the provider has
    /// no name or the lookup failed; callers decide the fallback.
    fn resolve_display_name(&self, symbol: &str) -> Option<String>;
}

/// Bars for one symbol together with the name to show for it.
#[derive(Debug, Clone)]
pub struct FetchedSeries {
    pub display_name: String,
    pub result: FetchResult,
}

/// Fetch stage: resolve the display name (falling back to the symbol) and
/// pull bars for the resolved range. Provider errors become `FetchFailed`.
pub fn fetch_series(
    provider: &dyn DataProvider,
    symbol: &str,
    range: &DateRange,
    log: &dyn LogSink,
) -> Result<FetchedSeries, CoreError> {
    let display_name = match provider.resolve_display_name(symbol) {
        Some(name) => name,
        None => {
            log.info(&format!(
                "No display name from {} for {symbol}, using the symbol",
                provider.name()
            ));
            symbol.to_string()
        }
    };

    log.info(&format!(
        "Fetching {display_name} data for the last {}...",
        range.label
    ));

    let result = provider
        .fetch(symbol, range.start, range.end)
        .map_err(|e| CoreError::FetchFailed {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

    Ok(FetchedSeries {
        display_name,
        result,
    })
}
