//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV
//! directory) so the analysis pipeline can swap implementations and tests can
//! use in-memory fakes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Bar, PriceSeries};

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data for '{symbol}' between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("malformed CSV row in {path}: {reason}")]
    MalformedCsv { path: String, reason: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// True for the "nothing to show" family: unknown symbol or empty range.
    ///
    /// The pipeline reports these as warnings rather than failures.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, DataError::SymbolNotFound { .. } | DataError::NoData { .. })
    }
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub source: DataSource,
}

impl FetchResult {
    pub fn into_series(self) -> PriceSeries {
        PriceSeries::new(self.symbol, self.bars)
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
}

/// Trait for data providers (Yahoo Finance, CSV import, etc).
///
/// `end` is exclusive: a request for `[2024-01-01, 2024-02-01)` never returns
/// the February 1st bar. Implementations return `DataError::NoData` when the
/// symbol exists but the range holds no bars.
pub trait DataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over `[start, end)`.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}
