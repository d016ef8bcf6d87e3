//! The analysis pipeline: request → snapshot → derived series → report.
//!
//! Each stage takes the previous stage's output by value or reference; there
//! is no shared state between runs.

pub mod comparison;
pub mod derived;
pub mod request;
pub mod snapshot;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::data::DataProvider;
use crate::stats::{StatsError, SummaryStats};

pub use comparison::{ComparisonRow, ComparisonTable};
pub use derived::{derive, DerivedSeries};
pub use request::{parse_tickers, validate_range, AnalysisRequest};
pub use snapshot::{fetch_snapshot, MarketSnapshot, TickerWarning};

/// Errors that abort a run before anything is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Error: End date must fall after start date (start {start}, end {end}).")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no tickers given")]
    NoTickers,

    #[error("{name} window must be >= 1 (got {value})")]
    InvalidWindow { name: &'static str, value: usize },
}

/// Crossover, indicators and statistics for the first requested ticker.
#[derive(Debug, Clone)]
pub struct PrimaryAnalysis {
    pub derived: DerivedSeries,
    pub stats: Result<SummaryStats, StatsError>,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub request: AnalysisRequest,
    pub snapshot: MarketSnapshot,
    pub comparison: ComparisonTable,
    /// `None` when the first requested ticker could not be fetched.
    pub primary: Option<PrimaryAnalysis>,
}

impl AnalysisReport {
    pub fn warnings(&self) -> &[TickerWarning] {
        &self.snapshot.warnings
    }

    pub fn derived(&self) -> Option<&DerivedSeries> {
        self.primary.as_ref().map(|p| &p.derived)
    }
}

/// Run the whole pipeline once.
///
/// An invalid request fails before the provider is called. Per-ticker fetch
/// failures end up in the report's warnings.
pub fn run(
    provider: &dyn DataProvider,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, AnalysisError> {
    request.validate()?;
    info!(
        tickers = ?request.tickers,
        start = %request.start,
        end = %request.end,
        provider = provider.name(),
        "running analysis"
    );

    let snapshot = fetch_snapshot(provider, request);
    let comparison = ComparisonTable::from_snapshot(&snapshot);

    let primary = request
        .primary_ticker()
        .and_then(|symbol| snapshot.get(symbol))
        .map(|series| {
            let derived = derive(series, request);
            let stats = SummaryStats::compute(series);
            if let Err(e) = &stats {
                warn!(symbol = series.symbol(), error = %e, "summary statistics unavailable");
            }
            PrimaryAnalysis { derived, stats }
        });

    if primary.is_none() {
        warn!(ticker = ?request.primary_ticker(), "primary ticker unavailable; no derived series");
    }

    Ok(AnalysisReport {
        request: request.clone(),
        snapshot,
        comparison,
        primary,
    })
}
