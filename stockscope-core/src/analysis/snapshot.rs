//! Fetching every requested ticker into one owned snapshot.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AnalysisRequest;
use crate::data::DataProvider;
use crate::domain::PriceSeries;

/// A ticker left out of the snapshot and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerWarning {
    pub symbol: String,
    pub message: String,
    /// The provider had nothing for the symbol, as opposed to failing.
    pub empty: bool,
}

/// The fetched series, in request order, plus warnings for excluded tickers.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub series: Vec<PriceSeries>,
    pub warnings: Vec<TickerWarning>,
}

impl MarketSnapshot {
    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.series.iter().find(|s| s.symbol() == symbol)
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.symbol()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Fetch every requested ticker.
///
/// Per-ticker failures never propagate: the ticker is dropped and recorded as
/// a warning.
pub fn fetch_snapshot(provider: &dyn DataProvider, request: &AnalysisRequest) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::default();
    for symbol in &request.tickers {
        match provider.fetch(symbol, request.start, request.end) {
            Ok(result) if result.bars.is_empty() => {
                warn!(symbol = %symbol, provider = provider.name(), "no data returned; skipping");
                snapshot.warnings.push(TickerWarning {
                    symbol: symbol.clone(),
                    message: format!("No data found for {symbol}. Skipping."),
                    empty: true,
                });
            }
            Ok(result) => {
                info!(symbol = %symbol, bars = result.bars.len(), source = ?result.source, "fetched");
                snapshot.series.push(result.into_series());
            }
            Err(e) => {
                warn!(symbol = %symbol, provider = provider.name(), error = %e, "fetch failed; skipping");
                let message = if e.is_empty_result() {
                    format!("No data found for {symbol}. Skipping.")
                } else {
                    format!("Could not fetch {symbol}: {e}")
                };
                snapshot.warnings.push(TickerWarning {
                    symbol: symbol.clone(),
                    message,
                    empty: e.is_empty_result(),
                });
            }
        }
    }
    snapshot
}
