//! StockScope Core: price data, indicators, crossover signals, statistics, export.
//!
//! This crate contains everything the dashboards compute:
//! - Domain types (bars, price series)
//! - Data providers (Yahoo Finance chart API, CSV directory)
//! - Indicators (SMA, EMA, RSI, MACD) behind a selectable `IndicatorKind`
//! - Moving average crossover detection
//! - Summary statistics
//! - The analysis pipeline that ties them together for one request
//! - CSV export and TOML configuration

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod indicators;
pub mod signals;
pub mod stats;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the types a dashboard hands between threads or
    /// keeps across frames are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();

        require_send::<analysis::AnalysisRequest>();
        require_sync::<analysis::AnalysisRequest>();
        require_send::<analysis::AnalysisReport>();
        require_sync::<analysis::AnalysisReport>();
        require_send::<analysis::MarketSnapshot>();
        require_sync::<analysis::MarketSnapshot>();

        require_send::<signals::CrossoverResult>();
        require_sync::<signals::CrossoverResult>();
        require_send::<stats::SummaryStats>();
        require_sync::<stats::SummaryStats>();
        require_send::<config::StockScopeConfig>();
        require_sync::<config::StockScopeConfig>();

        require_send::<Box<dyn indicators::Indicator>>();
        require_sync::<Box<dyn indicators::Indicator>>();
    }
}
