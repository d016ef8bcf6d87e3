//! StockScope TUI: terminal dashboard over the stockscope-core pipeline.
//!
//! Provides:
//! - An input form (tickers, date range, MA windows) that re-runs the pipeline
//! - Comparison and overview tables with summary statistics
//! - Crossover and indicator line charts
//! - A candlestick view
//! - CSV export, dark/light theme and persisted form state

pub mod app;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use theme::Theme;

#[cfg(test)]
mod test_helpers;
