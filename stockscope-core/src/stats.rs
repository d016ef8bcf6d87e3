//! Summary statistics over a price series.
//!
//! Pure functions: series in, scalar out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceSeries;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("no bars for {symbol}")]
    EmptySeries { symbol: String },

    #[error("first close of {symbol} is zero; percentage change is undefined")]
    ZeroBaseline { symbol: String },
}

/// Headline numbers shown next to the overview table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub symbol: String,
    pub highest_price: f64,
    pub lowest_price: f64,
    /// (last close - first close) / first close, in percent.
    pub pct_change: f64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub bar_count: usize,
}

impl SummaryStats {
    pub fn compute(series: &PriceSeries) -> Result<Self, StatsError> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return Err(StatsError::EmptySeries {
                    symbol: series.symbol().to_string(),
                })
            }
        };
        let pct_change = pct_change(first.close, last.close).ok_or_else(|| StatsError::ZeroBaseline {
            symbol: series.symbol().to_string(),
        })?;

        Ok(Self {
            symbol: series.symbol().to_string(),
            highest_price: highest(series.bars().iter().map(|b| b.high)),
            lowest_price: lowest(series.bars().iter().map(|b| b.low)),
            pct_change,
            first_date: first.date,
            last_date: last.date,
            bar_count: series.len(),
        })
    }
}

// ─── Individual statistics ──────────────────────────────────────────

/// Maximum of the non-NaN values; NaN when there are none.
pub fn highest(values: impl IntoIterator<Item = f64>) -> f64 {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v > acc { v } else { acc })
}

/// Minimum of the non-NaN values; NaN when there are none.
pub fn lowest(values: impl IntoIterator<Item = f64>) -> f64 {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v < acc { v } else { acc })
}

/// Percentage change from `first` to `last`. `None` for a zero baseline.
pub fn pct_change(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}
