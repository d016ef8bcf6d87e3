//! Derived columns for the primary ticker.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::AnalysisRequest;
use crate::domain::{Bar, PriceSeries};
use crate::indicators::{compute_selected, IndicatorKind};
use crate::signals::{CrossoverDetector, CrossoverEvent, CrossoverResult};

/// A price series plus moving averages, crossover state and the selected
/// indicators, all aligned 1:1 with the bars.
#[derive(Debug, Clone)]
pub struct DerivedSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub short_window: usize,
    pub long_window: usize,
    pub crossover: CrossoverResult,
    pub indicators: BTreeMap<IndicatorKind, Vec<f64>>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn events(&self) -> &[CrossoverEvent] {
        &self.crossover.events
    }

    pub fn indicator(&self, kind: IndicatorKind) -> Option<&[f64]> {
        self.indicators.get(&kind).map(Vec::as_slice)
    }

    /// Latest non-NaN value of each selected indicator.
    pub fn latest_indicator_values(&self) -> Vec<(IndicatorKind, Option<f64>)> {
        self.indicators
            .iter()
            .map(|(&kind, values)| (kind, values.iter().rev().copied().find(|v| !v.is_nan())))
            .collect()
    }
}

/// Compute every derived column for one series.
pub fn derive(series: &PriceSeries, request: &AnalysisRequest) -> DerivedSeries {
    let bars = series.bars();
    let crossover = CrossoverDetector::new(request.short_window, request.long_window)
        .with_policy(request.warmup)
        .detect(bars);

    DerivedSeries {
        symbol: series.symbol().to_string(),
        bars: bars.to_vec(),
        short_window: request.short_window,
        long_window: request.long_window,
        crossover,
        indicators: compute_selected(bars, &request.indicators),
    }
}
