//! PriceSeries: one ticker's date-ordered bars.

use chrono::NaiveDate;

use super::Bar;

/// Date-ordered daily bars for a single symbol.
///
/// Construction sorts by date and drops repeated dates (the first bar for a
/// date wins), so `dates()` is always strictly ascending. The series is
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close on a given date, if the series has a bar for it.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| self.bars[i].close)
    }
}
