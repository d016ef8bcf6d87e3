//! User input for one analysis run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AnalysisError;
use crate::config::DefaultsConfig;
use crate::indicators::IndicatorKind;
use crate::signals::WarmupPolicy;

/// Split a comma-separated ticker list.
///
/// Entries are trimmed and uppercased; empty entries and repeats are dropped,
/// keeping the first occurrence.
pub fn parse_tickers(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let ticker = part.trim().to_uppercase();
        if !ticker.is_empty() && !out.contains(&ticker) {
            out.push(ticker);
        }
    }
    out
}

/// `start` must be strictly before `end`.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), AnalysisError> {
    if start < end {
        Ok(())
    } else {
        Err(AnalysisError::InvalidDateRange { start, end })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// The first ticker is the one the crossover and indicators run on.
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    pub indicators: Vec<IndicatorKind>,
    pub warmup: WarmupPolicy,
}

impl AnalysisRequest {
    /// Request pre-filled from config defaults; a missing end date means `today`.
    pub fn from_defaults(defaults: &DefaultsConfig, today: NaiveDate) -> Self {
        Self {
            tickers: parse_tickers(&defaults.tickers),
            start: defaults.start,
            end: defaults.end.unwrap_or(today),
            short_window: defaults.short_window,
            long_window: defaults.long_window,
            indicators: defaults.indicators.clone(),
            warmup: defaults.warmup,
        }
    }

    pub fn primary_ticker(&self) -> Option<&str> {
        self.tickers.first().map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        validate_range(self.start, self.end)?;
        if self.tickers.is_empty() {
            return Err(AnalysisError::NoTickers);
        }
        for (name, value) in [("short", self.short_window), ("long", self.long_window)] {
            if value == 0 {
                return Err(AnalysisError::InvalidWindow { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::from_defaults(&DefaultsConfig::default(), date(2024, 6, 1))
    }

    #[test]
    fn parse_tickers_normalizes() {
        assert_eq!(parse_tickers("aapl, msft"), vec!["AAPL", "MSFT"]);
        assert_eq!(parse_tickers(" spy ,, qqq ,"), vec!["SPY", "QQQ"]);
        assert_eq!(parse_tickers("AAPL, aapl, MSFT"), vec!["AAPL", "MSFT"]);
        assert!(parse_tickers(" , ").is_empty());
    }

    #[test]
    fn range_must_be_strictly_increasing() {
        assert!(validate_range(date(2024, 1, 1), date(2024, 1, 2)).is_ok());
        assert!(matches!(
            validate_range(date(2024, 1, 1), date(2024, 1, 1)),
            Err(AnalysisError::InvalidDateRange { .. })
        ));
        assert!(validate_range(date(2024, 2, 1), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn defaults_fill_end_with_today() {
        let r = request();
        assert_eq!(r.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(r.start, date(2024, 1, 1));
        assert_eq!(r.end, date(2024, 6, 1));
        assert_eq!(r.primary_ticker(), Some("AAPL"));
        assert!(r.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_tickers_and_zero_window() {
        let mut r = request();
        r.tickers.clear();
        assert!(matches!(r.validate(), Err(AnalysisError::NoTickers)));

        let mut r = request();
        r.long_window = 0;
        assert!(matches!(
            r.validate(),
            Err(AnalysisError::InvalidWindow { name: "long", value: 0 })
        ));
    }
}
