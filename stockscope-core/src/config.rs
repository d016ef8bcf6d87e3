//! Serializable dashboard configuration.
//!
//! Loaded from TOML. Every section and field is optional; missing values fall
//! back to the dashboard defaults (tickers "AAPL, MSFT", start 2024-01-01,
//! windows 10/30, indicators RSI and MACD).

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::IndicatorKind;
use crate::signals::WarmupPolicy;

/// Allowed short MA window.
pub const SHORT_WINDOW_RANGE: RangeInclusive<usize> = 2..=50;
/// Allowed long MA window.
pub const LONG_WINDOW_RANGE: RangeInclusive<usize> = 10..=200;

pub const DEFAULT_TICKERS: &str = "AAPL, MSFT";
pub const DEFAULT_SHORT_WINDOW: usize = 10;
pub const DEFAULT_LONG_WINDOW: usize = 30;
pub const DEFAULT_EXPORT_FILE: &str = "stock_data.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockScopeConfig {
    pub defaults: DefaultsConfig,
    pub provider: ProviderConfig,
    pub export: ExportConfig,
}

/// Initial values of the input form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Comma-separated, as typed by a user.
    pub tickers: String,
    pub start: NaiveDate,
    /// `None` means today.
    pub end: Option<NaiveDate>,
    pub short_window: usize,
    pub long_window: usize,
    pub indicators: Vec<IndicatorKind>,
    pub warmup: WarmupPolicy,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.to_string(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: None,
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            indicators: IndicatorKind::defaults(),
            warmup: WarmupPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub yahoo: YahooSettings,
    /// Directory read by the CSV provider and written by `download`.
    pub data_dir: PathBuf,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            yahoo: YahooSettings::default(),
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Yahoo Finance chart API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout in seconds; unbounded when absent.
    pub timeout_secs: Option<u64>,
    /// Scale OHLC by adjclose/close.
    pub auto_adjust: bool,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (compatible; stockscope/0.1)".to_string(),
            timeout_secs: None,
            auto_adjust: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}

impl StockScopeConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Window bounds match the dashboard sliders.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("short_window", self.defaults.short_window, &SHORT_WINDOW_RANGE)?;
        check_range("long_window", self.defaults.long_window, &LONG_WINDOW_RANGE)
    }
}

fn check_range(
    field: &'static str,
    value: usize,
    range: &RangeInclusive<usize>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = StockScopeConfig::from_toml("").unwrap();
        assert_eq!(config, StockScopeConfig::default());
        assert_eq!(config.defaults.tickers, "AAPL, MSFT");
        assert_eq!(config.defaults.short_window, 10);
        assert_eq!(config.defaults.long_window, 30);
        assert_eq!(
            config.defaults.indicators,
            vec![IndicatorKind::Rsi, IndicatorKind::Macd]
        );
        assert_eq!(config.export.file_name, "stock_data.csv");
        assert!(config.provider.yahoo.auto_adjust);
        assert_eq!(config.provider.yahoo.timeout_secs, None);
    }

    #[test]
    fn parses_full_file() {
        let text = r#"
            [defaults]
            tickers = "spy, qqq"
            start = "2023-06-01"
            end = "2023-12-31"
            short_window = 5
            long_window = 50
            indicators = ["SMA (50)", "ema20"]
            warmup = "legacy"

            [provider]
            kind = "csv"
            data_dir = "/tmp/prices"

            [provider.yahoo]
            timeout_secs = 30

            [export]
            file_name = "out.csv"
        "#;
        let config = StockScopeConfig::from_toml(text).unwrap();
        assert_eq!(config.defaults.tickers, "spy, qqq");
        assert_eq!(config.defaults.end, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(
            config.defaults.indicators,
            vec![IndicatorKind::Sma50, IndicatorKind::Ema20]
        );
        assert_eq!(config.defaults.warmup, WarmupPolicy::Legacy);
        assert_eq!(config.provider.kind, ProviderKind::Csv);
        assert_eq!(config.provider.data_dir, PathBuf::from("/tmp/prices"));
        assert_eq!(config.provider.yahoo.timeout_secs, Some(30));
        assert!(config.provider.yahoo.auto_adjust);
        assert_eq!(config.export.file_name, "out.csv");
    }

    #[test]
    fn rejects_out_of_range_window() {
        let err = StockScopeConfig::from_toml("[defaults]\nshort_window = 1\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { field: "short_window", value: 1, .. }
        ));
        let err = StockScopeConfig::from_toml("[defaults]\nlong_window = 500\n").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "long_window", .. }));
    }

    #[test]
    fn rejects_unknown_indicator() {
        let err = StockScopeConfig::from_toml("[defaults]\nindicators = [\"vwap\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockscope.toml");
        std::fs::write(&path, "[export]\nfile_name = \"x.csv\"\n").unwrap();
        let config = StockScopeConfig::load(&path).unwrap();
        assert_eq!(config.export.file_name, "x.csv");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = StockScopeConfig::load(Path::new("/nonexistent/stockscope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
