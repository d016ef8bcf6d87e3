//! CSV directory provider.
//!
//! Layout: `{data_dir}/{SYMBOL}.csv` with a header row of
//! `Date,Open,High,Low,Close,Volume` and optional `Dividends` and
//! `Stock Splits` columns. Extra columns (for example a previously exported
//! derived table) are ignored, so exported files can be read back.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
    #[serde(rename = "Dividends", default)]
    dividends: Option<f64>,
    #[serde(rename = "Stock Splits", default)]
    stock_splits: Option<f64>,
}

/// Reads one CSV file per symbol from a directory.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    data_dir: PathBuf,
}

impl CsvProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the CSV file for a symbol: `{data_dir}/{SYMBOL}.csv`
    pub fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{symbol}.csv"))
    }

    /// Read every bar in a symbol's file, unfiltered.
    pub fn read_all(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.symbol_path(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let display = path.display().to_string();

        let mut reader = csv::Reader::from_path(&path).map_err(|e| DataError::Io {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| DataError::MalformedCsv {
                path: display.clone(),
                reason: e.to_string(),
            })?;
            let date = parse_date(&row.date).ok_or_else(|| DataError::MalformedCsv {
                path: display.clone(),
                reason: format!("row {}: invalid date '{}'", line + 1, row.date),
            })?;
            bars.push(Bar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume.max(0.0).round() as u64,
                dividends: row.dividends.unwrap_or(0.0),
                stock_splits: row.stock_splits.unwrap_or(0.0),
            });
        }
        Ok(bars)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars: Vec<Bar> = self
            .read_all(symbol)?
            .into_iter()
            .filter(|b| b.date >= start && b.date < end)
            .collect();

        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        info!(symbol, bars = bars.len(), dir = %self.data_dir.display(), "loaded from CSV");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}

/// Accepts `YYYY-MM-DD` optionally followed by a time and offset
/// (`2024-01-02 00:00:00-05:00`).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
