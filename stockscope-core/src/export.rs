//! CSV export of the derived table and of raw price bars.
//!
//! Absent values (warm-up NaN) are written as empty cells.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::analysis::DerivedSeries;
use crate::domain::Bar;

pub const DERIVED_BASE_COLUMNS: [&str; 12] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
    "Short_MA",
    "Long_MA",
    "Signal",
    "Position",
];

pub const PRICE_COLUMNS: [&str; 8] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Header row of the derived table: base columns then indicators in
/// canonical order.
pub fn derived_header(derived: &DerivedSeries) -> Vec<String> {
    DERIVED_BASE_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(derived.indicators.keys().map(|k| k.label().to_string()))
        .collect()
}

pub fn write_derived_csv<W: Write>(writer: W, derived: &DerivedSeries) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(derived_header(derived))?;

    let cx = &derived.crossover;
    for (i, bar) in derived.bars.iter().enumerate() {
        let mut record = price_record(bar);
        record.push(cell(cx.short_ma[i]));
        record.push(cell(cx.long_ma[i]));
        record.push(cell(cx.signal[i]));
        record.push(cell(cx.position[i]));
        for values in derived.indicators.values() {
            record.push(cell(values[i]));
        }
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(|e| ExportError::Csv(e.into()))?;
    Ok(())
}

/// The derived table as UTF-8 CSV bytes.
pub fn derived_csv_bytes(derived: &DerivedSeries) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_derived_csv(&mut buf, derived)?;
    Ok(buf)
}

pub fn save_derived_csv(path: &Path, derived: &DerivedSeries) -> Result<(), ExportError> {
    let bytes = derived_csv_bytes(derived)?;
    write_file(path, &bytes)
}

/// Raw bars in the layout the CSV provider reads back.
pub fn write_price_csv<W: Write>(writer: W, bars: &[Bar]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PRICE_COLUMNS)?;
    for bar in bars {
        wtr.write_record(price_record(bar))?;
    }
    wtr.flush().map_err(|e| ExportError::Csv(e.into()))?;
    Ok(())
}

pub fn save_price_csv(path: &Path, bars: &[Bar]) -> Result<(), ExportError> {
    let mut buf = Vec::new();
    write_price_csv(&mut buf, bars)?;
    write_file(path, &buf)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, bytes).map_err(io_err)
}

fn price_record(bar: &Bar) -> Vec<String> {
    vec![
        bar.date.format("%Y-%m-%d").to_string(),
        cell(bar.open),
        cell(bar.high),
        cell(bar.low),
        cell(bar.close),
        bar.volume.to_string(),
        cell(bar.dividends),
        cell(bar.stock_splits),
    ]
}

fn cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{derive, AnalysisRequest};
    use crate::config::DefaultsConfig;
    use crate::domain::PriceSeries;
    use crate::indicators::{make_bars, IndicatorKind};
    use chrono::NaiveDate;

    fn derived(indicators: Vec<IndicatorKind>) -> DerivedSeries {
        let closes: Vec<f64> = (0..6).map(|i| 10.0 + i as f64).collect();
        let series = PriceSeries::new("AAPL", make_bars(&closes));
        let mut request = AnalysisRequest::from_defaults(
            &DefaultsConfig::default(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        request.short_window = 2;
        request.long_window = 3;
        request.indicators = indicators;
        derive(&series, &request)
    }

    #[test]
    fn header_orders_indicators_canonically() {
        let d = derived(vec![IndicatorKind::Ema20, IndicatorKind::Rsi]);
        let header = derived_header(&d);
        assert_eq!(header.len(), 14);
        assert_eq!(header[8], "Short_MA");
        assert_eq!(header[12], "RSI");
        assert_eq!(header[13], "EMA (20)");
    }

    #[test]
    fn warmup_cells_are_empty() {
        let bytes = derived_csv_bytes(&derived(vec![])).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(
            lines[0],
            "Date,Open,High,Low,Close,Volume,Dividends,Stock Splits,Short_MA,Long_MA,Signal,Position"
        );
        // Row 0: no MAs, no signal (strict warm-up), no position.
        assert_eq!(lines[1], "2024-01-02,10,11,9,10,1000,0,0,,,,");
        // Row 5: SMA2 = 14.5, SMA3 = 14, Long, no event.
        assert!(lines[6].ends_with(",14.5,14,1,0"), "{}", lines[6]);
    }

    #[test]
    fn price_csv_round_trips_through_csv_provider() {
        use crate::data::{CsvProvider, DataProvider};

        let dir = tempfile::tempdir().unwrap();
        let bars = make_bars(&[10.0, 11.5, 12.25]);
        save_price_csv(&dir.path().join("AAPL.csv"), &bars).unwrap();

        let provider = CsvProvider::new(dir.path());
        let fetched = provider
            .fetch(
                "AAPL",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            )
            .unwrap();
        assert_eq!(fetched.bars, bars);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stock_data.csv");
        save_derived_csv(&path, &derived(vec![IndicatorKind::Macd])).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Date,"));
        assert!(text.lines().next().unwrap().ends_with(",Position,MACD"));
    }
}
