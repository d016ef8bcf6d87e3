//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API, together with dividend
//! and split events. Requests are blocking and made once; there is no retry.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV provider is the fallback when Yahoo is unavailable.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::config::YahooSettings;
use crate::domain::Bar;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    events: Option<Events>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct Events {
    #[serde(default)]
    dividends: HashMap<String, DividendEvent>,
    #[serde(default)]
    splits: HashMap<String, SplitEvent>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    auto_adjust: bool,
}

impl YahooProvider {
    pub fn new(settings: &YahooSettings) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout_secs.map(Duration::from_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            auto_adjust: settings.auto_adjust,
        })
    }

    /// Build the chart API URL for a symbol and the half-open range `[start, end)`.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = midnight_utc(start);
        let end_ts = midnight_utc(end);
        format!(
            "{}/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &events=div%2Csplits&includeAdjustedClose=true",
            self.base_url
        )
    }

    /// Parse the chart API response into bars inside `[start, end)`.
    fn parse_response(
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        auto_adjust: bool,
        resp: ChartResponse,
    ) -> Result<Vec<Bar>, DataError> {
        let no_data = || DataError::NoData {
            symbol: symbol.to_string(),
            start,
            end,
        };

        let result = match resp.chart.result {
            Some(result) => result,
            None => {
                return Err(match resp.chart.error {
                    Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    },
                    Some(err) => DataError::ResponseFormatChanged(format!(
                        "{}: {}",
                        err.code, err.description
                    )),
                    None => DataError::ResponseFormatChanged("empty result with no error".into()),
                })
            }
        };

        let data = result.into_iter().next().ok_or_else(no_data)?;
        let gmtoffset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        // A valid symbol with nothing in range comes back without timestamps.
        let timestamps = data.timestamp.ok_or_else(no_data)?;

        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let events = data.events.unwrap_or_default();
        let mut dividends: HashMap<NaiveDate, f64> = HashMap::new();
        for ev in events.dividends.values() {
            if let Some(date) = local_date(ev.date, gmtoffset) {
                *dividends.entry(date).or_default() += ev.amount;
            }
        }
        let mut splits: HashMap<NaiveDate, f64> = HashMap::new();
        for ev in events.splits.values() {
            if ev.denominator != 0.0 {
                if let Some(date) = local_date(ev.date, gmtoffset) {
                    splits.insert(date, ev.numerator / ev.denominator);
                }
            }
        }

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = local_date(ts, gmtoffset).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;
            if date < start || date >= end {
                continue;
            }

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Skip rows where all OHLCV are None (holidays/non-trading days)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            let mut bar = Bar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
                dividends: dividends.get(&date).copied().unwrap_or(0.0),
                stock_splits: splits.get(&date).copied().unwrap_or(0.0),
            };

            if auto_adjust {
                let adj_close = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());
                if let Some(adj) = adj_close {
                    apply_adjustment(&mut bar, adj);
                }
            }

            bars.push(bar);
        }

        if bars.is_empty() {
            return Err(no_data());
        }

        Ok(bars)
    }

    fn request(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let url = self.chart_url(symbol, start, end);
        debug!(%url, "requesting chart");

        let resp = self.client.get(&url).send().map_err(|e| {
            DataError::NetworkUnreachable(format!("request for {symbol} failed: {e}"))
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, start, end, self.auto_adjust, chart)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = self.request(symbol, start, end)?;
        info!(symbol, bars = bars.len(), "fetched from Yahoo Finance");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// Exchange-local calendar date of a Yahoo timestamp.
fn local_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(ts + gmtoffset, 0).map(|dt| dt.naive_utc().date())
}

/// Scale OHLC by `adj_close / close` so the whole bar is dividend/split adjusted.
fn apply_adjustment(bar: &mut Bar, adj_close: f64) {
    if bar.close.is_nan() || bar.close == 0.0 {
        return;
    }
    let ratio = adj_close / bar.close;
    bar.open *= ratio;
    bar.high *= ratio;
    bar.low *= ratio;
    bar.close = adj_close;
}
