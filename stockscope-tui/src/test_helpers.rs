//! Test helpers: a deterministic in-memory provider.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate, Weekday};

use stockscope_core::data::{DataError, DataProvider, DataSource, FetchResult};
use stockscope_core::domain::Bar;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

/// Weekday bars from 2024-01-02 with a slow sine wave on top of a drift.
pub fn wave_bars(start_price: f64, days: usize) -> Vec<Bar> {
    let mut date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(days);
    let mut prev = start_price;
    while bars.len() < days {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            let i = bars.len() as f64;
            let close = start_price + i * 0.1 + 8.0 * (i / 9.0).sin();
            bars.push(Bar::new(date, prev, prev.max(close) + 1.0, prev.min(close) - 1.0, close, 1_000 + bars.len() as u64));
            prev = close;
        }
        date = date.succ_opt().unwrap();
    }
    bars
}

/// Serves canned bars per symbol and counts fetches.
pub struct FakeProvider {
    series: Vec<(String, Vec<Bar>)>,
    calls: Rc<Cell<usize>>,
}

impl FakeProvider {
    /// Shared handle to the fetch counter; stays readable after the provider
    /// is moved into an `AppState`.
    pub fn calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl DataProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        self.calls.set(self.calls.get() + 1);
        let bars = self
            .series
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, bars)| bars)
            .ok_or_else(|| DataError::SymbolNotFound { symbol: symbol.to_string() })?;
        let bars: Vec<Bar> = bars
            .iter()
            .filter(|b| b.date >= start && b.date < end)
            .cloned()
            .collect();
        if bars.is_empty() {
            return Err(DataError::NoData { symbol: symbol.to_string(), start, end });
        }
        Ok(FetchResult { symbol: symbol.to_string(), bars, source: DataSource::CsvImport })
    }
}

pub fn fake_provider() -> FakeProvider {
    FakeProvider {
        series: vec![
            ("AAPL".to_string(), wave_bars(180.0, 125)),
            ("MSFT".to_string(), wave_bars(370.0, 125)),
        ],
        calls: Rc::new(Cell::new(0)),
    }
}

/// Draw the whole UI into a test terminal and return it as text, one line per row.
pub fn render_app(app: &crate::app::AppState, width: u16, height: u16) -> String {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| crate::ui::draw(f, app)).unwrap();
    buffer_text(terminal.backend().buffer())
}

pub fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    let mut out = String::new();
    for row in buffer.content.chunks(width) {
        for cell in row {
            out.push_str(cell.symbol());
        }
        out.push('\n');
    }
    out
}
