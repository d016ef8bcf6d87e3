//! Application state: single-owner, main-thread only.
//!
//! Every action that needs data re-runs the analysis pipeline synchronously.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockscope_core::analysis::{self, parse_tickers, AnalysisReport, AnalysisRequest};
use stockscope_core::config::{StockScopeConfig, LONG_WINDOW_RANGE, SHORT_WINDOW_RANGE};
use stockscope_core::data::DataProvider;
use stockscope_core::export;
use stockscope_core::indicators::{compute_selected, IndicatorKind};
use stockscope_core::signals::WarmupPolicy;

use crate::theme::Theme;

/// Which tab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    Overview,
    Trend,
    Candles,
    Downloads,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Trend, Tab::Candles, Tab::Downloads];

    pub fn index(self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Trend => 1,
            Tab::Candles => 2,
            Tab::Downloads => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Tab::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Trend => "Trend & Indicators",
            Tab::Candles => "Candlestick",
            Tab::Downloads => "Downloads",
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Input form fields on the Overview tab, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Tickers,
    Start,
    End,
    ShortWindow,
    LongWindow,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Tickers,
        FormField::Start,
        FormField::End,
        FormField::ShortWindow,
        FormField::LongWindow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Tickers => "Tickers",
            FormField::Start => "Start date",
            FormField::End => "End date",
            FormField::ShortWindow => "Short MA",
            FormField::LongWindow => "Long MA",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, FormField::Tickers | FormField::Start | FormField::End)
    }

    fn position(self) -> usize {
        FormField::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> FormField {
        FormField::ALL[(self.position() + 1) % FormField::ALL.len()]
    }

    pub fn prev(self) -> FormField {
        FormField::ALL[(self.position() + FormField::ALL.len() - 1) % FormField::ALL.len()]
    }
}

/// What keystrokes are typed into, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Field(FormField),
    ExportPath,
}

/// The values of the input form, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub tickers: String,
    pub start: String,
    pub end: String,
    pub short_window: usize,
    pub long_window: usize,
    pub focus: FormField,
}

impl FormState {
    pub fn from_config(config: &StockScopeConfig, today: NaiveDate) -> Self {
        let d = &config.defaults;
        Self {
            tickers: d.tickers.clone(),
            start: d.start.format("%Y-%m-%d").to_string(),
            end: d.end.unwrap_or(today).format("%Y-%m-%d").to_string(),
            short_window: d.short_window,
            long_window: d.long_window,
            focus: FormField::Tickers,
        }
    }

    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Tickers => Some(&mut self.tickers),
            FormField::Start => Some(&mut self.start),
            FormField::End => Some(&mut self.end),
            FormField::ShortWindow | FormField::LongWindow => None,
        }
    }

    /// Move a slider by `delta`, clamped to its range.
    pub fn adjust(&mut self, field: FormField, delta: i64) {
        let (value, range) = match field {
            FormField::ShortWindow => (&mut self.short_window, SHORT_WINDOW_RANGE),
            FormField::LongWindow => (&mut self.long_window, LONG_WINDOW_RANGE),
            _ => return,
        };
        let moved = (*value as i64 + delta).clamp(*range.start() as i64, *range.end() as i64);
        *value = moved as usize;
    }
}

/// Indicator multi-select on the Trend tab.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPicker {
    pub selected: BTreeSet<IndicatorKind>,
    pub cursor: usize,
}

impl IndicatorPicker {
    pub fn new(selected: impl IntoIterator<Item = IndicatorKind>) -> Self {
        Self {
            selected: selected.into_iter().collect(),
            cursor: 0,
        }
    }

    pub fn cursor_kind(&self) -> IndicatorKind {
        IndicatorKind::ALL[self.cursor.min(IndicatorKind::ALL.len() - 1)]
    }

    pub fn toggle_cursor(&mut self) {
        let kind = self.cursor_kind();
        if !self.selected.remove(&kind) {
            self.selected.insert(kind);
        }
    }

    pub fn selection(&self) -> Vec<IndicatorKind> {
        self.selected.iter().copied().collect()
    }
}

pub struct AppState {
    pub running: bool,
    pub active_tab: Tab,
    pub dark_mode: bool,
    pub form: FormState,
    pub indicators: IndicatorPicker,
    pub warmup: WarmupPolicy,
    pub editing: Option<EditTarget>,
    pub export_path: String,
    pub report: Option<AnalysisReport>,
    /// Set when the last run was rejected before fetching (e.g. bad dates).
    pub run_error: Option<String>,
    pub status_message: Option<(String, StatusLevel)>,
    provider: Box<dyn DataProvider>,
}

impl AppState {
    pub fn new(config: &StockScopeConfig, provider: Box<dyn DataProvider>, today: NaiveDate) -> Self {
        Self {
            running: true,
            active_tab: Tab::Overview,
            dark_mode: true,
            form: FormState::from_config(config, today),
            indicators: IndicatorPicker::new(config.defaults.indicators.iter().copied()),
            warmup: config.defaults.warmup,
            editing: None,
            export_path: config.export.file_name.clone(),
            report: None,
            run_error: None,
            status_message: None,
            provider,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.dark_mode)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn toggle_warmup(&mut self) {
        self.warmup = match self.warmup {
            WarmupPolicy::Strict => WarmupPolicy::Legacy,
            WarmupPolicy::Legacy => WarmupPolicy::Strict,
        };
    }

    /// Turn the form into a request. Date text that does not parse is reported
    /// here; ordering is checked by the pipeline.
    pub fn build_request(&self) -> Result<AnalysisRequest, String> {
        let parse = |label: &str, s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| format!("{label} '{s}' is not a YYYY-MM-DD date"))
        };
        Ok(AnalysisRequest {
            tickers: parse_tickers(&self.form.tickers),
            start: parse("Start date", &self.form.start)?,
            end: parse("End date", &self.form.end)?,
            short_window: self.form.short_window,
            long_window: self.form.long_window,
            indicators: self.indicators.selection(),
            warmup: self.warmup,
        })
    }

    /// Re-run the whole pipeline from the form.
    pub fn run_analysis(&mut self) {
        let request = match self.build_request() {
            Ok(r) => r,
            Err(msg) => {
                self.report = None;
                self.run_error = Some(msg.clone());
                self.set_error(msg);
                return;
            }
        };

        match analysis::run(self.provider.as_ref(), &request) {
            Ok(report) => {
                self.run_error = None;
                let fetched = report.snapshot.series.len();
                let skipped = report.warnings().len();
                if skipped > 0 {
                    self.set_warning(format!("Loaded {fetched} ticker(s), skipped {skipped}"));
                } else {
                    self.set_status(format!("Loaded {fetched} ticker(s)"));
                }
                self.report = Some(report);
            }
            Err(e) => {
                warn!(error = %e, "analysis rejected");
                self.report = None;
                self.run_error = Some(e.to_string());
                self.set_error(e.to_string());
            }
        }
    }

    /// Recompute indicator columns for the current report after the
    /// selection changed. Prices are not fetched again.
    pub fn refresh_indicators(&mut self) {
        let selection = self.indicators.selection();
        if let Some(report) = self.report.as_mut() {
            report.request.indicators = selection.clone();
            if let Some(primary) = report.primary.as_mut() {
                primary.derived.indicators = compute_selected(&primary.derived.bars, &selection);
            }
        }
    }

    /// Write the derived table of the first ticker to `export_path`.
    pub fn save_csv(&mut self) {
        let Some(derived) = self.report.as_ref().and_then(|r| r.derived()) else {
            self.set_warning("Nothing to export yet: press Enter to load data");
            return;
        };
        let path = PathBuf::from(self.export_path.trim());
        match export::save_derived_csv(&path, derived) {
            Ok(()) => {
                info!(path = %path.display(), rows = derived.len(), "exported CSV");
                let msg = format!("Saved {} rows to {}", derived.len(), path.display());
                self.set_status(msg);
            }
            Err(e) => self.set_error(format!("Export failed: {e}")),
        }
    }
}
