//! Dashboard state persistence: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use stockscope_core::indicators::IndicatorKind;
use stockscope_core::signals::WarmupPolicy;

use crate::app::{AppState, Tab};

/// Serializable subset of app state that persists across restarts.
///
/// Every field is optional on disk so older files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub tickers: Option<String>,
    pub start: Option<String>,
    pub short_window: Option<usize>,
    pub long_window: Option<usize>,
    pub indicators: Option<Vec<IndicatorKind>>,
    pub warmup: Option<WarmupPolicy>,
    pub export_path: Option<String>,
    pub active_tab: Tab,
    pub dark_mode: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            tickers: None,
            start: None,
            short_window: None,
            long_window: None,
            indicators: None,
            warmup: None,
            export_path: None,
            active_tab: Tab::Overview,
            dark_mode: true,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState. The end date is not kept: it
/// defaults to today on every launch.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        tickers: Some(app.form.tickers.clone()),
        start: Some(app.form.start.clone()),
        short_window: Some(app.form.short_window),
        long_window: Some(app.form.long_window),
        indicators: Some(app.indicators.selection()),
        warmup: Some(app.warmup),
        export_path: Some(app.export_path.clone()),
        active_tab: app.active_tab,
        dark_mode: app.dark_mode,
    }
}

/// Apply persisted state to AppState. Window sizes are clamped back into
/// their slider ranges.
pub fn apply(app: &mut AppState, state: PersistedState) {
    if let Some(tickers) = state.tickers {
        app.form.tickers = tickers;
    }
    if let Some(start) = state.start {
        app.form.start = start;
    }
    if let Some(short) = state.short_window {
        app.form.short_window = short;
        app.form.adjust(crate::app::FormField::ShortWindow, 0);
    }
    if let Some(long) = state.long_window {
        app.form.long_window = long;
        app.form.adjust(crate::app::FormField::LongWindow, 0);
    }
    if let Some(indicators) = state.indicators {
        app.indicators = crate::app::IndicatorPicker::new(indicators);
    }
    if let Some(warmup) = state.warmup {
        app.warmup = warmup;
    }
    if let Some(path) = state.export_path {
        app.export_path = path;
    }
    app.active_tab = state.active_tab;
    app.dark_mode = state.dark_mode;
}
