//! End-to-end dashboard flow over a CSV data directory: keys in, frames and
//! files out.

use chrono::{Duration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use stockscope_core::config::StockScopeConfig;
use stockscope_core::data::CsvProvider;
use stockscope_core::domain::Bar;
use stockscope_core::export::save_price_csv;
use stockscope_tui::app::{AppState, Tab};
use stockscope_tui::{input, persistence, ui};

fn press(app: &mut AppState, code: KeyCode) {
    input::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn screen(app: &AppState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Falls for 40 days then rises for 40: one Buy crossover for short windows.
fn v_bars() -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..80)
        .map(|i| {
            let close = if i < 40 { 100.0 - i as f64 } else { 60.0 + (i - 40) as f64 * 1.5 };
            Bar::new(start + Duration::days(i), close, close + 1.0, close - 1.0, close, 500)
        })
        .collect()
}

fn setup() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    save_price_csv(&dir.path().join("VEE.csv"), &v_bars()).unwrap();

    let mut config = StockScopeConfig::default();
    config.defaults.tickers = "VEE".into();
    config.defaults.short_window = 5;
    config.defaults.long_window = 20;
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let app = AppState::new(&config, Box::new(CsvProvider::new(dir.path())), today);
    (dir, app)
}

#[test]
fn run_browse_and_export() {
    let (dir, mut app) = setup();

    press(&mut app, KeyCode::Enter);
    assert!(app.report.is_some());
    assert!(screen(&app).contains("Data Overview: VEE"));

    press(&mut app, KeyCode::Char('2'));
    let trend = screen(&app);
    assert!(trend.contains("VEE: Moving Average Crossover (1 signals)"));

    press(&mut app, KeyCode::Char('3'));
    let candles = screen(&app);
    assert!(candles.contains("80 bars"));
    assert!(candles.contains("▲"));

    press(&mut app, KeyCode::Char('4'));
    press(&mut app, KeyCode::Char('e'));
    for _ in 0.."stock_data.csv".len() {
        press(&mut app, KeyCode::Backspace);
    }
    let out = dir.path().join("exports").join("vee.csv");
    type_text(&mut app, &out.display().to_string());
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('s'));

    let text = std::fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Date,Open,High,Low,Close,Volume,Dividends,Stock Splits,Short_MA,Long_MA,Signal,Position,RSI,MACD"
    );
    assert_eq!(lines.count(), 80);
}

#[test]
fn bad_range_blocks_every_view() {
    let (_dir, mut app) = setup();
    app.form.end = "2023-12-01".into();
    press(&mut app, KeyCode::Enter);
    assert!(app.report.is_none());

    press(&mut app, KeyCode::Char('3'));
    assert!(screen(&app).contains("End date must fall after start date"));
}

#[test]
fn unknown_ticker_is_skipped_not_fatal() {
    let (_dir, mut app) = setup();
    press(&mut app, KeyCode::Char('e'));
    type_text(&mut app, ", NOPE");
    press(&mut app, KeyCode::Enter);

    let report = app.report.as_ref().unwrap();
    assert_eq!(report.snapshot.symbols(), vec!["VEE"]);
    assert!(screen(&app).contains("No data found for NOPE. Skipping."));
}

#[test]
fn state_survives_restart() {
    let (dir, mut app) = setup();
    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('2'));
    let state_path = dir.path().join("state.json");
    persistence::save(&state_path, &persistence::extract(&app)).unwrap();

    let (_dir2, mut fresh) = setup();
    persistence::apply(&mut fresh, persistence::load(&state_path));
    assert!(!fresh.dark_mode);
    assert_eq!(fresh.active_tab, Tab::Trend);
    assert_eq!(fresh.form.short_window, 5);
}
