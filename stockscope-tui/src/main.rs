//! StockScope TUI: four-tab market dashboard.
//!
//! Tabs:
//! 1. Overview: input form, comparison table, overview table, statistics
//! 2. Trend & Indicators: MA crossover chart, indicator picker and chart
//! 3. Candlestick: OHLC candles with crossover markers
//! 4. Downloads: CSV export of the derived table

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stockscope_core::config::{ProviderKind, StockScopeConfig};
use stockscope_core::data::{CsvProvider, DataProvider, YahooProvider};
use stockscope_tui::app::AppState;
use stockscope_tui::{input, persistence, ui};

fn main() -> Result<()> {
    let app_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockscope");
    let state_path = app_dir.join("state.json");
    let config_path = app_dir.join("config.toml");

    init_logging(&app_dir.join("stockscope.log"))?;

    let config = if config_path.exists() {
        StockScopeConfig::load(&config_path)
            .with_context(|| format!("loading config {}", config_path.display()))?
    } else {
        StockScopeConfig::default()
    };
    let provider = build_provider(&config)?;
    info!(provider = provider.name(), "starting dashboard");

    let mut app = AppState::new(&config, provider, chrono::Local::now().date_naive());
    persistence::apply(&mut app, persistence::load(&state_path));

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        warn!(error = %e, path = %state_path.display(), "could not save dashboard state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Logs go to a file: anything written to the terminal would corrupt the UI.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn build_provider(config: &StockScopeConfig) -> Result<Box<dyn DataProvider>> {
    Ok(match config.provider.kind {
        ProviderKind::Yahoo => Box::new(YahooProvider::new(&config.provider.yahoo)?),
        ProviderKind::Csv => Box::new(CsvProvider::new(config.provider.data_dir.clone())),
    })
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 3. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
