//! StockScope CLI: analyze and download commands.
//!
//! Commands:
//! - `analyze`: fetch tickers, print comparison/overview tables, crossover
//!   events, summary statistics and indicators; optionally write the CSV
//! - `download`: fetch from Yahoo Finance and store one CSV per symbol for
//!   offline use with `--source csv`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use stockscope_core::analysis::{self, parse_tickers, validate_range, AnalysisReport, AnalysisRequest};
use stockscope_core::config::{ProviderKind, StockScopeConfig, LONG_WINDOW_RANGE, SHORT_WINDOW_RANGE};
use stockscope_core::data::{CsvProvider, DataProvider, YahooProvider};
use stockscope_core::export;
use stockscope_core::indicators::IndicatorKind;
use stockscope_core::signals::WarmupPolicy;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stockscope",
    about = "StockScope CLI: price history, moving average crossovers and indicators"
)]
struct Cli {
    /// TOML config file with defaults and provider settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    Yahoo,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch tickers and print the dashboard tables.
    Analyze {
        /// Comma-separated tickers; the first one gets crossover and indicators.
        #[arg(long)]
        tickers: Option<String>,

        /// Start date (YYYY-MM-DD). Defaults to 2024-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, exclusive). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Short moving average window (2-50).
        #[arg(long)]
        short: Option<usize>,

        /// Long moving average window (10-200).
        #[arg(long)]
        long: Option<usize>,

        /// Indicators: RSI, MACD, "SMA (50)", "SMA (100)", "EMA (20)", "EMA (50)" or rsi, sma50, ...
        #[arg(long, value_delimiter = ',')]
        indicators: Option<Vec<String>>,

        /// Binary 0/1 crossover state from index `short`, as older dashboards computed it.
        #[arg(long, default_value_t = false)]
        legacy_warmup: bool,

        /// Data source. Defaults to the config value (yahoo).
        #[arg(long, value_enum)]
        source: Option<Source>,

        /// Directory of {SYMBOL}.csv files for `--source csv`.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Write the derived table of the first ticker to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of most recent rows to print per table.
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },
    /// Download daily bars from Yahoo Finance as CSV files.
    Download {
        /// Symbols to download (e.g., AAPL MSFT SPY).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to the configured start.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, exclusive). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Output directory. Defaults to the configured data dir (./data).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => StockScopeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StockScopeConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            tickers,
            start,
            end,
            short,
            long,
            indicators,
            legacy_warmup,
            source,
            data_dir,
            output,
            rows,
        } => {
            let args = AnalyzeArgs {
                tickers,
                start,
                end,
                short,
                long,
                indicators,
                legacy_warmup,
                source,
                data_dir,
                output,
                rows,
            };
            run_analyze(&config, args, today())
        }
        Commands::Download {
            symbols,
            start,
            end,
            data_dir,
        } => run_download(&config, symbols, start, end, data_dir),
    }
}

/// Logs go to stderr so table output on stdout stays clean.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

struct AnalyzeArgs {
    tickers: Option<String>,
    start: Option<String>,
    end: Option<String>,
    short: Option<usize>,
    long: Option<usize>,
    indicators: Option<Vec<String>>,
    legacy_warmup: bool,
    source: Option<Source>,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    rows: usize,
}

/// Config defaults overridden by whatever was passed on the command line.
fn build_request(config: &StockScopeConfig, args: &AnalyzeArgs, today: NaiveDate) -> Result<AnalysisRequest> {
    let mut request = AnalysisRequest::from_defaults(&config.defaults, today);

    if let Some(raw) = &args.tickers {
        request.tickers = parse_tickers(raw);
    }
    if let Some(s) = &args.start {
        request.start = parse_date(s)?;
    }
    if let Some(s) = &args.end {
        request.end = parse_date(s)?;
    }
    if let Some(short) = args.short {
        if !SHORT_WINDOW_RANGE.contains(&short) {
            bail!(
                "--short {short} is outside {}..={}",
                SHORT_WINDOW_RANGE.start(),
                SHORT_WINDOW_RANGE.end()
            );
        }
        request.short_window = short;
    }
    if let Some(long) = args.long {
        if !LONG_WINDOW_RANGE.contains(&long) {
            bail!(
                "--long {long} is outside {}..={}",
                LONG_WINDOW_RANGE.start(),
                LONG_WINDOW_RANGE.end()
            );
        }
        request.long_window = long;
    }
    if let Some(names) = &args.indicators {
        request.indicators = names
            .iter()
            .filter(|n| !n.trim().is_empty())
            .map(|n| n.parse::<IndicatorKind>())
            .collect::<Result<_, _>>()?;
    }
    if args.legacy_warmup {
        request.warmup = WarmupPolicy::Legacy;
    }
    Ok(request)
}

fn build_provider(
    config: &StockScopeConfig,
    source: Option<Source>,
    data_dir: Option<&Path>,
) -> Result<Box<dyn DataProvider>> {
    let kind = match source {
        Some(Source::Yahoo) => ProviderKind::Yahoo,
        Some(Source::Csv) => ProviderKind::Csv,
        None => config.provider.kind,
    };
    Ok(match kind {
        ProviderKind::Yahoo => Box::new(YahooProvider::new(&config.provider.yahoo)?),
        ProviderKind::Csv => {
            let dir = data_dir.unwrap_or(config.provider.data_dir.as_path());
            Box::new(CsvProvider::new(dir))
        }
    })
}

fn run_analyze(config: &StockScopeConfig, args: AnalyzeArgs, today: NaiveDate) -> Result<()> {
    let request = build_request(config, &args, today)?;
    let provider = build_provider(config, args.source, args.data_dir.as_deref())?;

    let report = analysis::run(provider.as_ref(), &request)?;

    for warning in report.warnings() {
        eprintln!("Warning: {}", warning.message);
    }

    print_report(&report, args.rows);

    if let Some(path) = &args.output {
        match report.derived() {
            Some(derived) => {
                export::save_derived_csv(path, derived)?;
                info!(path = %path.display(), rows = derived.len(), "wrote CSV");
                println!("CSV written to: {}", path.display());
            }
            None => warn!("nothing to export; first ticker has no data"),
        }
    }

    Ok(())
}

fn run_download(
    config: &StockScopeConfig,
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let start_date = start
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or(config.defaults.start);
    let end_date = end.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);
    validate_range(start_date, end_date)?;

    let provider = YahooProvider::new(&config.provider.yahoo)?;
    let store = CsvProvider::new(data_dir.unwrap_or_else(|| config.provider.data_dir.clone()));

    let mut errors = Vec::new();
    for symbol in symbols.iter().map(|s| s.trim().to_uppercase()) {
        match provider.fetch(&symbol, start_date, end_date) {
            Ok(result) => {
                let path = store.symbol_path(&symbol);
                export::save_price_csv(&path, &result.bars)?;
                println!("{symbol}: {} bars -> {}", result.bars.len(), path.display());
            }
            Err(e) => errors.push((symbol, e)),
        }
    }

    if !errors.is_empty() {
        for (sym, err) in &errors {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

// ── Printing ─────────────────────────────────────────────────────────

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "-".into()
    } else {
        format!("{v:.2}")
    }
}

fn print_report(report: &AnalysisReport, rows: usize) {
    let request = &report.request;
    println!();
    println!(
        "=== StockScope: {} ({} to {}) ===",
        request.tickers.join(", "),
        request.start,
        request.end
    );

    println!();
    println!("--- Closing Prices ---");
    if report.comparison.is_empty() {
        println!("(no data)");
    } else {
        let mut header = format!("{:<12}", "Date");
        for sym in &report.comparison.symbols {
            header.push_str(&format!(" {sym:>10}"));
        }
        println!("{header}");
        println!("{}", "-".repeat(header.len()));
        for row in report.comparison.tail(rows) {
            let mut line = format!("{:<12}", row.date.to_string());
            for close in &row.closes {
                line.push_str(&format!(" {:>10}", close.map(fmt_value).unwrap_or_else(|| "-".into())));
            }
            println!("{line}");
        }
    }

    let Some(primary) = &report.primary else {
        println!();
        println!(
            "No data for {}; crossover, statistics and indicators skipped.",
            request.primary_ticker().unwrap_or("-")
        );
        return;
    };
    let derived = &primary.derived;
    let cx = &derived.crossover;

    println!();
    println!("--- {} Overview ---", derived.symbol);
    println!(
        "{:<12} {:>9} {:>9} {:>9} {:>9} {:>12} {:>9} {:>9} {:>6} {:>8}",
        "Date", "Open", "High", "Low", "Close", "Volume", "Short_MA", "Long_MA", "Signal", "Position"
    );
    println!("{}", "-".repeat(102));
    let first = derived.len().saturating_sub(rows);
    for (i, bar) in derived.bars.iter().enumerate().skip(first) {
        println!(
            "{:<12} {:>9} {:>9} {:>9} {:>9} {:>12} {:>9} {:>9} {:>6} {:>8}",
            bar.date.to_string(),
            fmt_value(bar.open),
            fmt_value(bar.high),
            fmt_value(bar.low),
            fmt_value(bar.close),
            bar.volume,
            fmt_value(cx.short_ma[i]),
            fmt_value(cx.long_ma[i]),
            fmt_value(cx.signal[i]),
            fmt_value(cx.position[i]),
        );
    }

    println!();
    println!(
        "--- Crossovers (SMA {} / SMA {}) ---",
        derived.short_window, derived.long_window
    );
    if cx.events.is_empty() {
        println!("(none)");
    }
    for event in &cx.events {
        println!(
            "{:<12} {:<4} at {}",
            event.date.to_string(),
            event.kind.label(),
            fmt_value(event.price)
        );
    }

    println!();
    println!("--- Summary Statistics ---");
    match &primary.stats {
        Ok(stats) => {
            println!("Highest Price:  {:.2}", stats.highest_price);
            println!("Lowest Price:   {:.2}", stats.lowest_price);
            println!("Change:         {:.2}%", stats.pct_change);
            println!(
                "Period:         {} to {} ({} bars)",
                stats.first_date, stats.last_date, stats.bar_count
            );
        }
        Err(e) => println!("Error: {e}"),
    }

    if !derived.indicators.is_empty() {
        println!();
        println!("--- Indicators (latest) ---");
        for (kind, value) in derived.latest_indicator_values() {
            println!(
                "{:<10} {:>10}   {}",
                kind.label(),
                value.map(fmt_value).unwrap_or_else(|| "-".into()),
                kind.description()
            );
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_args(cli: Cli) -> AnalyzeArgs {
        match cli.command {
            Commands::Analyze {
                tickers,
                start,
                end,
                short,
                long,
                indicators,
                legacy_warmup,
                source,
                data_dir,
                output,
                rows,
            } => AnalyzeArgs {
                tickers,
                start,
                end,
                short,
                long,
                indicators,
                legacy_warmup,
                source,
                data_dir,
                output,
                rows,
            },
            Commands::Download { .. } => panic!("expected analyze"),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::try_parse_from([
            "stockscope",
            "analyze",
            "--tickers",
            "spy, qqq",
            "--start",
            "2023-01-03",
            "--short",
            "5",
            "--indicators",
            "sma50,EMA (20)",
            "--legacy-warmup",
        ])
        .unwrap();
        let args = analyze_args(cli);
        let request = build_request(&StockScopeConfig::default(), &args, date(2024, 5, 1)).unwrap();
        assert_eq!(request.tickers, vec!["SPY", "QQQ"]);
        assert_eq!(request.start, date(2023, 1, 3));
        assert_eq!(request.end, date(2024, 5, 1));
        assert_eq!(request.short_window, 5);
        assert_eq!(request.long_window, 30);
        assert_eq!(request.indicators, vec![IndicatorKind::Sma50, IndicatorKind::Ema20]);
        assert_eq!(request.warmup, WarmupPolicy::Legacy);
    }

    #[test]
    fn rejects_out_of_range_window() {
        let cli = Cli::try_parse_from(["stockscope", "analyze", "--long", "5"]).unwrap();
        let args = analyze_args(cli);
        assert!(build_request(&StockScopeConfig::default(), &args, date(2024, 5, 1)).is_err());
    }

    #[test]
    fn rejects_unknown_indicator() {
        let cli = Cli::try_parse_from(["stockscope", "analyze", "--indicators", "vwap"]).unwrap();
        let args = analyze_args(cli);
        assert!(build_request(&StockScopeConfig::default(), &args, date(2024, 5, 1)).is_err());
    }

    #[test]
    fn analyze_from_csv_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let bars: Vec<_> = (0..60)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.2).sin() * 5.0;
                stockscope_core::domain::Bar::new(
                    date(2024, 1, 2) + chrono::Duration::days(i),
                    c,
                    c + 1.0,
                    c - 1.0,
                    c,
                    500,
                )
            })
            .collect();
        export::save_price_csv(&dir.path().join("AAPL.csv"), &bars).unwrap();
        let out = dir.path().join("stock_data.csv");

        let data_dir = dir.path().to_str().unwrap().to_string();
        let out_str = out.to_str().unwrap().to_string();
        let cli = Cli::try_parse_from([
            "stockscope",
            "analyze",
            "--tickers",
            "AAPL, ZZZZ",
            "--end",
            "2024-12-31",
            "--source",
            "csv",
            "--data-dir",
            data_dir.as_str(),
            "--output",
            out_str.as_str(),
        ])
        .unwrap();
        run_analyze(&StockScopeConfig::default(), analyze_args(cli), date(2024, 12, 31)).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 61);
        assert!(text.starts_with("Date,Open,High,Low,Close,Volume,Dividends,Stock Splits,Short_MA,Long_MA,Signal,Position,RSI,MACD"));
    }

    #[test]
    fn analyze_rejects_equal_dates() {
        let cli = Cli::try_parse_from([
            "stockscope",
            "analyze",
            "--start",
            "2024-03-01",
            "--end",
            "2024-03-01",
            "--source",
            "csv",
        ])
        .unwrap();
        let err = run_analyze(&StockScopeConfig::default(), analyze_args(cli), date(2024, 5, 1)).unwrap_err();
        assert!(err.to_string().contains("End date must fall after start date"));
    }
}
