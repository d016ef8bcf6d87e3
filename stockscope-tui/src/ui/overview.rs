//! Tab 1: input form, comparison table, overview table, summary statistics.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use stockscope_core::analysis::{AnalysisReport, ComparisonTable, DerivedSeries};
use stockscope_core::config::{LONG_WINDOW_RANGE, SHORT_WINDOW_RANGE};

use crate::app::{AppState, EditTarget, FormField};
use crate::theme::Theme;
use crate::ui::{fmt_price, render_placeholder};

/// Rows shown from the end of each table.
const TAIL_ROWS: usize = 10;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(20)])
        .split(area);

    render_form(f, cols[0], app, theme);

    match &app.report {
        Some(report) => render_report(f, cols[1], report, theme),
        None => render_placeholder(f, cols[1], app, theme, "Press Enter to load prices for the tickers on the left."),
    }
}

fn render_form(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let form = &app.form;
    let mut lines = Vec::new();

    for field in FormField::ALL {
        let focused = form.focus == field;
        let editing = app.editing == Some(EditTarget::Field(field));
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused { theme.title(true) } else { theme.muted() };

        let value = match field {
            FormField::Tickers => form.tickers.clone(),
            FormField::Start => form.start.clone(),
            FormField::End => form.end.clone(),
            FormField::ShortWindow => slider(form.short_window, *SHORT_WINDOW_RANGE.start(), *SHORT_WINDOW_RANGE.end()),
            FormField::LongWindow => slider(form.long_window, *LONG_WINDOW_RANGE.start(), *LONG_WINDOW_RANGE.end()),
        };
        let value_style = if editing {
            Style::default().fg(theme.warning).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.text_primary)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(format!("{:<11}", field.label()), label_style),
            Span::styled(if editing { format!("{value}_") } else { value }, value_style),
        ]));
    }

    lines.push(Line::from(""));
    let selected: Vec<&str> = app.indicators.selected.iter().map(|k| k.label()).collect();
    lines.push(Line::from(vec![
        Span::styled("  Indicators ", theme.muted()),
        Span::raw(if selected.is_empty() { "none".to_string() } else { selected.join(", ") }),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Warm-up    ", theme.muted()),
        Span::raw(format!("{:?}", app.warmup).to_lowercase()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  j/k move  e edit  h/l adjust", theme.muted())));

    let block = Block::default()
        .title(" Inputs ")
        .borders(Borders::ALL)
        .border_style(theme.border(app.editing.is_some()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Text slider: `[======------] 26`.
fn slider(value: usize, min: usize, max: usize) -> String {
    const WIDTH: usize = 12;
    let span = (max - min).max(1);
    let filled = (value.saturating_sub(min) * WIDTH + span / 2) / span;
    let filled = filled.min(WIDTH);
    format!("[{}{}] {value}", "=".repeat(filled), "-".repeat(WIDTH - filled))
}

fn render_report(f: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TAIL_ROWS as u16 + 3),
            Constraint::Length(TAIL_ROWS as u16 + 3),
            Constraint::Min(4),
        ])
        .split(area);

    render_comparison(f, rows[0], &report.comparison, theme);

    match report.derived() {
        Some(derived) => render_overview(f, rows[1], derived, theme),
        None => {
            let ticker = report.request.primary_ticker().unwrap_or("-");
            let para = Paragraph::new(Span::styled(
                format!("No data for {ticker}: overview, trend and candles are unavailable."),
                Style::default().fg(theme.warning),
            ))
            .block(Block::default().title(" Data Overview ").borders(Borders::ALL).border_style(theme.border(false)));
            f.render_widget(para, rows[1]);
        }
    }

    render_stats(f, rows[2], report, theme);
}

fn render_comparison(f: &mut Frame, area: Rect, table: &ComparisonTable, theme: &Theme) {
    let block = Block::default()
        .title(" Stock Comparison ")
        .borders(Borders::ALL)
        .border_style(theme.border(false));

    if table.is_empty() {
        let para = Paragraph::new(Span::styled("No ticker returned data.", Style::default().fg(theme.warning)));
        f.render_widget(para.block(block), area);
        return;
    }

    let header = Row::new(
        std::iter::once("Date".to_string())
            .chain(table.symbols.iter().cloned())
            .map(|h| Cell::from(h).style(theme.header())),
    );

    let rows = table.tail(TAIL_ROWS).iter().map(|row| {
        let cells = std::iter::once(Cell::from(row.date.to_string())).chain(
            row.closes
                .iter()
                .map(|c| Cell::from(c.map(fmt_price).unwrap_or_else(|| "-".to_string()))),
        );
        Row::new(cells)
    });

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(10))
        .chain(table.symbols.iter().map(|_| Constraint::Length(10)))
        .collect();

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .style(Style::default().fg(theme.text_primary));
    f.render_widget(widget, area);
}

fn render_overview(f: &mut Frame, area: Rect, derived: &DerivedSeries, theme: &Theme) {
    let block = Block::default()
        .title(format!(" Data Overview: {} ", derived.symbol))
        .borders(Borders::ALL)
        .border_style(theme.border(false));

    let short = format!("MA{}", derived.short_window);
    let long = format!("MA{}", derived.long_window);
    let header = Row::new(
        ["Date", "Open", "High", "Low", "Close", "Volume", short.as_str(), long.as_str(), "Pos"]
            .into_iter()
            .map(|h| Cell::from(h.to_string()).style(theme.header())),
    );

    let start = derived.len().saturating_sub(TAIL_ROWS);
    let cx = &derived.crossover;
    let rows = (start..derived.len()).map(|i| {
        let bar = &derived.bars[i];
        let position = match cx.position[i] {
            p if p > 0.0 => Cell::from("Buy").style(Style::default().fg(theme.positive)),
            p if p < 0.0 => Cell::from("Sell").style(Style::default().fg(theme.negative)),
            _ => Cell::from(""),
        };
        Row::new(vec![
            Cell::from(bar.date.to_string()),
            Cell::from(fmt_price(bar.open)),
            Cell::from(fmt_price(bar.high)),
            Cell::from(fmt_price(bar.low)),
            Cell::from(fmt_price(bar.close)),
            Cell::from(bar.volume.to_string()),
            Cell::from(fmt_price(cx.short_ma[i])),
            Cell::from(fmt_price(cx.long_ma[i])),
            position,
        ])
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(4),
    ];

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .style(Style::default().fg(theme.text_primary));
    f.render_widget(widget, area);
}

fn render_stats(f: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let mut lines = Vec::new();

    if let Some(primary) = &report.primary {
        match &primary.stats {
            Ok(stats) => {
                lines.push(Line::from(vec![
                    Span::styled("Highest Price: ", theme.muted()),
                    Span::raw(format!("${:.2}", stats.highest_price)),
                    Span::styled("   Lowest Price: ", theme.muted()),
                    Span::raw(format!("${:.2}", stats.lowest_price)),
                    Span::styled("   Percentage Change: ", theme.muted()),
                    Span::styled(
                        format!("{:.2}%", stats.pct_change),
                        Style::default().fg(theme.change_color(stats.pct_change)),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("{} bars, {} to {}", stats.bar_count, stats.first_date, stats.last_date),
                    theme.muted(),
                )));
            }
            Err(e) => lines.push(Line::from(Span::styled(
                format!("Statistics unavailable: {e}"),
                Style::default().fg(theme.negative),
            ))),
        }
    }

    for warning in report.warnings() {
        lines.push(Line::from(Span::styled(
            warning.message.as_str(),
            Style::default().fg(theme.warning),
        )));
    }

    let title = match report.derived() {
        Some(d) => format!(" Summary Statistics: {} ", d.symbol),
        None => " Summary Statistics ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL).border_style(theme.border(false));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
