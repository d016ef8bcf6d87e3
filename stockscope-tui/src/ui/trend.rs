//! Tab 2: moving average crossover chart, indicator picker and indicator chart.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap};
use ratatui::Frame;

use stockscope_core::analysis::DerivedSeries;
use stockscope_core::indicators::IndicatorKind;
use stockscope_core::signals::CrossoverKind;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::render_placeholder;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let Some(derived) = app.report.as_ref().and_then(|r| r.derived()) else {
        render_placeholder(f, area, app, theme, "No price data yet. Press Enter to run.");
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(6)])
        .split(area);

    render_crossover(f, rows[0], derived, theme);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(rows[1]);

    render_picker(f, bottom[0], app, theme);
    render_indicators(f, bottom[1], derived, theme);
}

/// `(x, y)` points for a column, skipping missing values.
fn points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// Min/max over every finite value, padded by 5%.
fn y_bounds<'a>(columns: impl IntoIterator<Item = &'a [f64]>) -> [f64; 2] {
    let (lo, hi) = columns
        .into_iter()
        .flat_map(|c| c.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return [0.0, 1.0];
    }
    let padding = ((hi - lo).abs() * 0.05).max(0.5);
    [lo - padding, hi + padding]
}

fn x_axis<'a>(derived: &DerivedSeries, theme: &Theme) -> Axis<'a> {
    let first = derived.bars.first().map(|b| b.date.to_string()).unwrap_or_default();
    let last = derived.bars.last().map(|b| b.date.to_string()).unwrap_or_default();
    Axis::default()
        .style(theme.muted())
        .bounds([0.0, (derived.len().saturating_sub(1) as f64).max(1.0)])
        .labels(vec![Span::styled(first, theme.muted()), Span::styled(last, theme.muted())])
}

fn y_axis<'a>(bounds: [f64; 2], theme: &Theme) -> Axis<'a> {
    Axis::default()
        .style(theme.muted())
        .bounds(bounds)
        .labels(vec![
            Span::styled(format!("{:.1}", bounds[0]), theme.muted()),
            Span::styled(format!("{:.1}", bounds[1]), theme.muted()),
        ])
}

fn render_crossover(f: &mut Frame, area: Rect, derived: &DerivedSeries, theme: &Theme) {
    let closes = derived.closes();
    let cx = &derived.crossover;

    let close_pts = points(&closes);
    let short_pts = points(&cx.short_ma);
    let long_pts = points(&cx.long_ma);
    let marker_pts = |kind: CrossoverKind| -> Vec<(f64, f64)> {
        derived
            .events()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.index as f64, e.price))
            .collect()
    };
    let buy_pts = marker_pts(CrossoverKind::Buy);
    let sell_pts = marker_pts(CrossoverKind::Sell);

    let short_label = format!("Short MA ({})", derived.short_window);
    let long_label = format!("Long MA ({})", derived.long_window);
    let datasets = vec![
        Dataset::default()
            .name("Close")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.accent))
            .data(&close_pts),
        Dataset::default()
            .name(short_label)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.neutral))
            .data(&short_pts),
        Dataset::default()
            .name(long_label)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.warning))
            .data(&long_pts),
        Dataset::default()
            .name("▲ Buy")
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.crossover_color(CrossoverKind::Buy)))
            .data(&buy_pts),
        Dataset::default()
            .name("▼ Sell")
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.crossover_color(CrossoverKind::Sell)))
            .data(&sell_pts),
    ];

    let bounds = y_bounds([closes.as_slice(), cx.short_ma.as_slice(), cx.long_ma.as_slice()]);
    let block = Block::default()
        .title(format!(
            " {}: Moving Average Crossover ({} signals) ",
            derived.symbol,
            derived.events().len()
        ))
        .borders(Borders::ALL)
        .border_style(theme.border(false));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis(derived, theme))
        .y_axis(y_axis(bounds, theme));
    f.render_widget(chart, area);
}

fn render_picker(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let mut lines: Vec<Line> = IndicatorKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let checked = if app.indicators.selected.contains(kind) { "[x]" } else { "[ ]" };
            let style = if i == app.indicators.cursor {
                theme.title(true).add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(theme.text_primary)
            };
            Line::from(Span::styled(format!("{checked} {}", kind.label()), style))
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("warm-up: {:?}  (w)", app.warmup).to_lowercase(),
        theme.muted(),
    )));
    lines.push(Line::from(Span::styled("j/k move  space toggle", theme.muted())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        app.indicators.cursor_kind().description(),
        theme.muted(),
    )));

    let block = Block::default()
        .title(" Indicators ")
        .borders(Borders::ALL)
        .border_style(theme.border(true));
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn render_indicators(f: &mut Frame, area: Rect, derived: &DerivedSeries, theme: &Theme) {
    let block = Block::default()
        .title(format!(" {}: Technical Indicators ", derived.symbol))
        .borders(Borders::ALL)
        .border_style(theme.border(false));

    if derived.indicators.is_empty() {
        let para = Paragraph::new(Span::styled("No indicators selected.", theme.muted())).block(block);
        f.render_widget(para, area);
        return;
    }

    let series: Vec<(IndicatorKind, Vec<(f64, f64)>)> = derived
        .indicators
        .iter()
        .map(|(&kind, values)| (kind, points(values)))
        .collect();

    let datasets = series
        .iter()
        .enumerate()
        .map(|(i, (kind, pts))| {
            Dataset::default()
                .name(kind.label())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.series_color(i)))
                .data(pts)
        })
        .collect();

    let bounds = y_bounds(derived.indicators.values().map(Vec::as_slice));
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis(derived, theme))
        .y_axis(y_axis(bounds, theme));
    f.render_widget(chart, area);
}
