//! Tab 3: candlestick chart.
//!
//! Renders candles using direct buffer writes:
//! - Each candle = 1 terminal column (most recent bars when the series is wider than the plot)
//! - Body: block char, green if close >= open, red otherwise
//! - Wicks: vertical line chars to high/low
//! - Bottom row: ▲/▼ under candles where a Buy/Sell crossover fired

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};
use ratatui::Frame;

use stockscope_core::domain::Bar;
use stockscope_core::signals::{CrossoverEvent, CrossoverKind};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::render_placeholder;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    match app.report.as_ref().and_then(|r| r.derived()) {
        Some(derived) => {
            let chart = CandleChart::new(&derived.bars, derived.events(), &derived.symbol, theme);
            f.render_widget(chart, area);
        }
        None => render_placeholder(f, area, app, theme, "No price data yet. Press Enter to run."),
    }
}

pub struct CandleChart<'a> {
    bars: &'a [Bar],
    events: &'a [CrossoverEvent],
    symbol: &'a str,
    theme: &'a Theme,
}

impl<'a> CandleChart<'a> {
    pub fn new(bars: &'a [Bar], events: &'a [CrossoverEvent], symbol: &'a str, theme: &'a Theme) -> Self {
        Self {
            bars,
            events,
            symbol,
            theme,
        }
    }

    /// Map a price to a Y position in the plot area (0 = top)
    fn price_to_y(price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
        if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
            return 0;
        }
        let frac = (price - y_min) / (y_max - y_min);
        let y = plot_height.saturating_sub(1) as f64 * (1.0 - frac);
        y.round().max(0.0).min(plot_height.saturating_sub(1) as f64) as u16
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let drawable: Vec<&Bar> = self.bars.iter().filter(|b| !b.is_void()).collect();
        if drawable.is_empty() {
            let block = Block::default()
                .title(format!(" {}: Candlestick Chart [No Data] ", self.symbol))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted));
            block.render(area, buf);
            return;
        }

        let up_count = drawable.iter().filter(|b| b.is_up()).count();
        let down_count = drawable.len() - up_count;
        let title = format!(
            " {}: Candlestick Chart | {} bars | {} up {} down ",
            self.symbol,
            drawable.len(),
            up_count,
            down_count,
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent));
        let inner = block.inner(area);
        block.render(area, buf);

        // Left margin: 7-char Y-axis labels plus a gap. Bottom row for markers.
        let label_width: u16 = 8;
        let plot_left = inner.x + label_width;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(label_width);
        let plot_height = inner.height.saturating_sub(1);

        if plot_width == 0 || plot_height == 0 {
            return;
        }

        // Only the bars that fit are scaled.
        let visible = drawable.len().min(plot_width as usize);
        let start = drawable.len() - visible;
        let window = &drawable[start..];

        let y_min = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let y_max = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_positions = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (value, y_pos) in y_labels.iter().zip(y_positions.iter()) {
            buf.set_stringn(
                inner.x,
                plot_top + y_pos,
                format!("{:>7}", axis_label(*value)),
                (label_width - 1) as usize,
                Style::default().fg(self.theme.muted),
            );
        }

        let marker_y = plot_top + plot_height;
        for (i, bar) in window.iter().enumerate() {
            let x = plot_left + i as u16;
            if x >= inner.right() {
                break;
            }

            let is_up = bar.is_up();
            let style = Style::default().fg(if is_up { self.theme.positive } else { self.theme.negative });

            let high_y = Self::price_to_y(bar.high, y_lower, y_upper, plot_height);
            let low_y = Self::price_to_y(bar.low, y_lower, y_upper, plot_height);
            let body_top_y = Self::price_to_y(bar.open.max(bar.close), y_lower, y_upper, plot_height);
            let body_bot_y = Self::price_to_y(bar.open.min(bar.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top_y {
                buf.set_string(x, plot_top + y, "|", style);
            }
            let body_char = if is_up { "\u{2588}" } else { "\u{2593}" };
            for y in body_top_y..=body_bot_y {
                buf.set_string(x, plot_top + y, body_char, style);
            }
            for y in (body_bot_y + 1)..=low_y {
                buf.set_string(x, plot_top + y, "|", style);
            }

            if let Some(event) = self.events.iter().find(|e| e.date == bar.date) {
                let glyph = match event.kind {
                    CrossoverKind::Buy => "▲",
                    CrossoverKind::Sell => "▼",
                };
                let marker_style = Style::default()
                    .fg(self.theme.crossover_color(event.kind))
                    .add_modifier(Modifier::BOLD);
                buf.set_string(x, marker_y, glyph, marker_style);
            }
        }

        if let (Some(first), Some(last)) = (window.first(), window.last()) {
            let range = format!("{} .. {}", first.date, last.date);
            let x = inner.right().saturating_sub(range.len() as u16 + 1).max(plot_left);
            if window.len() + (label_width as usize) + range.len() < inner.width as usize {
                buf.set_string(x, marker_y, range, Style::default().fg(self.theme.muted));
            }
        }
    }
}

/// Y-axis label of at most 7 columns: one decimal below 100k, then
/// whole numbers, then M/B suffixes.
fn axis_label(value: f64) -> String {
    let abs = value.abs();
    if abs < 100_000.0 {
        format!("{value:.1}")
    } else if abs < 1_000_000.0 {
        format!("{value:.0}")
    } else if abs < 1_000_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else {
        format!("{:.1}B", value / 1_000_000_000.0)
    }
}
