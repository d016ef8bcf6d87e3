//! Top-level UI layout: tab header, active tab body, status bar.

pub mod candles;
pub mod downloads;
pub mod overview;
pub mod status_bar;
pub mod trend;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Tab};
use crate::theme::Theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let theme = app.theme();
    f.render_widget(Block::default().style(theme.base()), f.area());

    // Split: 1-line tab header + main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_tabs(f, chunks[0], app, &theme);
    draw_tab(f, chunks[1], app, &theme);
    status_bar::render(f, chunks[2], app, &theme);
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let titles = Tab::ALL
        .iter()
        .map(|t| Line::from(format!("{} {}", t.index() + 1, t.label())));
    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(theme.muted())
        .highlight_style(theme.header())
        .divider(Span::styled("|", theme.muted()));
    f.render_widget(tabs, area);
}

/// Draw the active tab inside a bordered block.
fn draw_tab(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let tab = app.active_tab;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(true))
        .title(format!(" {} [{}] ", tab.label(), tab.index() + 1))
        .title_style(theme.title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match tab {
        Tab::Overview => overview::render(f, inner, app, theme),
        Tab::Trend => trend::render(f, inner, app, theme),
        Tab::Candles => candles::render(f, inner, app, theme),
        Tab::Downloads => downloads::render(f, inner, app, theme),
    }
}

/// Message shown in place of a view that has nothing to draw. A rejected
/// run shows its error here; otherwise `hint` is shown.
pub(crate) fn render_placeholder(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme, hint: &str) {
    let line = match &app.run_error {
        Some(err) => Line::from(Span::styled(err.as_str(), Style::default().fg(theme.negative))),
        None => Line::from(Span::styled(hint.to_string(), theme.muted())),
    };
    let para = Paragraph::new(vec![Line::from(""), line]).wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

pub(crate) fn fmt_price(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.2}")
    }
}
