//! Bottom status bar: key hints, last status message.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let mut spans: Vec<Span> = Vec::new();

    if app.editing.is_some() {
        spans.push(Span::styled(" EDIT  Enter:apply Esc:done", Style::default().fg(theme.warning)));
    } else {
        spans.push(Span::styled(
            " Enter:run d:theme 1-4:tabs q:quit",
            theme.muted(),
        ));
    }

    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let color = match level {
            StatusLevel::Info => theme.accent,
            StatusLevel::Warning => theme.warning,
            StatusLevel::Error => theme.negative,
        };
        spans.push(Span::styled(msg.as_str(), Style::default().fg(color)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
