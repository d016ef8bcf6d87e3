//! Tab 4: CSV export of the derived table.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use stockscope_core::export::derived_header;

use crate::app::{AppState, EditTarget};
use crate::theme::Theme;
use crate::ui::render_placeholder;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let Some(derived) = app.report.as_ref().and_then(|r| r.derived()) else {
        render_placeholder(f, area, app, theme, "Nothing to export yet. Press Enter to run.");
        return;
    };

    let editing = app.editing == Some(EditTarget::ExportPath);
    let path_style = if editing {
        Style::default().fg(theme.warning).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(theme.text_primary)
    };
    let path = if editing {
        format!("{}_", app.export_path)
    } else {
        app.export_path.clone()
    };

    let lines = vec![
        Line::from(Span::styled("Download Data", theme.header())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Ticker   ", theme.muted()),
            Span::raw(derived.symbol.clone()),
        ]),
        Line::from(vec![
            Span::styled("Rows     ", theme.muted()),
            Span::raw(derived.len().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Columns  ", theme.muted()),
            Span::raw(derived_header(derived).join(", ")),
        ]),
        Line::from(vec![
            Span::styled("File     ", theme.muted()),
            Span::styled(path, path_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("s: Download CSV   e: edit file name", theme.muted())),
    ];

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockscope_core::config::StockScopeConfig;

    use crate::app::Tab;
    use crate::test_helpers::{fake_provider, render_app, today};

    #[test]
    fn shows_export_target_and_columns() {
        let mut app = AppState::new(&StockScopeConfig::default(), Box::new(fake_provider()), today());
        app.active_tab = Tab::Downloads;
        app.run_analysis();
        let text = render_app(&app, 200, 30);
        assert!(text.contains("stock_data.csv"));
        assert!(text.contains("Date, Open, High, Low, Close, Volume"));
        assert!(text.contains("Rows     125"));
    }
}
