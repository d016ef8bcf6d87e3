//! Keyboard input dispatch: text editing → global keys → tab-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use stockscope_core::indicators::IndicatorKind;

use crate::app::{AppState, EditTarget, FormField, Tab};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. An open text field swallows everything.
    if let Some(target) = app.editing {
        handle_edit(app, target, key);
        return;
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(tab) = Tab::from_index(c as usize - '1' as usize) {
                app.active_tab = tab;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_tab = app.active_tab.prev();
            } else {
                app.active_tab = app.active_tab.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_tab = app.active_tab.prev();
            return;
        }
        KeyCode::Char('d') => {
            app.toggle_dark_mode();
            return;
        }
        KeyCode::Enter | KeyCode::Char('r') => {
            app.run_analysis();
            return;
        }
        _ => {}
    }

    // 3. Tab-specific keys.
    match app.active_tab {
        Tab::Overview => handle_overview_key(app, key),
        Tab::Trend => handle_trend_key(app, key),
        Tab::Candles => {} // display only
        Tab::Downloads => handle_downloads_key(app, key),
    }
}

fn handle_edit(app: &mut AppState, target: EditTarget, key: KeyEvent) {
    let buffer = match target {
        EditTarget::Field(field) => match app.form.text_mut(field) {
            Some(buf) => buf,
            None => {
                app.editing = None;
                return;
            }
        },
        EditTarget::ExportPath => &mut app.export_path,
    };
    match key.code {
        KeyCode::Esc => app.editing = None,
        KeyCode::Enter => {
            app.editing = None;
            if matches!(target, EditTarget::Field(_)) {
                app.run_analysis();
            }
        }
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) => buffer.push(c),
        _ => {}
    }
}

fn handle_overview_key(app: &mut AppState, key: KeyEvent) {
    let focus = app.form.focus;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.form.focus = focus.next(),
        KeyCode::Char('k') | KeyCode::Up => app.form.focus = focus.prev(),
        KeyCode::Char('e') | KeyCode::Char('i') if focus.is_text() => {
            app.editing = Some(EditTarget::Field(focus));
        }
        KeyCode::Char('h') | KeyCode::Left => app.form.adjust(focus, -1),
        KeyCode::Char('l') | KeyCode::Right => app.form.adjust(focus, 1),
        KeyCode::Char('H') => app.form.adjust(focus, -10),
        KeyCode::Char('L') => app.form.adjust(focus, 10),
        _ => {}
    }
    if matches!(focus, FormField::ShortWindow | FormField::LongWindow)
        && matches!(
            key.code,
            KeyCode::Char('h' | 'l' | 'H' | 'L') | KeyCode::Left | KeyCode::Right
        )
        && app.report.is_some()
    {
        app.run_analysis();
    }
}

fn handle_trend_key(app: &mut AppState, key: KeyEvent) {
    let last = IndicatorKind::ALL.len() - 1;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.indicators.cursor = (app.indicators.cursor + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.indicators.cursor = app.indicators.cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') => {
            app.indicators.toggle_cursor();
            app.refresh_indicators();
        }
        KeyCode::Char('w') => {
            app.toggle_warmup();
            if app.report.is_some() {
                app.run_analysis();
            }
        }
        _ => {}
    }
}

fn handle_downloads_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') => app.save_csv(),
        KeyCode::Char('e') | KeyCode::Char('i') => app.editing = Some(EditTarget::ExportPath),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use stockscope_core::config::StockScopeConfig;
    use stockscope_core::signals::WarmupPolicy;

    use crate::test_helpers::{fake_provider, today};

    fn app() -> AppState {
        AppState::new(&StockScopeConfig::default(), Box::new(fake_provider()), today())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn release_events_ignored() {
        let mut app = app();
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.active_tab, Tab::Candles);
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_tab, Tab::Trend);
        handle_key(&mut app, press(KeyCode::Char('9')));
        assert_eq!(app.active_tab, Tab::Trend);
    }

    #[test]
    fn editing_captures_global_keys() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('e')));
        assert_eq!(app.editing, Some(EditTarget::Field(FormField::Tickers)));

        for _ in 0..4 {
            handle_key(&mut app, press(KeyCode::Backspace));
        }
        handle_key(&mut app, press(KeyCode::Char('q')));
        handle_key(&mut app, press(KeyCode::Char('d')));
        assert!(app.running);
        assert!(app.dark_mode);
        assert_eq!(app.form.tickers, "AAPL, qd");

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.editing, None);
        assert!(app.report.is_none());
    }

    #[test]
    fn enter_in_field_runs_pipeline() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('e')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.report.is_some());
    }

    #[test]
    fn sliders_move_with_arrows() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Down));
        handle_key(&mut app, press(KeyCode::Down));
        handle_key(&mut app, press(KeyCode::Down));
        assert_eq!(app.form.focus, FormField::ShortWindow);
        handle_key(&mut app, press(KeyCode::Right));
        assert_eq!(app.form.short_window, 11);
        handle_key(&mut app, press(KeyCode::Char('e')));
        assert_eq!(app.editing, None);
    }

    #[test]
    fn dark_mode_toggles() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('d')));
        assert!(!app.dark_mode);
    }

    #[test]
    fn trend_tab_toggles_indicator_and_warmup() {
        let mut app = app();
        app.active_tab = Tab::Trend;
        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert!(!app.indicators.selected.contains(&IndicatorKind::Rsi));
        handle_key(&mut app, press(KeyCode::Char('w')));
        assert_eq!(app.warmup, WarmupPolicy::Legacy);
    }

    #[test]
    fn downloads_tab_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.active_tab = Tab::Downloads;
        app.export_path = dir.path().join("out.csv").display().to_string();
        handle_key(&mut app, press(KeyCode::Enter));
        handle_key(&mut app, press(KeyCode::Char('s')));
        assert!(dir.path().join("out.csv").exists());
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }
}
