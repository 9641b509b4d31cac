//! Keyboard input dispatch: text editing, help overlay, global keys,
//! then panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Panel, SettingsField};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. The ticker text box swallows everything while editing.
    if app.settings.editing {
        handle_ticker_edit(app, key);
        return;
    }

    // 2. Help overlay: any key closes it.
    if app.show_help {
        app.show_help = false;
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Char('r') => {
            app.request_refresh();
            return;
        }
        KeyCode::Char('n') => {
            app.request_notify();
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Settings; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Leaderboard; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Chart; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        _ => {}
    }

    // 4. Panel-specific keys.
    match app.active_panel {
        Panel::Settings => handle_settings_key(app, key),
        Panel::Leaderboard => handle_leaderboard_key(app, key),
        Panel::Chart => handle_chart_key(app, key),
    }
}

fn handle_ticker_edit(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.settings.editing = false;
            app.request_refresh();
        }
        KeyCode::Esc => {
            app.settings.editing = false;
        }
        KeyCode::Backspace => {
            app.settings.ticker_text.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.settings.ticker_text.push(c);
        }
        _ => {}
    }
}

fn handle_settings_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.settings.field = app.settings.field.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.settings.field = app.settings.field.prev();
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => app.settings.adjust(-1),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
            app.settings.adjust(1)
        }
        KeyCode::Char('H') | KeyCode::PageDown => app.settings.adjust(-5),
        KeyCode::Char('L') | KeyCode::PageUp => app.settings.adjust(5),
        KeyCode::Enter | KeyCode::Char('e') if app.settings.field == SettingsField::Tickers => {
            app.settings.editing = true;
        }
        KeyCode::Enter => app.request_refresh(),
        _ => {}
    }
}

fn handle_leaderboard_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char('g') | KeyCode::Home => app.board.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.board.cursor = app.board.entries().len().saturating_sub(1);
        }
        KeyCode::Enter => {
            app.select_cursor();
            app.active_panel = Panel::Chart;
        }
        _ => {}
    }
}

/// j/k step the charted ticker through the leaderboard.
fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.cursor_down();
            app.select_cursor();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor_up();
            app.select_cursor();
        }
        _ => {}
    }
}
