//! Event Handling
//!
//! Keyboard and event handling for ttargets.

use crate::app::{App, Mode};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Rows moved by page keys
const PAGE_SIZE: usize = 10;

/// Handle events, returns true if app should quit
pub fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            return handle_key_event(app, key.code, key.modifiers);
        }
    }
    Ok(false)
}

/// Dispatch one key press to the current mode
pub fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers),
        Mode::Command => handle_command_mode(app, code),
        Mode::Help => {
            handle_help_mode(app, code);
            Ok(false)
        },
    }
}

fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Double-g goes to top
    if code == KeyCode::Char('g') && !app.filter_active {
        if let Some((KeyCode::Char('g'), time)) = app.last_key_press {
            if time.elapsed() < Duration::from_millis(1000) {
                app.go_to_top();
                app.last_key_press = None;
                return Ok(false);
            }
        }
        app.last_key_press = Some((code, std::time::Instant::now()));
        return Ok(false);
    }

    app.last_key_press = None;

    if app.filter_active {
        match code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Enter => app.filter_active = false,
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.push_filter_char(c);
            },
            _ => {},
        }
        return Ok(false);
    }

    match code {
        KeyCode::Char('q') => return Ok(true),

        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),
        KeyCode::PageDown => app.page_down(PAGE_SIZE),
        KeyCode::PageUp => app.page_up(PAGE_SIZE),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_down(PAGE_SIZE);
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_up(PAGE_SIZE);
        },

        // Sorting with F1-F6, F12 back to response order
        KeyCode::F(n @ 1..=6) => app.sort_by_column((n - 1) as usize),
        KeyCode::F(12) => app.clear_sort(),

        KeyCode::Char('R') => app.refresh_current(),

        KeyCode::Enter | KeyCode::Char('d') => {
            if app.list_view().is_some() {
                app.open_selected();
            }
        },

        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') => app.navigate_back(),

        KeyCode::Esc => {
            if !app.filter_text().is_empty() {
                app.clear_filter();
            } else {
                app.error_message = None;
            }
        },

        KeyCode::Char('/') => {
            if app.list_view().is_some() {
                app.filter_active = true;
            }
        },

        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('?') => app.enter_help_mode(),

        _ => {},
    }

    Ok(false)
}

fn handle_command_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc => {
            app.command_text.clear();
            app.exit_mode();
        },
        KeyCode::Enter => return app.execute_command(),
        KeyCode::Tab | KeyCode::Right => app.apply_suggestion(),
        KeyCode::Down => app.next_suggestion(),
        KeyCode::Up => app.prev_suggestion(),
        KeyCode::Backspace => {
            app.command_text.pop();
            app.update_command_suggestions();
        },
        KeyCode::Char(c) => {
            app.command_text.push(c);
            app.update_command_suggestions();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_help_mode(app: &mut App, code: KeyCode) {
    if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter) {
        app.exit_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiClient;
    use crate::config::Config;
    use crate::resource::{Target, TargetCollection};
    use crate::router::Router;
    use crate::view::{ActiveView, TargetListView};
    use serde_json::json;

    fn app_with_rows() -> App {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut app = App::new(client, Router::with_default_routes(), Config::default());
        let collection: TargetCollection = ["1", "2", "3"]
            .iter()
            .map(|id| Target::new(json!({"id": id})))
            .collect();
        app.view = Some(ActiveView::List(TargetListView::new(collection)));
        app
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, code, KeyModifiers::NONE).unwrap()
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with_rows();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL).unwrap());
    }

    #[test]
    fn test_double_g_goes_to_top() {
        let mut app = app_with_rows();
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.selected, 2);
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_filter_input_captures_keys() {
        let mut app = app_with_rows();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.filter_active);

        // 'q' is text while filtering, not quit
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.filter_text(), "q");

        press(&mut app, KeyCode::Esc);
        assert!(!app.filter_active);
        assert_eq!(app.filter_text(), "");
    }

    #[test]
    fn test_help_mode_round_trip() {
        let mut app = app_with_rows();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_command_mode_typing() {
        let mut app = app_with_rows();
        press(&mut app, KeyCode::Char(':'));
        assert_eq!(app.mode, Mode::Command);

        for c in "quit".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(press(&mut app, KeyCode::Enter));
    }
}
