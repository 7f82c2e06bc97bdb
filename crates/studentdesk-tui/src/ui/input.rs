//! Keyboard and mouse input handling for the TUI.
//!
//! This module translates terminal events into roster events and app state
//! changes. Nothing here talks to the store directly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use studentdesk_core::roster::{Dialog, FormInput, RosterEvent};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

use super::render::dialog_area;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state = AppState::Quitting;
        return true;
    }

    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // An open dialog takes all input
    match app.roster.dialog {
        Dialog::Form(_) => {
            handle_form_input(app, key);
            return false;
        }
        Dialog::ConfirmDelete(_) => {
            handle_delete_input(app, key);
            return false;
        }
        Dialog::Closed => {}
    }

    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return false;
    }

    handle_table_input(app, key);
    false
}

fn handle_table_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('u') => app.reload_background(),

        KeyCode::Char('a') => app.dispatch(RosterEvent::AddOpened),
        KeyCode::Char('e') | KeyCode::Enter => app.dispatch(RosterEvent::EditOpened),
        KeyCode::Char('d') | KeyCode::Delete => app.dispatch(RosterEvent::DeleteOpened),

        KeyCode::Up | KeyCode::Char('k') => app.dispatch(RosterEvent::CursorMoved(-1)),
        KeyCode::Down | KeyCode::Char('j') => app.dispatch(RosterEvent::CursorMoved(1)),
        KeyCode::PageUp => app.dispatch(RosterEvent::CursorMoved(-PAGE_SCROLL_SIZE)),
        KeyCode::PageDown => app.dispatch(RosterEvent::CursorMoved(PAGE_SCROLL_SIZE)),
        KeyCode::Home => app.dispatch(RosterEvent::CursorMoved(isize::MIN)),
        KeyCode::End => app.dispatch(RosterEvent::CursorMoved(isize::MAX)),

        KeyCode::Esc => {
            if app.roster.notice.is_some() {
                app.dispatch(RosterEvent::NoticeDismissed);
            } else if !app.roster.search_query.is_empty() {
                app.dispatch(RosterEvent::SearchChanged(String::new()));
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.dispatch(RosterEvent::SearchChanged(String::new()));
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            let mut query = app.roster.search_query.clone();
            query.pop();
            app.dispatch(RosterEvent::SearchChanged(query));
        }
        KeyCode::Up => app.dispatch(RosterEvent::CursorMoved(-1)),
        KeyCode::Down => app.dispatch(RosterEvent::CursorMoved(1)),
        KeyCode::Char(c) => {
            let mut query = app.roster.search_query.clone();
            query.push(c);
            app.dispatch(RosterEvent::SearchChanged(query));
        }
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_dialog(),
        KeyCode::Enter => app.submit_dialog(),
        KeyCode::Tab | KeyCode::Down => app.dispatch(RosterEvent::FormEdited(FormInput::NextField)),
        KeyCode::BackTab | KeyCode::Up => {
            app.dispatch(RosterEvent::FormEdited(FormInput::PrevField))
        }
        KeyCode::Backspace => app.dispatch(RosterEvent::FormEdited(FormInput::Backspace)),
        KeyCode::Char(c) => app.dispatch(RosterEvent::FormEdited(FormInput::Char(c))),
        _ => {}
    }
}

fn handle_delete_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.submit_dialog(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_dialog(),
        _ => {}
    }
}

/// Handle mouse input. A left click outside an open dialog cancels it.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, screen: Rect) {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }
    if let Some(area) = dialog_area(&app.roster.dialog, screen) {
        if !area.contains(Position::new(mouse.column, mouse.row)) {
            app.cancel_dialog();
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventKind;
    use studentdesk_core::StudentRecord;

    use super::*;
    use crate::app::test_support::app_with;

    fn loaded_app() -> App {
        app_with(vec![
            StudentRecord::new("Nguyen Van An", None, "Primary").with_id(1),
            StudentRecord::new("Tran Thi Binh", None, "Secondary").with_id(2),
        ])
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_search_typing_filters() {
        let mut app = loaded_app();
        handle_input(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.state, AppState::Searching);
        for c in "binh".chars() {
            handle_input(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.roster.visible().len(), 1);

        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.roster.search_query, "binh");

        handle_input(&mut app, key(KeyCode::Esc));
        assert!(app.roster.search_query.is_empty());
    }

    #[test]
    fn test_letters_go_to_form_not_shortcuts() {
        let mut app = loaded_app();
        handle_input(&mut app, key(KeyCode::Char('a')));
        for c in "qude".chars() {
            assert!(!handle_input(&mut app, key(KeyCode::Char(c))));
        }
        match &app.roster.dialog {
            Dialog::Form(form) => assert_eq!(form.full_name, "qude"),
            other => panic!("unexpected dialog: {other:?}"),
        }
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Esc));
        assert!(!app.roster.dialog.is_open());
    }

    #[test]
    fn test_delete_dialog_keys() {
        let mut app = loaded_app();
        handle_input(&mut app, key(KeyCode::Down));
        handle_input(&mut app, key(KeyCode::Delete));
        assert_eq!(app.roster.dialog.target_id(), Some(2));

        handle_input(&mut app, key(KeyCode::Char('n')));
        assert!(!app.roster.dialog.is_open());
    }

    #[test]
    fn test_quit_needs_confirmation() {
        let mut app = loaded_app();
        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, key(KeyCode::Esc)));
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q')));
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))));
    }

    #[test]
    fn test_ctrl_c_quits_even_in_dialog() {
        let mut app = loaded_app();
        handle_input(&mut app, key(KeyCode::Char('a')));
        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert!(handle_input(&mut app, ctrl_c));
    }

    #[test]
    fn test_backdrop_click_cancels_dialog() {
        let screen = Rect::new(0, 0, 120, 40);
        let mut app = loaded_app();
        handle_input(&mut app, key(KeyCode::Char('e')));

        let area = dialog_area(&app.roster.dialog, screen).unwrap();
        handle_mouse(&mut app, click(area.x + 1, area.y + 1), screen);
        assert!(app.roster.dialog.is_open());

        handle_mouse(&mut app, click(0, 0), screen);
        assert!(!app.roster.dialog.is_open());
    }
}
