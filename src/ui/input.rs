//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Pane};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('c') => {
            app.toggle_cart();
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.select_tab(index);
        }
        KeyCode::Left | KeyCode::BackTab => {
            if matches!(app.pane, Pane::Menu) {
                app.prev_tab();
            }
        }
        KeyCode::Right | KeyCode::Tab => {
            if matches!(app.pane, Pane::Menu) {
                app.next_tab();
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection_up();
        }
        KeyCode::Enter => {
            if matches!(app.pane, Pane::Menu) {
                app.add_selected_to_cart();
            }
        }
        KeyCode::Char('d') => {
            if matches!(app.pane, Pane::Cart) {
                app.remove_selected_cart_line();
            }
        }
        KeyCode::Esc => {
            if matches!(app.pane, Pane::Cart) {
                app.pane = Pane::Menu;
            }
        }
        _ => {}
    }

    Ok(false)
}
