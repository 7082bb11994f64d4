//! Input handling for the TUI.

use crate::app::{App, AppEvent};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Map a key press to an app operation.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> anyhow::Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(Action::Quit)
        }
        KeyCode::Esc => {
            // Esc closes an open menu before it quits
            if app.menu.is_hidden() {
                return Ok(Action::Quit);
            }
            app.toggle_menu();
        }
        KeyCode::Char('m') => {
            app.toggle_menu();
        }
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Enter if !app.menu.is_hidden() => {
            if let Err(e) = app.select_feed(event_tx) {
                app.set_status(e.to_string());
            }
        }
        KeyCode::Enter | KeyCode::Char('o') => app.open_selected_entry(),
        KeyCode::Char('r') => {
            if let Err(e) = app.reload(event_tx) {
                app.set_status(e.to_string());
            }
        }
        _ => return Ok(Action::Continue),
    }
    app.needs_redraw = true;
    Ok(Action::Continue)
}
