mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

use edit::handle_edit;
use navigate::handle_navigate;

/// Handle a key event. Navigation keys go through the selection state
/// machine first; whatever it doesn't consume edits the input line.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if handle_navigate(app, key) {
        return;
    }
    handle_edit(app, key);
}
