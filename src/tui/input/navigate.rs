use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::nav::{Effect, NavKey, NavState, transition};
use crate::tui::app::App;

fn nav_key(key: KeyEvent) -> Option<NavKey> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(NavKey::Up),
        KeyCode::Down => Some(NavKey::Down),
        KeyCode::Esc => Some(NavKey::Escape),
        KeyCode::Enter => Some(NavKey::Enter),
        KeyCode::Char(c) => Some(NavKey::Char(c)),
        _ => None,
    }
}

/// Run the key through the selection state machine and carry out its
/// effect. Returns false when the key belongs to the input line.
pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) -> bool {
    let Some(nk) = nav_key(key) else {
        return false;
    };
    let visible = app.visible();
    let before = app.nav;
    let (state, effect) = transition(before, nk, visible.len(), &app.config.keys);
    app.nav = state;

    match effect {
        Effect::Unhandled => false,
        Effect::None => {
            // Esc already on the input line also drops a pending edit
            if nk == NavKey::Escape && before == NavState::NoSelection {
                app.cancel_input();
            }
            true
        }
        Effect::BeginEdit(pos) => {
            if let Some(&index) = visible.get(pos) {
                app.begin_edit(index);
            }
            true
        }
        Effect::ToggleComplete(pos) => {
            if let Some(&index) = visible.get(pos) {
                app.toggle(index);
            }
            true
        }
        Effect::Delete(pos) => {
            if let Some(&index) = visible.get(pos) {
                app.delete(index);
            }
            true
        }
    }
}
