use crate::model::config::{KeyAction, KeyConfig};

/// Keyboard selection over the visible list. `NoSelection` means the input
/// line has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    NoSelection,
    /// Index into the visible list
    Selected(usize),
}

impl NavState {
    pub fn selected(self) -> Option<usize> {
        match self {
            NavState::Selected(i) => Some(i),
            NavState::NoSelection => None,
        }
    }
}

/// Keys the navigation machine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Escape,
    Enter,
    Char(char),
}

/// What the caller has to do after a transition. Indices are visible-list
/// positions as they were before the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Consumed, nothing else to do
    None,
    /// Not a navigation key in this state; hand it to the input line
    Unhandled,
    /// Load the record into the input line for editing
    BeginEdit(usize),
    /// Toggle completion; the caller moves the selection to the record's new
    /// position afterwards
    ToggleComplete(usize),
    /// Delete the record; the returned state already points at its neighbour
    Delete(usize),
}

/// Apply `key` to `state` over a visible list of `len` items.
pub fn transition(state: NavState, key: NavKey, len: usize, keys: &KeyConfig) -> (NavState, Effect) {
    if len == 0 {
        return (NavState::NoSelection, Effect::Unhandled);
    }
    let state = match state {
        NavState::Selected(i) if i >= len => NavState::Selected(len - 1),
        s => s,
    };

    match (state, key) {
        (_, NavKey::Escape) => (NavState::NoSelection, Effect::None),

        (NavState::NoSelection, NavKey::Down) => (NavState::Selected(0), Effect::None),
        (NavState::Selected(i), NavKey::Down) => {
            let next = if i + 1 < len { i + 1 } else { 0 };
            (NavState::Selected(next), Effect::None)
        }

        (NavState::NoSelection, NavKey::Up) => (NavState::NoSelection, Effect::None),
        (NavState::Selected(0), NavKey::Up) => (NavState::NoSelection, Effect::None),
        (NavState::Selected(i), NavKey::Up) => (NavState::Selected(i - 1), Effect::None),

        (NavState::Selected(i), NavKey::Enter) => (NavState::NoSelection, Effect::BeginEdit(i)),

        (NavState::Selected(i), NavKey::Char(c)) => match keys.shortcut_for(c) {
            Some(KeyAction::Complete) => (NavState::Selected(i), Effect::ToggleComplete(i)),
            Some(KeyAction::Edit) => (NavState::NoSelection, Effect::BeginEdit(i)),
            Some(KeyAction::New) => (NavState::NoSelection, Effect::None),
            Some(KeyAction::Delete) => (after_delete(i, len), Effect::Delete(i)),
            Some(KeyAction::Filter) | None => (state, Effect::None),
        },

        (NavState::NoSelection, NavKey::Enter | NavKey::Char(_)) => {
            (NavState::NoSelection, Effect::Unhandled)
        }
    }
}

/// Previous sibling, else the next one (which moves into slot 0), else input
fn after_delete(i: usize, len: usize) -> NavState {
    let remaining = len - 1;
    if remaining == 0 {
        NavState::NoSelection
    } else if i > 0 {
        NavState::Selected(i - 1)
    } else {
        NavState::Selected(0)
    }
}
