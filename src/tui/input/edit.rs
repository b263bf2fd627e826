use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;
use crate::util::unicode::{
    next_grapheme_boundary, prev_grapheme_boundary, word_boundary_left, word_boundary_right,
};

/// Edit the input line. The cursor moves by grapheme clusters, or by words
/// with Ctrl/Alt held.
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let word = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('w') if word => {
            let start = word_boundary_left(&app.input, app.cursor);
            app.input.replace_range(start..app.cursor, "");
            app.cursor = start;
            app.input_changed();
        }
        KeyCode::Char(_) if word => {}
        KeyCode::Left if word => app.cursor = word_boundary_left(&app.input, app.cursor),
        KeyCode::Right if word => app.cursor = word_boundary_right(&app.input, app.cursor),
        KeyCode::Enter => app.submit(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Char(c) => {
            app.input.insert(app.cursor, c);
            app.cursor += c.len_utf8();
            app.input_changed();
        }
        KeyCode::Backspace => {
            if let Some(prev) = prev_grapheme_boundary(&app.input, app.cursor) {
                app.input.replace_range(prev..app.cursor, "");
                app.cursor = prev;
                app.input_changed();
            }
        }
        KeyCode::Delete => {
            if let Some(next) = next_grapheme_boundary(&app.input, app.cursor) {
                app.input.replace_range(app.cursor..next, "");
                app.input_changed();
            }
        }
        KeyCode::Left => {
            if let Some(prev) = prev_grapheme_boundary(&app.input, app.cursor) {
                app.cursor = prev;
            }
        }
        KeyCode::Right => {
            if let Some(next) = next_grapheme_boundary(&app.input, app.cursor) {
                app.cursor = next;
            }
        }
        KeyCode::Home => app.cursor = 0,
        KeyCode::End => app.cursor = app.input.len(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::test_app;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        handle_edit(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, code: KeyCode) {
        handle_edit(app, KeyEvent::new(code, KeyModifiers::CONTROL));
    }

    #[test]
    fn test_cursor_moves_by_grapheme() {
        let mut app = test_app(&[]);
        app.set_input("ae\u{301}b");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, 4);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, 1);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "e\u{301}b");
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "e\u{301}b");
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.input, "b");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut app = test_app(&[]);
        app.set_input("ac");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.input, "abc");
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn test_word_motion_and_delete() {
        let mut app = test_app(&[]);
        app.set_input("call mom @phone");
        ctrl(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, 9);
        ctrl(&mut app, KeyCode::Char('w'));
        assert_eq!(app.input, "call @phone");
        assert_eq!(app.cursor, 5);
        ctrl(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, app.input.len());
        ctrl(&mut app, KeyCode::Char('x'));
        assert_eq!(app.input, "call @phone");
    }

    #[test]
    fn test_backspace_to_empty_clears_filter() {
        let mut app = test_app(&["a", "b"]);
        app.set_input("?a");
        assert!(app.filter.is_some());
        press(&mut app, KeyCode::Backspace);
        assert!(app.filter.is_some());
        press(&mut app, KeyCode::Backspace);
        assert!(app.filter.is_none());
        assert_eq!(app.visible().len(), 2);
    }
}
