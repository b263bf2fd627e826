use chrono::{DateTime, TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::io::session::Session;
use crate::io::store::MemoryStore;
use crate::model::config::Config;
use crate::tui::app::App;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 8;

/// Monday 2024-01-01, 08:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
}

/// An app over an in-memory store holding `items`, with a fixed clock
pub fn test_app(items: &[&str]) -> App {
    let store = MemoryStore::with_items(items);
    let session = Session::open(Box::new(store), None, fixed_now()).unwrap();
    let mut app = App::new(session, Config::default(), None);
    app.clock = fixed_now;
    app
}

/// Render the whole app into an in-memory buffer and return plain text
/// (no styles).
pub fn render_to_string(w: u16, h: u16, app: &App) -> String {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| super::render(frame, app))
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::nav::NavState;
    use crate::tui::app::MessageKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_list() {
        let app = test_app(&["buy milk @store", "(A) call mom due:2024-01-02"]);
        let out = render_to_string(TERM_W, TERM_H, &app);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Add \u{25B8}");
        assert_eq!(lines[1], "  (A) call mom due:2024-01-02");
        assert_eq!(lines[2], "  buy milk @store");
        assert!(lines[7].ends_with(" 1 due"));
    }

    #[test]
    fn test_render_selection_and_prompt() {
        let mut app = test_app(&["a", "b"]);
        app.nav = NavState::Selected(1);
        let out = render_to_string(TERM_W, TERM_H, &app);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "  a");
        assert_eq!(lines[2], "\u{203A} b");

        app.nav = NavState::NoSelection;
        app.begin_edit(0);
        let out = render_to_string(TERM_W, TERM_H, &app);
        assert!(out.starts_with("Edit \u{25B8} a"));
    }

    #[test]
    fn test_render_filter_and_empty_states() {
        let mut app = test_app(&[]);
        let out = render_to_string(TERM_W, TERM_H, &app);
        assert!(out.contains("No todos yet"));

        let mut app2 = test_app(&["a"]);
        app2.set_input("?zzz");
        let out = render_to_string(TERM_W, TERM_H, &app2);
        assert!(out.starts_with("Filter \u{25B8} ?zzz"));
        assert!(out.contains("No matching todos"));

        app.set_message("Save failed: disk full", MessageKind::Error);
        let out = render_to_string(TERM_W, TERM_H, &app);
        assert!(out.lines().last().unwrap().starts_with("Save failed: disk full"));
    }

    #[test]
    fn test_render_key_hints() {
        let mut app = test_app(&["a"]);
        app.config.ui.show_key_hints = true;
        app.nav = NavState::Selected(0);
        let out = render_to_string(TERM_W, TERM_H, &app);
        assert!(out.lines().last().unwrap().ends_with("C done  E edit  D delete  N new  Esc back"));
    }

    #[test]
    fn test_render_scrolls_to_selection() {
        let items: Vec<String> = (0..20).map(|i| format!("task {:02}", i)).collect();
        let refs: Vec<&str> = items.iter().map(|s| s.as_str()).collect();
        let mut app = test_app(&refs);
        app.nav = NavState::Selected(10);
        let out = render_to_string(TERM_W, TERM_H, &app);
        let lines: Vec<&str> = out.lines().collect();
        // 6 list rows between the input line and the status row
        assert_eq!(lines[1], "  task 05");
        assert_eq!(lines[6], "\u{203A} task 10");
    }
}
