pub mod input_line;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;

use super::app::App;
use super::theme::Theme;
use crate::ops::highlight::{highlight, segments};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: input line | todo list | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // input line
            Constraint::Min(1),    // list
            Constraint::Length(1), // status row
        ])
        .split(area);

    input_line::render_input_line(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);
}

/// Push one span per highlight segment. A completed line is dimmed and
/// struck through as a whole; token colors are layered on top.
pub(super) fn push_todo_spans(spans: &mut Vec<Span<'static>>, text: &str, theme: &Theme) {
    let base = if highlight(text).completed {
        theme.completed_style()
    } else {
        Style::default().fg(theme.text)
    };
    for seg in segments(text) {
        let style = match seg.category {
            Some(cat) => base.patch(theme.category_style(cat)),
            None => base,
        };
        spans.push(Span::styled(seg.text.to_string(), style));
    }
}
