use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::push_todo_spans;
use crate::tui::app::App;

/// Render the visible todos, scrolled so the selection stays on screen
pub fn render_list_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let visible = app.visible();
    let height = area.height as usize;

    if visible.is_empty() {
        let text = if app.filter.is_some() {
            "No matching todos"
        } else {
            "No todos yet"
        };
        let line = Line::from(Span::styled(text, Style::default().fg(app.theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    let selected = app.nav.selected();
    let offset = match selected {
        Some(s) if height > 0 && s >= height => s + 1 - height,
        _ => 0,
    };

    let records = app.session.list().records();
    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .filter_map(|(pos, &index)| {
            let record = records.get(index)?;
            let is_selected = selected == Some(pos);
            let marker = if is_selected { "\u{203A} " } else { "  " };
            let mut spans = vec![Span::styled(
                marker,
                Style::default().fg(app.theme.highlight),
            )];
            push_todo_spans(&mut spans, record.raw_text(), &app.theme);
            let line = Line::from(spans);
            Some(if is_selected {
                line.style(Style::default().bg(app.theme.selection_bg))
            } else {
                line
            })
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
