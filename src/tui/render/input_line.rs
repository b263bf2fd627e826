use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::nav::NavState;
use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the input line: prompt label, then the text being typed.
/// The terminal cursor is shown only while the input has focus.
pub fn render_input_line(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label = format!("{} \u{25B8} ", app.prompt().label());
    let focused = app.nav == NavState::NoSelection;

    let label_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let line = Line::from(vec![
        Span::styled(label.clone(), label_style),
        Span::styled(app.input.clone(), Style::default().fg(app.theme.text_bright).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);

    if focused {
        let offset = display_width(&label) + display_width(&app.input[..app.cursor]);
        let x = area.x.saturating_add(offset as u16).min(area.right().saturating_sub(1));
        frame.set_cursor_position((x, area.y));
    }
}
