use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::nav::NavState;
use crate::ops::todo_ops::{badge_count, badge_label};
use crate::tui::app::{App, MessageKind};
use crate::util::unicode::{display_width, truncate_to_width};

/// Key hints for the current focus
fn key_hints(app: &App) -> String {
    let keys = &app.config.keys;
    match app.nav {
        NavState::NoSelection => format!("\u{2193} select  {} filter", keys.filter()),
        NavState::Selected(_) => format!(
            "{} done  {} edit  {} delete  {} new  Esc back",
            keys.complete(),
            keys.edit(),
            keys.delete(),
            keys.new_todo()
        ),
    }
}

/// Render the status row (bottom of screen): message on the left, badge and
/// hints on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    if let Some(ref msg) = app.message {
        let color = match msg.kind {
            MessageKind::Success => app.theme.green,
            MessageKind::Error => app.theme.red,
        };
        spans.push(Span::styled(
            truncate_to_width(&msg.text, width),
            Style::default().fg(color).bg(bg),
        ));
    }

    let mut right = Vec::new();
    let badge = badge_label(badge_count(app.session.list().records()));
    if !badge.is_empty() {
        right.push(Span::styled(
            format!(" {} due ", badge),
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if app.config.ui.show_key_hints {
        right.push(Span::styled(
            format!("  {}", key_hints(app)),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let left_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let right_width: usize = right.iter().map(|s| display_width(&s.content)).sum();
    if left_width + right_width < width {
        let padding = width - left_width - right_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.extend(right);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
