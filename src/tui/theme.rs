use ratatui::style::{Color, Modifier, Style};

use crate::model::UiConfig;
use crate::ops::highlight::Category;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub priority: Color,
    pub context: Color,
    pub project: Color,
    pub kvpair: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            priority: Color::Rgb(0xFF, 0x44, 0x44),
            context: Color::Rgb(0x44, 0xDD, 0xFF),
            project: Color::Rgb(0xFF, 0xD7, 0x00),
            kvpair: Color::Rgb(0xCC, 0x66, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui.colors]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "green" => theme.green = color,
                    "priority" => theme.priority = color,
                    "context" => theme.context = color,
                    "project" => theme.project = color,
                    "kvpair" => theme.kvpair = color,
                    "selection_bg" => theme.selection_bg = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Style for a highlighted token
    pub fn category_style(&self, category: Category) -> Style {
        match category {
            Category::Completed => self.completed_style(),
            Category::KeyValue => Style::default().fg(self.kvpair),
            Category::Project => Style::default().fg(self.project),
            Category::Context => Style::default().fg(self.context),
            Category::Priority => Style::default()
                .fg(self.priority)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Completed lines are dimmed and struck through as a whole
    pub fn completed_style(&self) -> Style {
        Style::default()
            .fg(self.dim)
            .add_modifier(Modifier::CROSSED_OUT)
    }
}
