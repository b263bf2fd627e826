use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from `.tally/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keys: KeyConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Single-letter shortcuts acting on the selected todo, plus the filter trigger.
///
/// Stored as strings so a bad value in the file doesn't reject the whole
/// config; use the accessors, which fall back to the default per key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    #[serde(default = "default_complete")]
    pub complete: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig {
            complete: default_complete(),
            edit: default_edit(),
            delete: default_delete(),
            new: default_new(),
            filter: default_filter(),
        }
    }
}

fn default_complete() -> String {
    "C".into()
}

fn default_edit() -> String {
    "E".into()
}

fn default_delete() -> String {
    "D".into()
}

fn default_new() -> String {
    "N".into()
}

fn default_filter() -> String {
    "?".into()
}

/// The single character in `value`, or `fallback` if it isn't exactly one
fn single_char(value: &str, fallback: char) -> char {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => fallback,
    }
}

/// Actions that have a configurable key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Complete,
    Edit,
    Delete,
    New,
    Filter,
}

impl KeyAction {
    pub const ALL: [KeyAction; 5] = [
        KeyAction::Complete,
        KeyAction::Edit,
        KeyAction::Delete,
        KeyAction::New,
        KeyAction::Filter,
    ];

    /// The key name in the `[keys]` table
    pub fn name(self) -> &'static str {
        match self {
            KeyAction::Complete => "complete",
            KeyAction::Edit => "edit",
            KeyAction::Delete => "delete",
            KeyAction::New => "new",
            KeyAction::Filter => "filter",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        KeyAction::ALL.into_iter().find(|a| a.name() == s)
    }
}

impl KeyConfig {
    pub fn complete(&self) -> char {
        single_char(&self.complete, 'C')
    }

    pub fn edit(&self) -> char {
        single_char(&self.edit, 'E')
    }

    pub fn delete(&self) -> char {
        single_char(&self.delete, 'D')
    }

    pub fn new_todo(&self) -> char {
        single_char(&self.new, 'N')
    }

    pub fn filter(&self) -> char {
        single_char(&self.filter, '?')
    }

    pub fn key_for(&self, action: KeyAction) -> char {
        match action {
            KeyAction::Complete => self.complete(),
            KeyAction::Edit => self.edit(),
            KeyAction::Delete => self.delete(),
            KeyAction::New => self.new_todo(),
            KeyAction::Filter => self.filter(),
        }
    }

    /// Which selection shortcut `c` triggers, compared case-insensitively.
    /// The filter key is not a selection shortcut.
    pub fn shortcut_for(&self, c: char) -> Option<KeyAction> {
        [
            KeyAction::Complete,
            KeyAction::Edit,
            KeyAction::Delete,
            KeyAction::New,
        ]
        .into_iter()
        .find(|a| self.key_for(*a).eq_ignore_ascii_case(&c))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Show shortcut hints in the status row
    #[serde(default)]
    pub show_key_hints: bool,
    /// Theme color overrides, e.g. `context = "#44DDFF"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
