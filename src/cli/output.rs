use indexmap::IndexMap;
use serde::Serialize;

use crate::io::oplog::LogEntry;
use crate::model::config::{KeyAction, KeyConfig};
use crate::model::list::ItemRef;
use crate::model::todo::TodoRecord;
use crate::ops::highlight::to_markup;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

#[derive(Serialize)]
pub struct BadgeJson {
    pub count: usize,
    pub label: String,
}

#[derive(Serialize)]
pub struct KeysJson {
    pub complete: char,
    pub edit: char,
    pub delete: char,
    pub new: char,
    pub filter: char,
}

#[derive(Serialize)]
pub struct LogEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    pub fields: IndexMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn todo_to_json(item: ItemRef, record: &TodoRecord) -> TodoJson {
    TodoJson {
        id: item.to_string(),
        text: record.raw_text().to_string(),
        completed: record.is_completed(),
        priority: record.priority(),
        due: record.due().map(|d| d.format("%Y-%m-%d").to_string()),
        context: record.context().map(str::to_string),
        projects: record.projects().to_vec(),
        attributes: record.attributes().clone(),
    }
}

pub fn keys_to_json(keys: &KeyConfig) -> KeysJson {
    KeysJson {
        complete: keys.complete(),
        edit: keys.edit(),
        delete: keys.delete(),
        new: keys.new_todo(),
        filter: keys.filter(),
    }
}

pub fn log_entry_to_json(entry: &LogEntry) -> LogEntryJson {
    LogEntryJson {
        timestamp: entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.iter().cloned().collect(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One listing line: right-aligned id, then the text (or its markup)
pub fn format_todo_line(item: ItemRef, record: &TodoRecord, id_width: usize, markup: bool) -> String {
    let text = if markup {
        to_markup(record.raw_text())
    } else {
        record.raw_text().to_string()
    };
    format!("{:>width$}  {}", item.to_string(), text, width = id_width)
}

pub fn format_keys(keys: &KeyConfig) -> Vec<String> {
    KeyAction::ALL
        .iter()
        .map(|a| format!("{:<9}{}", a.name(), keys.key_for(*a)))
        .collect()
}

pub fn format_log_entry(entry: &LogEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}: {}",
        entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        entry.category,
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    for line in entry.body.lines() {
        lines.push(format!("  | {}", line));
    }
    lines
}
