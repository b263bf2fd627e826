use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::model::todo::TodoRecord;
use crate::parse::patterns::{COMPLETED, CONTEXT, DUE, KEY_VALUE, PRIORITY, PROJECT};

/// Derive a record from a raw task line. Never fails: markers that don't
/// parse are treated as absent.
pub fn parse_record(raw: &str) -> TodoRecord {
    let completed = COMPLETED.is_match(raw);

    let priority = PRIORITY
        .captures(raw)
        .and_then(|c| c[1].chars().next());

    let due = DUE
        .captures(raw)
        .and_then(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok());

    let context = CONTEXT.find(raw).map(|m| m.as_str().to_string());

    let projects = PROJECT
        .find_iter(raw)
        .map(|m| m.as_str().to_string())
        .collect();

    let mut attributes = IndexMap::new();
    for caps in KEY_VALUE.captures_iter(raw) {
        attributes
            .entry(caps[1].to_string())
            .or_insert_with(|| caps[2].to_string());
    }

    TodoRecord {
        raw_text: raw.to_string(),
        completed,
        priority,
        due,
        context,
        projects,
        attributes,
    }
}
