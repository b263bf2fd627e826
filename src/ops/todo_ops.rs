use chrono::{DateTime, Utc};

use crate::model::list::{ItemRef, TodoList};
use crate::model::todo::TodoRecord;
use crate::ops::sort::sort_tracking;
use crate::parse::patterns::COMPLETED_MARKER;
use crate::parse::resolve_relative_dates;

/// Result of committing an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The target was found and replaced; handle to its new position
    Updated(ItemRef),
    /// The target was stale or gone, so the text became a new record
    Added(ItemRef),
}

impl EditOutcome {
    pub fn item(self) -> ItemRef {
        match self {
            EditOutcome::Updated(item) | EditOutcome::Added(item) => item,
        }
    }
}

/// Resort after a mutation and bump the generation
fn resort(list: &mut TodoList) {
    sort_tracking(&mut list.records, None);
    list.bump_generation();
}

/// Resort and hand back the new position of the record at `tracked`
fn resort_tracked(list: &mut TodoList, tracked: usize) -> ItemRef {
    let index = sort_tracking(&mut list.records, Some(tracked)).unwrap_or(tracked);
    list.bump_generation();
    ItemRef {
        index,
        generation: list.generation,
    }
}

/// Build a list from stored lines. Relative dates are resolved on the way in.
pub fn load_todos(lines: &[String], now: DateTime<Utc>) -> TodoList {
    let mut list = TodoList::new();
    list.records = lines
        .iter()
        .map(|l| TodoRecord::parse(&resolve_relative_dates(l, now)))
        .collect();
    resort(&mut list);
    list
}

/// Add a new todo
pub fn add_todo(list: &mut TodoList, text: &str, now: DateTime<Utc>) -> ItemRef {
    list.records
        .push(TodoRecord::parse(&resolve_relative_dates(text, now)));
    let added = list.records.len() - 1;
    resort_tracked(list, added)
}

/// Replace the text of `target`, or add `text` as a new record if the handle
/// no longer resolves.
pub fn update_todo(list: &mut TodoList, target: ItemRef, text: &str, now: DateTime<Utc>) -> EditOutcome {
    match list.resolve(target) {
        Some(index) => {
            list.records[index].set_text(&resolve_relative_dates(text, now));
            EditOutcome::Updated(resort_tracked(list, index))
        }
        None => EditOutcome::Added(add_todo(list, text, now)),
    }
}

/// Text with the completion marker toggled
pub fn toggled_text(raw: &str) -> String {
    match raw.strip_prefix(COMPLETED_MARKER) {
        Some(rest) => rest.to_string(),
        None => format!("{}{}", COMPLETED_MARKER, raw),
    }
}

/// Toggle completion. Returns the record's new handle, or None for a stale one.
pub fn toggle_complete(list: &mut TodoList, target: ItemRef, now: DateTime<Utc>) -> Option<ItemRef> {
    let index = list.resolve(target)?;
    let text = toggled_text(list.records[index].raw_text());
    list.records[index].set_text(&resolve_relative_dates(&text, now));
    Some(resort_tracked(list, index))
}

/// Delete a record, returning it. None for a stale handle.
pub fn delete_todo(list: &mut TodoList, target: ItemRef) -> Option<TodoRecord> {
    let index = list.resolve(target)?;
    let removed = list.records.remove(index);
    resort(list);
    Some(removed)
}

/// Remove every record
pub fn clear_todos(list: &mut TodoList) {
    list.records.clear();
    list.bump_generation();
}

/// Number of incomplete records with a due date
pub fn badge_count(records: &[TodoRecord]) -> usize {
    records
        .iter()
        .filter(|r| !r.is_completed() && r.due().is_some())
        .count()
}

/// Badge text: the count, or nothing when there are none
pub fn badge_label(count: usize) -> String {
    if count > 0 {
        count.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    fn list(lines: &[&str]) -> TodoList {
        let lines: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        load_todos(&lines, now())
    }

    #[test]
    fn test_load_resolves_and_sorts() {
        let l = list(&["x old", "plain", "pay due:tomorrow"]);
        assert_eq!(l.raw_lines(), vec!["pay due:2024-01-02", "plain", "x old"]);
    }

    #[test]
    fn test_add_returns_sorted_position() {
        let mut l = list(&["b", "c"]);
        let item = add_todo(&mut l, "(A) a", now());
        assert_eq!(item.index, 0);
        assert_eq!(l.raw_lines(), vec!["(A) a", "b", "c"]);
    }

    #[test]
    fn test_every_mutation_invalidates_handles() {
        let mut l = list(&["a", "b"]);
        let stale = l.item_ref(0).unwrap();
        add_todo(&mut l, "c", now());
        assert!(l.resolve(stale).is_none());
        assert!(toggle_complete(&mut l, stale, now()).is_none());
        assert!(delete_todo(&mut l, stale).is_none());
    }

    #[test]
    fn test_update_in_place() {
        let mut l = list(&["a", "b"]);
        let target = l.item_ref(1).unwrap();
        let outcome = update_todo(&mut l, target, "(B) b due:today", now());
        assert_eq!(outcome, EditOutcome::Updated(l.item_ref(0).unwrap()));
        assert_eq!(l.raw_lines(), vec!["(B) b due:2024-01-01", "a"]);
    }

    #[test]
    fn test_update_with_stale_handle_adds() {
        let mut l = list(&["a"]);
        let stale = l.item_ref(0).unwrap();
        add_todo(&mut l, "b", now());
        let outcome = update_todo(&mut l, stale, "c", now());
        assert!(matches!(outcome, EditOutcome::Added(_)));
        assert_eq!(l.raw_lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_toggle_complete_round_trip() {
        let mut l = list(&["a", "b"]);
        let first = l.item_ref(0).unwrap();
        let item = toggle_complete(&mut l, first, now()).unwrap();
        assert_eq!(item.index, 1);
        assert_eq!(l.raw_lines(), vec!["b", "x a"]);
        let item = toggle_complete(&mut l, item, now()).unwrap();
        assert_eq!(l.get(item.index).unwrap().raw_text(), "a");
    }

    #[test]
    fn test_toggled_text() {
        assert_eq!(toggled_text("task"), "x task");
        assert_eq!(toggled_text("x task"), "task");
        assert_eq!(toggled_text("xylophone"), "x xylophone");
    }

    #[test]
    fn test_delete() {
        let mut l = list(&["a", "b"]);
        let first = l.item_ref(0).unwrap();
        let removed = delete_todo(&mut l, first).unwrap();
        assert_eq!(removed.raw_text(), "a");
        assert_eq!(l.raw_lines(), vec!["b"]);
    }

    #[test]
    fn test_clear() {
        let mut l = list(&["a", "b"]);
        let item = l.item_ref(0).unwrap();
        clear_todos(&mut l);
        assert!(l.is_empty());
        assert!(l.resolve(item).is_none());
    }

    #[test]
    fn test_badge() {
        let l = list(&[
            "a due:2024-02-01",
            "x b due:2024-02-01",
            "c",
            "d due:2024-99-99",
            "e due:friday",
        ]);
        assert_eq!(badge_count(l.records()), 2);
        assert_eq!(badge_label(2), "2");
        assert_eq!(badge_label(0), "");
    }
}
