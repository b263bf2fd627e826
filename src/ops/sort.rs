use std::cmp::Ordering;

use crate::model::todo::TodoRecord;

/// Order for optional keys: present values first, ascending among themselves
fn present_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare two records: incomplete first, then due date, then priority, then
/// context. Equal records keep their order when used with a stable sort.
pub fn compare_records(a: &TodoRecord, b: &TodoRecord) -> Ordering {
    a.is_completed()
        .cmp(&b.is_completed())
        .then_with(|| present_first(a.due(), b.due()))
        .then_with(|| present_first(a.priority(), b.priority()))
        .then_with(|| present_first(a.context(), b.context()))
}

/// Stable sort by `compare_records`
pub fn sort_records(records: &mut [TodoRecord]) {
    records.sort_by(compare_records);
}

/// Stable sort that also reports where the record at `tracked` ended up.
pub fn sort_tracking(records: &mut Vec<TodoRecord>, tracked: Option<usize>) -> Option<usize> {
    let mut indexed: Vec<(usize, TodoRecord)> = records.drain(..).enumerate().collect();
    indexed.sort_by(|(_, a), (_, b)| compare_records(a, b));
    let position = tracked.and_then(|t| indexed.iter().position(|(i, _)| *i == t));
    records.extend(indexed.into_iter().map(|(_, r)| r));
    position
}
