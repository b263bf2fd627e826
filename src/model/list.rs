use std::fmt;

use super::todo::TodoRecord;

/// Positional handle to a record, valid only for the list generation it was
/// issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef {
    pub index: usize,
    pub generation: u64,
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item{}", self.index)
    }
}

/// Parse a positional id written as `item3` or `3`
pub fn parse_item_id(s: &str) -> Option<usize> {
    let digits = s.strip_prefix("item").unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The ordered todo collection.
///
/// Every mutation goes through `ops::todo_ops`, which resorts the records and
/// bumps the generation. Handles from older generations no longer resolve.
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    pub(crate) records: Vec<TodoRecord>,
    pub(crate) generation: u64,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TodoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TodoRecord> {
        self.records.get(index)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Handle for the record currently at `index`
    pub fn item_ref(&self, index: usize) -> Option<ItemRef> {
        (index < self.records.len()).then_some(ItemRef {
            index,
            generation: self.generation,
        })
    }

    /// Current index for a handle, or None if it is stale or out of range
    pub fn resolve(&self, item: ItemRef) -> Option<usize> {
        (item.generation == self.generation && item.index < self.records.len())
            .then_some(item.index)
    }

    /// Raw lines in list order, the persisted form
    pub fn raw_lines(&self) -> Vec<String> {
        self.records.iter().map(|r| r.raw_text.clone()).collect()
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
