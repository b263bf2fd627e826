use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::io::oplog::{LogCategory, LogEntry, log_event};
use crate::io::store::{FileStore, StoreError, TodoStore};
use crate::model::list::{ItemRef, TodoList};
use crate::model::todo::TodoRecord;
use crate::ops::todo_ops::{self, EditOutcome};

/// Result of a mutation: the value, plus whether the save that followed it
/// worked. The in-memory list keeps the change either way.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub saved: Result<(), StoreError>,
}

/// A loaded todo list bound to the store it came from. Every mutation
/// resorts the list and saves the whole collection.
pub struct Session {
    store: Box<dyn TodoStore>,
    log_dir: Option<PathBuf>,
    list: TodoList,
}

impl Session {
    /// Load from `store`. Save failures are logged to `log_dir` when given.
    pub fn open(
        store: Box<dyn TodoStore>,
        log_dir: Option<PathBuf>,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let lines = store.load()?;
        let session = Session {
            store,
            log_dir,
            list: todo_ops::load_todos(&lines, now),
        };
        // Pin resolved dates and the sorted order. A failed save is logged
        // and the loaded list is still usable.
        if session.list.raw_lines() != lines {
            let _ = session.commit();
        }
        Ok(session)
    }

    /// Session over the file store in a workspace directory
    pub fn open_workspace(dir: &Path, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Session::open(
            Box::new(FileStore::new(dir)),
            Some(dir.to_path_buf()),
            now,
        )
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    /// Replace the list with what is currently stored. Returns false, and
    /// keeps existing handles valid, when the store holds what we last saved.
    pub fn reload(&mut self, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let lines = self.store.load()?;
        if lines == self.list.raw_lines() {
            return Ok(false);
        }
        let mut list = todo_ops::load_todos(&lines, now);
        // Handles issued before the reload must not resolve against it
        list.generation = self.list.generation.wrapping_add(1);
        self.list = list;
        Ok(true)
    }

    pub fn add(&mut self, text: &str, now: DateTime<Utc>) -> Committed<ItemRef> {
        let item = todo_ops::add_todo(&mut self.list, text, now);
        self.committed(item)
    }

    /// Replace the target's text; a stale target adds a new record instead
    pub fn edit(&mut self, target: ItemRef, text: &str, now: DateTime<Utc>) -> Committed<EditOutcome> {
        let outcome = todo_ops::update_todo(&mut self.list, target, text, now);
        self.committed(outcome)
    }

    /// None for a stale handle; nothing is saved then
    pub fn toggle(&mut self, target: ItemRef, now: DateTime<Utc>) -> Option<Committed<ItemRef>> {
        let item = todo_ops::toggle_complete(&mut self.list, target, now)?;
        Some(self.committed(item))
    }

    pub fn delete(&mut self, target: ItemRef) -> Option<Committed<TodoRecord>> {
        let removed = todo_ops::delete_todo(&mut self.list, target)?;
        Some(self.committed(removed))
    }

    /// Add every non-blank line. Returns how many were added.
    pub fn import<'a>(
        &mut self,
        lines: impl IntoIterator<Item = &'a str>,
        now: DateTime<Utc>,
    ) -> Committed<usize> {
        let mut added = 0;
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            todo_ops::add_todo(&mut self.list, line, now);
            added += 1;
        }
        self.committed(added)
    }

    /// Empty the list and the store
    pub fn reset(&mut self) -> Result<(), StoreError> {
        todo_ops::clear_todos(&mut self.list);
        self.store.clear().inspect_err(|e| self.log_failure("reset failed", e))
    }

    fn committed<T>(&mut self, value: T) -> Committed<T> {
        Committed {
            value,
            saved: self.commit(),
        }
    }

    /// Save the whole list
    pub fn commit(&self) -> Result<(), StoreError> {
        self.store
            .save(&self.list.raw_lines())
            .inspect_err(|e| self.log_failure("save failed", e))
    }

    fn log_failure(&self, what: &str, err: &StoreError) {
        if let Some(dir) = &self.log_dir {
            log_event(
                dir,
                LogEntry::new(LogCategory::Store, what)
                    .field("Error", err)
                    .field("Items", self.list.len())
                    .body(self.list.raw_lines().join("\n")),
            );
        }
    }
}
