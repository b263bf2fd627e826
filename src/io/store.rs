use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::io::lock::{FileLock, LockError};
use crate::io::oplog::atomic_write;

/// File holding the stored todos inside the workspace directory
pub const TODOS_FILE: &str = "todos.json";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode todos: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("store is not writable")]
    Unavailable,
}

/// On-disk shape: `{"items": ["...", ...]}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredItems {
    #[serde(default)]
    items: Vec<String>,
}

/// Ordered list of raw todo strings, persisted somewhere.
///
/// All methods take `&self`; implementations that need to mutate use
/// interior mutability since the app is single-threaded.
pub trait TodoStore {
    /// Stored lines in order. A store that was never written loads as empty.
    fn load(&self) -> Result<Vec<String>, StoreError>;

    /// Replace the stored lines
    fn save(&self, items: &[String]) -> Result<(), StoreError>;

    /// Remove everything
    fn clear(&self) -> Result<(), StoreError>;
}

/// JSON file store in a workspace directory.
///
/// Writes hold the workspace lock and go through temp file + rename, so
/// overlapping saves from several processes land whole and in lock order.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        FileStore {
            dir: dir.to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TODOS_FILE)
    }
}

impl TodoStore for FileStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::ReadError { path, source: e }),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let stored: StoredItems =
            serde_json::from_str(&text).map_err(|e| StoreError::ParseError { path, source: e })?;
        Ok(stored.items)
    }

    fn save(&self, items: &[String]) -> Result<(), StoreError> {
        let _lock = FileLock::acquire_default(&self.dir)?;
        let path = self.path();
        let stored = StoredItems {
            items: items.to_vec(),
        };
        let mut content = serde_json::to_string_pretty(&stored)?;
        content.push('\n');
        atomic_write(&path, content.as_bytes())
            .map_err(|e| StoreError::WriteError { path, source: e })
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _lock = FileLock::acquire_default(&self.dir)?;
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::WriteError { path, source: e }),
        }
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<Vec<String>>,
    fail_writes: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: &[&str]) -> Self {
        let store = Self::default();
        *store.items.borrow_mut() = items.iter().map(|s| s.to_string()).collect();
        store
    }

    /// Make every following save and clear fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn items(&self) -> Vec<String> {
        self.items.borrow().clone()
    }
}

impl TodoStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.items.borrow().clone())
    }

    fn save(&self, items: &[String]) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable);
        }
        *self.items.borrow_mut() = items.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable);
        }
        self.items.borrow_mut().clear();
        Ok(())
    }
}
