use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::config_io::CONFIG_FILE;
use crate::io::store::TODOS_FILE;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEvent {
    ConfigChanged,
    TodosChanged,
}

/// Map a changed path to the event it means, if any. Lock, log and temp
/// files are ignored.
pub fn classify(dir: &Path, path: &Path) -> Option<FileEvent> {
    if path.parent() != Some(dir) {
        return None;
    }
    match path.file_name()?.to_str()? {
        CONFIG_FILE => Some(FileEvent::ConfigChanged),
        TODOS_FILE => Some(FileEvent::TodosChanged),
        _ => None,
    }
}

/// A file system watcher for the `.tally/` directory.
pub struct WorkspaceWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl WorkspaceWatcher {
    /// Start watching the workspace directory.
    /// `poll()` should be called each tick.
    pub fn start(dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir_owned: PathBuf = dir.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                for path in &event.paths {
                    if let Some(evt) = classify(&dir_owned, path) {
                        let _ = tx.send(evt);
                    }
                }
            },
            Config::default(),
        )?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(WorkspaceWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Returns the distinct pending events (may be empty).
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            if !events.contains(&evt) {
                events.push(evt);
            }
        }
        events
    }
}
