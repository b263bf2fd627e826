use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config_io::DEFAULT_CONFIG;
use crate::io::store::{FileStore, StoreError, TODOS_FILE, TodoStore};

/// Name of the per-directory workspace folder
pub const WORKSPACE_DIR: &str = ".tally";

/// Error type for workspace discovery and setup
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("no tally workspace found (run `tl init` to create one)")]
    NotFound,
    #[error("a tally workspace already exists at {0} (use --force to reinitialize)")]
    AlreadyExists(PathBuf),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a `.tally/` directory. Returns its path.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        let dir = current.join(WORKSPACE_DIR);
        if dir.is_dir() {
            return Ok(dir);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotFound);
        }
    }
}

/// Create `.tally/` under `root` with a commented config and an empty store.
/// With `force`, an existing config is rewritten but stored todos are kept.
pub fn init_workspace(root: &Path, force: bool) -> Result<PathBuf, WorkspaceError> {
    let dir = root.join(WORKSPACE_DIR);
    if dir.is_dir() && !force {
        return Err(WorkspaceError::AlreadyExists(dir));
    }
    fs::create_dir_all(&dir)?;

    let config_path = dir.join("config.toml");
    fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| WorkspaceError::WriteError {
        path: config_path.clone(),
        source: e,
    })?;

    if !dir.join(TODOS_FILE).exists() {
        FileStore::new(&dir).save(&[])?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        let dir = init_workspace(tmp.path(), false).unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(discover_workspace(&nested).unwrap(), dir);
    }

    #[test]
    fn test_discover_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_workspace(tmp.path()),
            Err(WorkspaceError::NotFound)
        ));
    }

    #[test]
    fn test_init_refuses_existing_without_force() {
        let tmp = TempDir::new().unwrap();
        init_workspace(tmp.path(), false).unwrap();
        assert!(matches!(
            init_workspace(tmp.path(), false),
            Err(WorkspaceError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_force_keeps_todos() {
        let tmp = TempDir::new().unwrap();
        let dir = init_workspace(tmp.path(), false).unwrap();
        FileStore::new(&dir).save(&["keep me".to_string()]).unwrap();
        init_workspace(tmp.path(), true).unwrap();
        assert_eq!(FileStore::new(&dir).load().unwrap(), vec!["keep me"]);
    }
}
