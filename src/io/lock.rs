use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory lock serializing writes to the todo store.
///
/// Uses flock (Unix) so a running TUI and one-shot `tl` commands never
/// interleave their saves.
#[derive(Debug)]
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another tl process may be writing")]
    Timeout { path: PathBuf },
    #[error("lock error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FileLock {
    /// Acquire the lock for a workspace directory.
    /// Blocks up to `timeout` waiting for it.
    pub fn acquire(dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::CreateError {
                path: lock_path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        loop {
            match try_lock(&file) {
                Ok(()) => {
                    return Ok(FileLock {
                        _file: file,
                        path: lock_path,
                    });
                }
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => {
                    return Err(LockError::Timeout { path: lock_path });
                }
            }
        }
    }

    /// Acquire with the default timeout (2 seconds)
    pub fn acquire_default(dir: &Path) -> Result<Self, LockError> {
        Self::acquire(dir, Duration::from_secs(2))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // flock is released with the file handle
        let _ = fs::remove_file(&self.path);
    }
}

/// Try to acquire an exclusive flock on the file (non-blocking)
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    // On non-Unix platforms, just succeed (advisory locking)
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_released_on_drop() {
        let tmp = TempDir::new().unwrap();
        let lock = FileLock::acquire_default(tmp.path()).unwrap();
        assert!(tmp.path().join(".lock").exists());
        drop(lock);
        assert!(!tmp.path().join(".lock").exists());
        assert!(FileLock::acquire_default(tmp.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_second_writer_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire_default(tmp.path()).unwrap();
        let err = FileLock::acquire(tmp.path(), Duration::from_millis(50)).unwrap_err();
        assert!(matches!(err, LockError::Timeout { .. }));
    }
}
