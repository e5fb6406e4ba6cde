//! Per-host configuration snapshot rotation
//!
//! Exactly one current snapshot exists per host, overwritten on each run.
//! The rotation is a single combined read-then-truncate-then-write over one
//! open file handle, so a crash between the read and the write cannot lose
//! the old text without the new text having been read, and cannot commit the
//! new text before the old one was consumed.
//!
//! The snapshot file is not lock-protected; two simultaneous runs against
//! the same host race (documented limitation).

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AuditSettings;

/// Errors that can occur while rotating a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be opened or created
    #[error("Failed to open snapshot file '{path}': {source}")]
    Open {
        /// Path of the snapshot file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The prior snapshot could not be read
    #[error("Failed to read snapshot file '{path}': {source}")]
    Read {
        /// Path of the snapshot file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The new snapshot could not be written
    #[error("Failed to write snapshot file '{path}': {source}")]
    Write {
        /// Path of the snapshot file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The host audit trail could not be written
    #[error("Failed to write host log '{path}': {source}")]
    HostLog {
        /// Path of the host log file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Result type alias for snapshot operations
pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

/// Reads and replaces the per-host snapshot files
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
    suffix: String,
    host_log_name: String,
}

impl SnapshotStore {
    /// Creates a store rooted at `dir`
    #[must_use]
    pub fn new(
        dir: impl Into<PathBuf>,
        suffix: impl Into<String>,
        host_log_name: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
            host_log_name: host_log_name.into(),
        }
    }

    /// Creates a store from audit settings
    #[must_use]
    pub fn from_settings(settings: &AuditSettings) -> Self {
        Self::new(
            settings.resolve_audit_dir(),
            settings.snapshot_suffix.clone(),
            settings.host_log_file_name.clone(),
        )
    }

    /// Returns the directory this store writes into
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the snapshot file path for `host`
    #[must_use]
    pub fn snapshot_path(&self, host: &str) -> PathBuf {
        self.dir.join(format!("{host}{}", self.suffix))
    }

    /// Reads the prior snapshot for `host` and replaces it with `new_text`
    ///
    /// One combined operation over a single read+write handle: read old,
    /// seek to start, truncate, write new, flush. A missing prior file is
    /// the expected first run: the file is created and the old text is
    /// empty.
    ///
    /// # Errors
    /// Returns `SnapshotError` for open, read, or write failures; all are
    /// fatal. On a write failure after the read, the prior text has already
    /// been captured into the return path of earlier stages, but the file
    /// itself may be truncated — callers treat this as terminal.
    pub fn load_and_replace(&self, host: &str, new_text: &str) -> SnapshotResult<String> {
        let path = self.snapshot_path(host);

        let mut file = match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no prior snapshot, creating one");
                return create_initial(&path, new_text).map(|()| String::new());
            }
            Err(source) => return Err(SnapshotError::Open { path, source }),
        };

        let mut old_text = String::new();
        file.read_to_string(&mut old_text)
            .map_err(|source| SnapshotError::Read {
                path: path.clone(),
                source,
            })?;

        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.set_len(0))
            .and_then(|()| file.write_all(new_text.as_bytes()))
            .and_then(|()| file.flush())
            .map_err(|source| SnapshotError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            old_bytes = old_text.len(),
            new_bytes = new_text.len(),
            "snapshot rotated"
        );
        Ok(old_text)
    }

    /// Records the last-entered host identity
    ///
    /// Write-only audit trail; nothing in the audit flow reads it back.
    ///
    /// # Errors
    /// Returns `SnapshotError::HostLog` when the file cannot be written.
    pub fn record_host(&self, host: &str) -> SnapshotResult<()> {
        let path = self.dir.join(&self.host_log_name);
        std::fs::write(&path, host).map_err(|source| SnapshotError::HostLog { path, source })
    }
}

fn create_initial(path: &Path, new_text: &str) -> SnapshotResult<()> {
    let mut file = File::create(path).map_err(|source| SnapshotError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(new_text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SnapshotStore {
        SnapshotStore::new(dir.path(), "_config.txt", "hostname.txt")
    }

    #[test]
    fn test_snapshot_path() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(
            store.snapshot_path("router1"),
            dir.path().join("router1_config.txt")
        );
    }

    #[test]
    fn test_first_run_creates_file_and_returns_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let old = store.load_and_replace("router1", "a\nb\n").unwrap();
        assert_eq!(old, "");

        let on_disk = std::fs::read_to_string(store.snapshot_path("router1")).unwrap();
        assert_eq!(on_disk, "a\nb\n");
    }

    #[test]
    fn test_rotation_returns_prior_text() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.load_and_replace("router1", "first\n").unwrap();
        let old = store.load_and_replace("router1", "second\n").unwrap();
        assert_eq!(old, "first\n");

        let on_disk = std::fs::read_to_string(store.snapshot_path("router1")).unwrap();
        assert_eq!(on_disk, "second\n");
    }

    #[test]
    fn test_replacement_truncates_longer_prior_text() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .load_and_replace("router1", "a much longer configuration\n")
            .unwrap();
        let old = store.load_and_replace("router1", "short\n").unwrap();
        assert_eq!(old, "a much longer configuration\n");

        let on_disk = std::fs::read_to_string(store.snapshot_path("router1")).unwrap();
        assert_eq!(on_disk, "short\n");
    }

    #[test]
    fn test_hosts_are_independent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.load_and_replace("router1", "one\n").unwrap();
        store.load_and_replace("router2", "two\n").unwrap();

        let old = store.load_and_replace("router1", "one again\n").unwrap();
        assert_eq!(old, "one\n");
        let on_disk = std::fs::read_to_string(store.snapshot_path("router2")).unwrap();
        assert_eq!(on_disk, "two\n");
    }

    #[test]
    fn test_open_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(
            dir.path().join("missing-subdir"),
            "_config.txt",
            "hostname.txt",
        );

        assert!(matches!(
            store.load_and_replace("router1", "text"),
            Err(SnapshotError::Open { .. })
        ));
    }

    #[test]
    fn test_record_host() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.record_host("10.0.0.1").unwrap();
        let on_disk = std::fs::read_to_string(dir.path().join("hostname.txt")).unwrap();
        assert_eq!(on_disk, "10.0.0.1");

        store.record_host("10.0.0.2").unwrap();
        let on_disk = std::fs::read_to_string(dir.path().join("hostname.txt")).unwrap();
        assert_eq!(on_disk, "10.0.0.2");
    }
}
