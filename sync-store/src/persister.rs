//! Named snapshot storage.
//!
//! This module provides a trait for storing snapshots keyed by name, plus a
//! directory-backed implementation and a memory-based one for tests and
//! embedding.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use sync_types::Snapshot;

use crate::codec::Format;
use crate::StoreError;

/// Trait for durable snapshot storage.
///
/// `load(name)` after `store(name, x)` returns a snapshot equal to `x`.
/// Implementations perform blocking I/O.
pub trait SnapshotPersister: Send + Sync {
    /// Store `snapshot` under `name`, replacing any previous value.
    fn store(&self, name: &str, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Load the snapshot most recently stored under `name`.
    ///
    /// Returns `NotFound` if nothing was stored, `Decode` if the stored
    /// bytes are corrupt.
    fn load(&self, name: &str) -> Result<Snapshot, StoreError>;

    /// Check if a snapshot is stored under `name`.
    fn exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Remove the snapshot stored under `name`.
    ///
    /// Returns `Ok(true)` if removed, `Ok(false)` if not found.
    fn remove(&self, name: &str) -> Result<bool, StoreError>;

    /// Names of all stored snapshots, sorted.
    fn names(&self) -> Result<Vec<String>, StoreError>;
}

/// Check that `name` can safely become a file name.
fn validate_name(name: &str) -> Result<(), StoreError> {
    let invalid = |reason| StoreError::InvalidName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("must not start with '.'"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(invalid("only ASCII letters, digits, '.', '_' and '-' are allowed"));
    }
    Ok(())
}

/// Stores each snapshot as one file in a directory.
///
/// The file for `name` is `<directory>/<name>.<ext>`, where the extension
/// follows the [`Format`]. Writes go to a temporary sibling file that is
/// then renamed over the target, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct FilePersister {
    directory: PathBuf,
    format: Format,
}

impl FilePersister {
    /// Create a persister rooted at `directory`.
    ///
    /// The directory is created on first store.
    pub fn new(directory: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    /// Directory holding the snapshot files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Encoding in use.
    pub fn format(&self) -> Format {
        self.format
    }

    /// File that holds the snapshot stored under `name`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self
            .directory
            .join(format!("{}.{}", name, self.format.extension())))
    }

}

impl SnapshotPersister for FilePersister {
    fn store(&self, name: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        let bytes = self.format.encode(snapshot)?;

        fs::create_dir_all(&self.directory).map_err(|e| StoreError::io(&self.directory, e))?;

        // Random temp name per writer; fsync before the rename makes it durable.
        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", name))
            .suffix(".tmp")
            .tempfile_in(&self.directory)
            .map_err(|e| StoreError::io(&self.directory, e))?;
        temp.as_file_mut()
            .write_all(&bytes)
            .map_err(|e| StoreError::io(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(temp.path(), e))?;
        temp.persist(&path)
            .map_err(|e| StoreError::io(&path, e.error))?;

        tracing::debug!(
            "Stored snapshot {} ({} roots, {} items, {} bytes) at {}",
            name,
            snapshot.roots().count(),
            snapshot.item_count(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Snapshot, StoreError> {
        let path = self.path_for(name)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        let snapshot = self.format.decode(name, &bytes).map_err(|e| {
            tracing::warn!("Snapshot file {} is unreadable: {}", path.display(), e);
            e
        })?;
        tracing::debug!(
            "Loaded snapshot {} ({} items) from {}",
            name,
            snapshot.item_count(),
            path.display()
        );
        Ok(snapshot)
    }

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.path_for(name)?.is_file())
    }

    fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn names(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.directory, e)),
        };

        let suffix = format!(".{}", self.format.extension());
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.directory, e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name.strip_suffix(&suffix) {
                if validate_name(name).is_ok() && entry.path().is_file() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// In-memory snapshot store for testing.
///
/// Snapshots are held encoded, so loads exercise the same codec as the
/// file store. Not persistent - all data is lost when the last clone is
/// dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryPersister {
    format: Format,
    snapshots: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryPersister {
    /// Create a new empty store using JSON encoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty store using `format`.
    pub fn with_format(format: Format) -> Self {
        Self {
            format,
            snapshots: Arc::default(),
        }
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Overwrite the raw bytes stored under `name`.
    ///
    /// Useful for simulating corruption.
    pub fn put_raw(&self, name: &str, bytes: Vec<u8>) {
        self.lock().insert(name.to_string(), bytes);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.snapshots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotPersister for MemoryPersister {
    fn store(&self, name: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        validate_name(name)?;
        let bytes = self.format.encode(snapshot)?;
        self.lock().insert(name.to_string(), bytes);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Snapshot, StoreError> {
        validate_name(name)?;
        let bytes = self
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
            })?;
        self.format.decode(name, &bytes)
    }

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        validate_name(name)?;
        Ok(self.lock().contains_key(name))
    }

    fn remove(&self, name: &str) -> Result<bool, StoreError> {
        validate_name(name)?;
        Ok(self.lock().remove(name).is_some())
    }

    fn names(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
