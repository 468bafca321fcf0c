//! Error types for sync-store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while storing or loading snapshots.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Nothing has been stored under this name.
    #[error("snapshot not found: {name}")]
    NotFound {
        /// Name that was looked up.
        name: String,
    },

    /// The name cannot be mapped to a storage location.
    #[error("invalid snapshot name {name:?}: {reason}")]
    InvalidName {
        /// Name as given.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Underlying I/O failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be serialized.
    #[error("failed to encode snapshot {name}: {reason}")]
    Encode {
        /// Snapshot name.
        name: String,
        /// Serializer message.
        reason: String,
    },

    /// Stored bytes are corrupt or do not describe a valid snapshot.
    #[error("failed to decode snapshot {name}: {reason}")]
    Decode {
        /// Snapshot name.
        name: String,
        /// Deserializer or validation message.
        reason: String,
    },

    /// Stored record was written by an incompatible version.
    #[error("unsupported snapshot format version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the record.
        found: u32,
        /// Version this build reads.
        supported: u32,
    },
}

impl StoreError {
    /// Check if this error means "nothing stored yet".
    ///
    /// Callers commonly treat that case as an empty base snapshot.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
