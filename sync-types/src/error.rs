//! Error types for the snapshot model.

use thiserror::Error;

/// Errors that can occur while building snapshot values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// A relative path could not be normalized
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The path as given by the caller.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A node identifier was empty
    #[error("node id must not be empty")]
    EmptyNodeId,

    /// A root with the same name is already part of the snapshot
    #[error("duplicate root: {0}")]
    DuplicateRoot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SnapshotError::DuplicateRoot("farm".into());
        assert_eq!(err.to_string(), "duplicate root: farm");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SnapshotError>();
    }
}
