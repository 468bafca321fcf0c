//! A single entry of a content root.

use crate::{NodeId, RelativePath};

/// One file or directory known to a content root.
///
/// Items are immutable values: a changed entry is represented by a new
/// `Item` with a newer timestamp. `PartialEq` compares every field; diffing
/// keys on [`relative_path`](Self::relative_path) alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    relative_path: RelativePath,
    originating_node: NodeId,
    timestamp: u64,
    directory: bool,
    removed: bool,
}

impl Item {
    /// Create a regular file item.
    pub fn file(relative_path: RelativePath, originating_node: NodeId, timestamp: u64) -> Self {
        Self {
            relative_path,
            originating_node,
            timestamp,
            directory: false,
            removed: false,
        }
    }

    /// Create a directory item.
    pub fn directory(
        relative_path: RelativePath,
        originating_node: NodeId,
        timestamp: u64,
    ) -> Self {
        Self {
            directory: true,
            ..Self::file(relative_path, originating_node, timestamp)
        }
    }

    /// Create an item with every field given explicitly.
    pub fn new(
        relative_path: RelativePath,
        originating_node: NodeId,
        timestamp: u64,
        directory: bool,
        removed: bool,
    ) -> Self {
        Self {
            relative_path,
            originating_node,
            timestamp,
            directory,
            removed,
        }
    }

    /// Return a tombstone for this item authored by `node` at `timestamp`.
    pub fn tombstone(&self, node: NodeId, timestamp: u64) -> Self {
        Self {
            relative_path: self.relative_path.clone(),
            originating_node: node,
            timestamp,
            directory: self.directory,
            removed: true,
        }
    }

    /// Path relative to the owning root.
    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// Cluster member that authored this version.
    pub fn originating_node(&self) -> &NodeId {
        &self.originating_node
    }

    /// Logical version of this entry.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Check if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.directory
    }

    /// Check if this entry is a tombstone.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Check if `other` describes the same entry (same path).
    pub fn same_path(&self, other: &Item) -> bool {
        self.relative_path == other.relative_path
    }
}
