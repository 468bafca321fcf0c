//! Snapshots: the full reconciliation unit for one node/profile.

use std::collections::BTreeMap;
use std::fmt;

use crate::{Root, SnapshotError};

/// Natural key of a snapshot: domain, server and profile name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileKey {
    /// Administrative domain.
    pub domain: String,
    /// Server (node) within the domain.
    pub server: String,
    /// Profile name.
    pub name: String,
}

impl ProfileKey {
    /// Create a new key.
    pub fn new(
        domain: impl Into<String>,
        server: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            server: server.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.domain, self.server, self.name)
    }
}

/// The observed state of a profile's content roots at one point in time.
///
/// Equality is structural: two snapshots are equal when their keys match
/// and every root holds exactly the same items, field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    key: ProfileKey,
    roots: BTreeMap<String, Root>,
}

impl Snapshot {
    /// Create a snapshot with no roots.
    pub fn new(key: ProfileKey) -> Self {
        Self {
            key,
            roots: BTreeMap::new(),
        }
    }

    /// Create a snapshot from a set of roots.
    ///
    /// Fails if two roots share a name.
    pub fn with_roots(
        key: ProfileKey,
        roots: impl IntoIterator<Item = Root>,
    ) -> Result<Self, SnapshotError> {
        let mut snapshot = Self::new(key);
        for root in roots {
            snapshot.add_root(root)?;
        }
        Ok(snapshot)
    }

    /// An empty snapshot carrying the same key.
    pub fn empty_like(&self) -> Self {
        Self::new(self.key.clone())
    }

    /// The natural key.
    pub fn key(&self) -> &ProfileKey {
        &self.key
    }

    /// Administrative domain.
    pub fn domain(&self) -> &str {
        &self.key.domain
    }

    /// Server within the domain.
    pub fn server(&self) -> &str {
        &self.key.server
    }

    /// Profile name.
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Add a root. Root names are unique within a snapshot.
    pub fn add_root(&mut self, root: Root) -> Result<(), SnapshotError> {
        if self.roots.contains_key(root.name()) {
            return Err(SnapshotError::DuplicateRoot(root.name().to_string()));
        }
        self.roots.insert(root.name().to_string(), root);
        Ok(())
    }

    /// Get the root named `name`, creating an empty one if needed.
    pub fn root_mut_or_insert(&mut self, name: &str) -> &mut Root {
        self.roots
            .entry(name.to_string())
            .or_insert_with(|| Root::new(name))
    }

    /// Look up a root by name.
    pub fn root(&self, name: &str) -> Option<&Root> {
        self.roots.get(name)
    }

    /// Look up a root by name for mutation.
    pub fn root_mut(&mut self, name: &str) -> Option<&mut Root> {
        self.roots.get_mut(name)
    }

    /// Remove and return a root.
    pub fn remove_root(&mut self, name: &str) -> Option<Root> {
        self.roots.remove(name)
    }

    /// Iterate over roots in name order.
    pub fn roots(&self) -> impl Iterator<Item = &Root> + '_ {
        self.roots.values()
    }

    /// Root names in order.
    pub fn root_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.roots.keys().map(String::as_str)
    }

    /// Total number of items across all roots.
    pub fn item_count(&self) -> usize {
        self.roots.values().map(Root::len).sum()
    }
}
