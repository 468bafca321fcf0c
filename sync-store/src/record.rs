//! Persisted snapshot layout.
//!
//! These records are the on-disk contract. They are converted to and from
//! the [`sync_types`] model explicitly so the model can evolve without
//! silently changing stored files.

use serde::{Deserialize, Serialize};
use sync_types::{Item, NodeId, ProfileKey, RelativePath, Root, Snapshot};

use crate::StoreError;

/// Layout version written by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Implementation tag identifying the producer of a record.
pub const IMPLEMENTATION: &str = "contentsync.snapshot";

/// Root descriptor of one persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Layout version.
    pub format_version: u32,
    /// Producer tag.
    pub implementation: String,
    /// Administrative domain.
    pub domain: String,
    /// Server within the domain.
    pub server: String,
    /// Profile name.
    pub name: String,
    /// One entry per content root.
    #[serde(default)]
    pub components: Vec<RootRecord>,
}

/// One persisted content root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootRecord {
    /// Root name.
    pub name: String,
    /// Items in path order.
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

/// One persisted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// `'/'`-delimited path relative to the root.
    pub relative_path: String,
    /// Node that authored this version.
    pub originating_node: String,
    /// Logical version.
    pub timestamp: u64,
    /// Directory flag.
    #[serde(default)]
    pub directory: bool,
    /// Tombstone flag.
    #[serde(default)]
    pub removed: bool,
}

/// Just enough of a record to check its version before full decoding.
#[derive(Debug, Deserialize)]
pub(crate) struct VersionProbe {
    pub format_version: u32,
}

impl From<&Snapshot> for SnapshotRecord {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            implementation: IMPLEMENTATION.to_string(),
            domain: snapshot.domain().to_string(),
            server: snapshot.server().to_string(),
            name: snapshot.name().to_string(),
            components: snapshot.roots().map(RootRecord::from).collect(),
        }
    }
}

impl From<&Root> for RootRecord {
    fn from(root: &Root) -> Self {
        Self {
            name: root.name().to_string(),
            items: root.items().map(ItemRecord::from).collect(),
        }
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            relative_path: item.relative_path().to_string(),
            originating_node: item.originating_node().to_string(),
            timestamp: item.timestamp(),
            directory: item.is_directory(),
            removed: item.is_removed(),
        }
    }
}

impl SnapshotRecord {
    /// Rebuild the snapshot model, validating every field.
    pub fn into_snapshot(self) -> Result<Snapshot, StoreError> {
        if self.format_version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: self.format_version,
                supported: FORMAT_VERSION,
            });
        }

        let name = self.name;
        let invalid = |reason: String| StoreError::Decode {
            name: name.clone(),
            reason,
        };

        if self.implementation != IMPLEMENTATION {
            return Err(invalid(format!(
                "unexpected implementation {:?}",
                self.implementation
            )));
        }

        let mut snapshot = Snapshot::new(ProfileKey::new(self.domain, self.server, name.clone()));
        for component in self.components {
            let mut root = Root::new(component.name);
            for record in component.items {
                let path = RelativePath::new(&record.relative_path)
                    .map_err(|e| invalid(e.to_string()))?;
                if root.contains(&path) {
                    return Err(invalid(format!(
                        "duplicate item {} in root {}",
                        path,
                        root.name()
                    )));
                }
                let node =
                    NodeId::new(record.originating_node).map_err(|e| invalid(e.to_string()))?;
                root.insert(Item::new(
                    path,
                    node,
                    record.timestamp,
                    record.directory,
                    record.removed,
                ));
            }
            snapshot
                .add_root(root)
                .map_err(|e| invalid(e.to_string()))?;
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let node = NodeId::new("localhost").unwrap();
        Snapshot::with_roots(
            ProfileKey::new("default", "localhost", "farm"),
            [Root::with_items(
                "farm",
                [
                    Item::directory(RelativePath::new("lib").unwrap(), node.clone(), 2),
                    Item::new(RelativePath::new("lib/a.jar").unwrap(), node, 3, false, true),
                ],
            )],
        )
        .unwrap()
    }

    #[test]
    fn record_mirrors_snapshot() {
        let record = SnapshotRecord::from(&sample());
        assert_eq!(record.format_version, FORMAT_VERSION);
        assert_eq!(record.implementation, IMPLEMENTATION);
        assert_eq!(record.components.len(), 1);
        assert_eq!(record.components[0].items[1].relative_path, "lib/a.jar");
        assert!(record.components[0].items[1].removed);
        assert!(record.components[0].items[0].directory);
    }

    #[test]
    fn record_converts_back() {
        let original = sample();
        let restored = SnapshotRecord::from(&original).into_snapshot().unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn future_version_rejected() {
        let mut record = SnapshotRecord::from(&sample());
        record.format_version = 2;
        assert!(matches!(
            record.into_snapshot(),
            Err(StoreError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn foreign_implementation_rejected() {
        let mut record = SnapshotRecord::from(&sample());
        record.implementation = "something.else".into();
        assert!(matches!(record.into_snapshot(), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn duplicate_root_rejected() {
        let mut record = SnapshotRecord::from(&sample());
        record.components.push(record.components[0].clone());
        assert!(matches!(record.into_snapshot(), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn duplicate_item_rejected() {
        let mut record = SnapshotRecord::from(&sample());
        let dup = record.components[0].items[0].clone();
        record.components[0].items.push(dup);
        assert!(matches!(record.into_snapshot(), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn escaping_path_rejected() {
        let mut record = SnapshotRecord::from(&sample());
        record.components[0].items[0].relative_path = "../outside".into();
        assert!(matches!(record.into_snapshot(), Err(StoreError::Decode { .. })));
    }
}
