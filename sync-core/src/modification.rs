//! Modification records produced by reconciliation.

use std::fmt;

use sync_types::Item;

/// Direction of a content transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModificationKind {
    /// Send local content outward to the cluster.
    PushToCluster,
    /// Fetch cluster content to restore or replace local state.
    PullFromCluster,
}

impl ModificationKind {
    /// Stable upper-case name, as used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PushToCluster => "PUSH_TO_CLUSTER",
            Self::PullFromCluster => "PULL_FROM_CLUSTER",
        }
    }
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned content transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    kind: ModificationKind,
    root: String,
    item: Item,
}

impl Modification {
    /// Plan a push of `item` in `root`.
    pub fn push(root: impl Into<String>, item: Item) -> Self {
        Self {
            kind: ModificationKind::PushToCluster,
            root: root.into(),
            item,
        }
    }

    /// Plan a pull of `item` in `root`.
    pub fn pull(root: impl Into<String>, item: Item) -> Self {
        Self {
            kind: ModificationKind::PullFromCluster,
            root: root.into(),
            item,
        }
    }

    /// Transfer direction.
    pub fn kind(&self) -> ModificationKind {
        self.kind
    }

    /// Name of the root the item belongs to.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The item to transfer.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Split into its parts.
    pub fn into_parts(self) -> (ModificationKind, String, Item) {
        (self.kind, self.root, self.item)
    }
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} (node={}, ts={}",
            self.kind,
            self.root,
            self.item.relative_path(),
            self.item.originating_node(),
            self.item.timestamp()
        )?;
        if self.item.is_directory() {
            f.write_str(", dir")?;
        }
        if self.item.is_removed() {
            f.write_str(", removed")?;
        }
        f.write_str(")")
    }
}

/// Ordered sequence of modifications.
///
/// Every pull precedes every push. Executors must carry out each entry in
/// order and must not drop any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    modifications: Vec<Modification>,
}

impl Plan {
    pub(crate) fn from_passes(pulls: Vec<Modification>, pushes: Vec<Modification>) -> Self {
        let mut modifications = pulls;
        modifications.extend(pushes);
        Self { modifications }
    }

    /// Check if nothing needs to be transferred.
    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }

    /// Number of planned transfers.
    pub fn len(&self) -> usize {
        self.modifications.len()
    }

    /// Iterate in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Modification> {
        self.modifications.iter()
    }

    /// The planned pulls, in order.
    pub fn pulls(&self) -> impl Iterator<Item = &Modification> + '_ {
        self.iter()
            .filter(|m| m.kind == ModificationKind::PullFromCluster)
    }

    /// The planned pushes, in order.
    pub fn pushes(&self) -> impl Iterator<Item = &Modification> + '_ {
        self.iter()
            .filter(|m| m.kind == ModificationKind::PushToCluster)
    }

    /// The modifications as a slice.
    pub fn as_slice(&self) -> &[Modification] {
        &self.modifications
    }

    /// Take ownership of the modifications.
    pub fn into_vec(self) -> Vec<Modification> {
        self.modifications
    }
}

impl IntoIterator for Plan {
    type Item = Modification;
    type IntoIter = std::vec::IntoIter<Modification>;

    fn into_iter(self) -> Self::IntoIter {
        self.modifications.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Modification;
    type IntoIter = std::slice::Iter<'a, Modification>;

    fn into_iter(self) -> Self::IntoIter {
        self.modifications.iter()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modification in &self.modifications {
            writeln!(f, "{}", modification)?;
        }
        Ok(())
    }
}
