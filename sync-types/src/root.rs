//! Content roots: named, path-indexed collections of items.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::{Item, RelativePath};

/// One logical content root (a deployment area or profile layer).
///
/// Items are keyed by their relative path, so the path index and the
/// collection cannot disagree: there is at most one item per path, and
/// removing an item through any interface (including [`Content`]) makes
/// later lookups of that path miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    name: String,
    items: BTreeMap<RelativePath, Item>,
}

impl Root {
    /// Create an empty root.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: BTreeMap::new(),
        }
    }

    /// Create a root pre-populated with `items`.
    ///
    /// Later items replace earlier ones with the same path.
    pub fn with_items(name: impl Into<String>, items: impl IntoIterator<Item = Item>) -> Self {
        let mut root = Self::new(name);
        root.extend(items);
        root
    }

    /// Name of this root, unique within a snapshot.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the root holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert an item, returning the one it replaced at the same path.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.relative_path().clone(), item)
    }

    /// Remove the item at `path`.
    pub fn remove(&mut self, path: &RelativePath) -> Option<Item> {
        self.items.remove(path)
    }

    /// Look up an item by normalized path.
    ///
    /// The empty path never matches.
    pub fn item_at(&self, path: &RelativePath) -> Option<&Item> {
        if path.is_empty() {
            return None;
        }
        self.items.get(path)
    }

    /// Exact lookup in the path index.
    ///
    /// Unlike [`item_at`](Self::item_at) this also finds an item stored
    /// under the empty path.
    pub fn get(&self, path: &RelativePath) -> Option<&Item> {
        self.items.get(path)
    }

    /// Check if an item exists at `path`.
    pub fn contains(&self, path: &RelativePath) -> bool {
        self.item_at(path).is_some()
    }

    /// Iterate over items in path order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }

    /// Mutable view over the collection with cursor-style removal.
    pub fn content(&mut self) -> Content<'_> {
        Content {
            items: &mut self.items,
            current: None,
            finished: false,
        }
    }

    /// Direct children of the directory at `dir`, in path order.
    ///
    /// Passing [`RelativePath::root`] lists top-level entries.
    pub fn children<'a>(&'a self, dir: &'a RelativePath) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .range((Bound::Excluded(dir.clone()), Bound::Unbounded))
            .take_while(move |(path, _)| path.starts_with(dir))
            .filter(move |(path, _)| path.depth() == dir.depth() + 1)
            .map(|(_, item)| item)
    }
}

impl Extend<Item> for Root {
    fn extend<T: IntoIterator<Item = Item>>(&mut self, iter: T) {
        for item in iter {
            self.insert(item);
        }
    }
}

/// Cursor over a root's items that supports removing the current item.
///
/// Removal goes through the root's map, so the path index is updated in
/// the same step.
///
/// ```
/// # use contentsync_types::{Item, NodeId, RelativePath, Root};
/// let node = NodeId::new("localhost").unwrap();
/// let mut root = Root::with_items("farm", [
///     Item::file(RelativePath::new("a").unwrap(), node.clone(), 1),
///     Item::file(RelativePath::new("b").unwrap(), node, 1),
/// ]);
/// let mut content = root.content();
/// while let Some(item) = content.next_item() {
///     if item.relative_path().to_string() == "a" {
///         content.remove();
///     }
/// }
/// assert!(root.item_at(&RelativePath::new("a").unwrap()).is_none());
/// ```
#[derive(Debug)]
pub struct Content<'a> {
    items: &'a mut BTreeMap<RelativePath, Item>,
    /// Path of the last item returned by `next_item`.
    current: Option<RelativePath>,
    finished: bool,
}

impl<'a> Content<'a> {
    /// Advance to the next item in path order.
    pub fn next_item(&mut self) -> Option<&Item> {
        if self.finished {
            return None;
        }
        let lower = match &self.current {
            Some(path) => Bound::Excluded(path.clone()),
            None => Bound::Unbounded,
        };
        match self.items.range((lower, Bound::Unbounded)).next() {
            Some((path, item)) => {
                self.current = Some(path.clone());
                Some(item)
            }
            None => {
                self.finished = true;
                None
            }
        }
    }

    /// Remove the item last returned by [`next_item`](Self::next_item).
    ///
    /// Returns `None` if there is no current item or it was already removed.
    pub fn remove(&mut self) -> Option<Item> {
        if self.finished {
            return None;
        }
        let path = self.current.as_ref()?;
        self.items.remove(path)
    }

    /// Keep only the items for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Item) -> bool,
    {
        self.items.retain(|_, item| keep(item));
    }

    /// Number of items remaining in the root.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the root is now empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
