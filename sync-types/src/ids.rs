//! Identity and provenance types for contentsync.

use std::fmt;
use std::str::FromStr;

use crate::SnapshotError;

/// A normalized path relative to a content root.
///
/// Stored as an ordered sequence of path elements. `'/'` and `'\\'` both
/// separate elements; empty and `.` elements are dropped and `..` removes
/// the preceding element. A path may never climb above its root.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath(Vec<String>);

impl RelativePath {
    /// Parse and normalize a `'/'`-delimited path.
    pub fn new(path: &str) -> Result<Self, SnapshotError> {
        if path.contains('\0') {
            return Err(SnapshotError::InvalidPath {
                path: path.to_string(),
                reason: "contains NUL",
            });
        }

        let mut elements: Vec<String> = Vec::new();
        for element in path.split(['/', '\\']) {
            match element {
                "" | "." => {}
                ".." => {
                    if elements.pop().is_none() {
                        return Err(SnapshotError::InvalidPath {
                            path: path.to_string(),
                            reason: "escapes the content root",
                        });
                    }
                }
                other => elements.push(other.to_string()),
            }
        }
        Ok(Self(elements))
    }

    /// Build a path from elements that are already normalized.
    ///
    /// Each element goes through the same normalization as [`new`](Self::new).
    pub fn from_elements<I, S>(elements: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = elements
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("/");
        Self::new(&joined)
    }

    /// The empty path (the root itself).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The path elements, in order.
    pub fn elements(&self) -> &[String] {
        &self.0
    }

    /// Check if this is the empty path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of path elements.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The last element, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The enclosing directory. `None` for the empty path.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Append one element, normalizing it.
    pub fn join(&self, element: &str) -> Result<Self, SnapshotError> {
        let mut joined = self.to_string();
        joined.push('/');
        joined.push_str(element);
        Self::new(&joined)
    }

    /// Check if `prefix` is an ancestor of (or equal to) this path.
    pub fn starts_with(&self, prefix: &RelativePath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl FromStr for RelativePath {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl fmt::Debug for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelativePath({})", self)
    }
}

/// Identifier of the cluster member that authored an item version.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from a non-empty name.
    pub fn new(id: impl Into<String>) -> Result<Self, SnapshotError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SnapshotError::EmptyNodeId);
        }
        Ok(Self(id))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_splits_on_slash() {
        let path = RelativePath::new("deploy/app.war/WEB-INF").unwrap();
        assert_eq!(path.elements(), &["deploy", "app.war", "WEB-INF"]);
        assert_eq!(path.to_string(), "deploy/app.war/WEB-INF");
    }

    #[test]
    fn path_drops_empty_and_dot_elements() {
        let path = RelativePath::new("/deploy//./app.war/").unwrap();
        assert_eq!(path.to_string(), "deploy/app.war");
    }

    #[test]
    fn path_accepts_backslash_separators() {
        let path = RelativePath::new("deploy\\lib\\a.jar").unwrap();
        assert_eq!(path.elements(), &["deploy", "lib", "a.jar"]);
    }

    #[test]
    fn path_resolves_parent_elements() {
        let path = RelativePath::new("deploy/tmp/../app.war").unwrap();
        assert_eq!(path.to_string(), "deploy/app.war");
    }

    #[test]
    fn path_cannot_escape_root() {
        let result = RelativePath::new("../etc/passwd");
        assert!(matches!(result, Err(SnapshotError::InvalidPath { .. })));
    }

    #[test]
    fn path_rejects_nul() {
        assert!(RelativePath::new("a\0b").is_err());
    }

    #[test]
    fn empty_string_is_root_path() {
        let path = RelativePath::new("").unwrap();
        assert!(path.is_empty());
        assert_eq!(path, RelativePath::root());
        assert!(path.parent().is_none());
        assert!(path.file_name().is_none());
    }

    #[test]
    fn parent_and_file_name() {
        let path = RelativePath::new("a/b/c").unwrap();
        assert_eq!(path.file_name(), Some("c"));
        assert_eq!(path.parent().unwrap().to_string(), "a/b");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn join_and_starts_with() {
        let dir = RelativePath::new("a/b").unwrap();
        let child = dir.join("c.txt").unwrap();
        assert_eq!(child.to_string(), "a/b/c.txt");
        assert!(child.starts_with(&dir));
        assert!(!dir.starts_with(&child));
        assert!(child.starts_with(&RelativePath::root()));
    }

    #[test]
    fn from_elements_matches_parse() {
        let a = RelativePath::from_elements(["deploy", "app.war"]).unwrap();
        let b: RelativePath = "deploy/app.war".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn paths_order_by_elements() {
        let a = RelativePath::new("a/z").unwrap();
        let b = RelativePath::new("b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn node_id_rejects_blank() {
        assert_eq!(NodeId::new("  "), Err(SnapshotError::EmptyNodeId));
        assert_eq!(NodeId::new("localhost").unwrap().as_str(), "localhost");
    }
}
