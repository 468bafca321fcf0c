//! Builds the current snapshot by walking content root directories.
//!
//! The scanner only reports what is on disk: every entry becomes a live
//! item whose timestamp is its modification time in milliseconds. Deleted
//! entries simply do not appear; spotting them is the generator's job.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use sync_types::{Item, NodeId, ProfileKey, RelativePath, Root, Snapshot, SnapshotError};
use walkdir::WalkDir;

use crate::config::RootConfig;

/// Errors raised while scanning.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A configured root directory does not exist.
    #[error("content root {name} not found at {path}")]
    MissingRoot {
        /// Root name.
        name: String,
        /// Configured directory.
        path: PathBuf,
    },

    /// Walking the directory tree failed.
    #[error("failed to walk {root}: {source}")]
    Walk {
        /// Root name.
        root: String,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// An entry's path could not be represented.
    #[error("unusable path {path} in root {root}")]
    UnusablePath {
        /// Root name.
        root: String,
        /// Offending path.
        path: PathBuf,
    },

    /// The snapshot model rejected the scanned data.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Walks content roots on behalf of one node.
#[derive(Debug, Clone)]
pub struct Scanner {
    node: NodeId,
}

impl Scanner {
    /// Create a scanner that attributes items to `node`.
    pub fn new(node: NodeId) -> Self {
        Self { node }
    }

    /// Scan every configured root into one snapshot.
    pub fn scan(&self, key: ProfileKey, roots: &[RootConfig]) -> Result<Snapshot, ScanError> {
        let mut snapshot = Snapshot::new(key);
        for root in roots {
            snapshot.add_root(self.scan_root(&root.name, &root.path)?)?;
        }
        Ok(snapshot)
    }

    /// Scan the directory `dir` into a root called `name`.
    pub fn scan_root(&self, name: &str, dir: &Path) -> Result<Root, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::MissingRoot {
                name: name.to_string(),
                path: dir.to_path_buf(),
            });
        }

        let mut root = Root::new(name);
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| ScanError::Walk {
                root: name.to_string(),
                source,
            })?;
            let path = relative_path(name, dir, entry.path())?;
            let metadata = entry.metadata().map_err(|source| ScanError::Walk {
                root: name.to_string(),
                source,
            })?;
            let timestamp = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);

            let item = if metadata.is_dir() {
                Item::directory(path, self.node.clone(), timestamp)
            } else {
                Item::file(path, self.node.clone(), timestamp)
            };
            root.insert(item);
        }

        tracing::debug!("Scanned root {} ({} items) at {}", name, root.len(), dir.display());
        Ok(root)
    }
}

fn relative_path(root: &str, dir: &Path, path: &Path) -> Result<RelativePath, ScanError> {
    let unusable = || ScanError::UnusablePath {
        root: root.to_string(),
        path: path.to_path_buf(),
    };
    let relative = path.strip_prefix(dir).map_err(|_| unusable())?;
    // `\` is a separator in the path model, so a name holding one cannot
    // be represented as a single element.
    let elements = relative
        .components()
        .map(|c| match c.as_os_str().to_str() {
            Some(element) if !element.contains('\\') => Ok(element),
            _ => Err(unusable()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RelativePath::from_elements(elements)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn node() -> NodeId {
        NodeId::new("localhost").unwrap()
    }

    #[test]
    fn scan_root_records_hierarchy() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app.war/WEB-INF")).unwrap();
        fs::write(dir.path().join("app.war/WEB-INF/web.xml"), b"<web-app/>").unwrap();
        fs::write(dir.path().join("ds.xml"), b"<datasources/>").unwrap();

        let root = Scanner::new(node()).scan_root("farm", dir.path()).unwrap();

        let paths: Vec<String> = root.items().map(|i| i.relative_path().to_string()).collect();
        assert_eq!(
            paths,
            vec!["app.war", "app.war/WEB-INF", "app.war/WEB-INF/web.xml", "ds.xml"]
        );

        let war = root.item_at(&RelativePath::new("app.war").unwrap()).unwrap();
        assert!(war.is_directory());
        let web = root
            .item_at(&RelativePath::new("app.war/WEB-INF/web.xml").unwrap())
            .unwrap();
        assert!(!web.is_directory());
        assert!(!web.is_removed());
        assert_eq!(web.originating_node(), &node());
        assert!(web.timestamp() > 0);
    }

    #[test]
    fn empty_directory_gives_empty_root() {
        let dir = tempdir().unwrap();
        let root = Scanner::new(node()).scan_root("deploy", dir.path()).unwrap();
        assert!(root.is_empty());
        assert_eq!(root.name(), "deploy");
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let err = Scanner::new(node())
            .scan_root("farm", &dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, ScanError::MissingRoot { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn backslash_in_name_is_unusable_not_remapped() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/b"), b"real").unwrap();
        fs::write(dir.path().join("a\\b"), b"lookalike").unwrap();

        let err = Scanner::new(node()).scan_root("farm", dir.path()).unwrap_err();
        match err {
            ScanError::UnusablePath { root, path } => {
                assert_eq!(root, "farm");
                assert_eq!(path, dir.path().join("a\\b"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn dot_dot_backslash_name_is_unusable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("..\\x"), b"x").unwrap();

        let err = Scanner::new(node()).scan_root("farm", dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::UnusablePath { .. }), "{err}");
    }

    #[test]
    fn scan_builds_every_root() {
        let farm = tempdir().unwrap();
        let deploy = tempdir().unwrap();
        fs::write(farm.path().join("item1"), b"1").unwrap();

        let roots = vec![
            RootConfig {
                name: "farm".into(),
                path: farm.path().to_path_buf(),
            },
            RootConfig {
                name: "deploy".into(),
                path: deploy.path().to_path_buf(),
            },
        ];
        let key = ProfileKey::new("default", "localhost", "farm");
        let snapshot = Scanner::new(node()).scan(key.clone(), &roots).unwrap();

        assert_eq!(snapshot.key(), &key);
        assert_eq!(snapshot.root_names().collect::<Vec<_>>(), vec!["deploy", "farm"]);
        assert_eq!(snapshot.item_count(), 1);
    }
}
