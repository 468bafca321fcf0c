//! Configuration management for contentsync.
//!
//! Configuration is loaded from a TOML file (default:
//! `<data-dir>/contentsync.toml`). Every table is optional.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sync_core::{Policy, PolicyError};
use sync_store::{FilePersister, Format};
use sync_types::{NodeId, ProfileKey, SnapshotError};

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "contentsync.toml";

/// Root configuration, as written in the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Identity of this node and profile.
    #[serde(default)]
    pub node: NodeConfig,
    /// Snapshot storage.
    #[serde(default)]
    pub store: StoreConfig,
    /// Removal-trust flags by name. Unknown names are rejected when the
    /// policy is built.
    #[serde(default)]
    pub policy: BTreeMap<String, bool>,
    /// Content roots to scan.
    #[serde(default)]
    pub roots: Vec<RootConfig>,
}

/// Node identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Administrative domain (default: "default").
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Server name (default: "localhost").
    #[serde(default = "default_server")]
    pub server: String,
    /// Profile name (default: "default").
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Originating node recorded on scanned items (default: server name).
    pub node_id: Option<String>,
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Directory for snapshot files (default: `<data-dir>/snapshots`).
    pub directory: Option<PathBuf>,
    /// Encoding of snapshot files (default: json).
    #[serde(default)]
    pub format: Format,
}

/// One content root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RootConfig {
    /// Root name, unique within the profile.
    pub name: String,
    /// Directory holding the root's content.
    pub path: PathBuf,
}

// Default value functions
fn default_domain() -> String {
    "default".to_string()
}

fn default_server() -> String {
    "localhost".to_string()
}

fn default_profile() -> String {
    "default".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            server: default_server(),
            profile: default_profile(),
            node_id: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load `explicit` if given, else `<data_dir>/contentsync.toml` if it
    /// exists, else defaults.
    pub fn locate(explicit: Option<&Path>, data_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = data_dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Build the removal policy, applying `overrides` (`key=value`) last.
    pub fn policy(&self, overrides: &[String]) -> Result<Policy, ConfigError> {
        let mut policy = Policy::from_settings(self.policy.iter().map(|(k, v)| (k, *v)))?;
        for setting in overrides {
            policy.apply(setting)?;
        }
        Ok(policy)
    }
}

/// Fully resolved settings used by the commands.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Natural key of this node's snapshot.
    pub key: ProfileKey,
    /// Originating node for scanned items.
    pub node: NodeId,
    /// Removal policy.
    pub policy: Policy,
    /// Snapshot storage.
    pub persister: FilePersister,
    /// Content roots.
    pub roots: Vec<RootConfig>,
}

impl AppConfig {
    /// Resolve a parsed [`Config`] against the data directory.
    pub fn resolve(
        config: Config,
        data_dir: &Path,
        policy_overrides: &[String],
    ) -> Result<Self, ConfigError> {
        let policy = config.policy(policy_overrides)?;

        let node = config
            .node
            .node_id
            .clone()
            .unwrap_or_else(|| config.node.server.clone());
        let node = NodeId::new(node)?;

        let mut seen = std::collections::BTreeSet::new();
        for root in &config.roots {
            if !seen.insert(root.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "root {:?} is configured twice",
                    root.name
                )));
            }
        }

        let directory = config
            .store
            .directory
            .clone()
            .unwrap_or_else(|| data_dir.join("snapshots"));

        Ok(Self {
            key: ProfileKey::new(config.node.domain, config.node.server, config.node.profile),
            node,
            policy,
            persister: FilePersister::new(directory, config.store.format),
            roots: config.roots,
        })
    }

    /// Name the base snapshot is stored under.
    ///
    /// Derived from the profile key; characters that are not valid in a
    /// snapshot name become `_`.
    pub fn base_name(&self) -> String {
        let raw = format!("{}-{}-{}", self.key.domain, self.key.server, self.key.name);
        let mut name: String = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if name.starts_with('.') {
            name.replace_range(..1, "_");
        }
        name
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// The `[policy]` table or an override is not usable.
    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),
    /// Node identity is not usable.
    #[error("invalid node identity: {0}")]
    Node(#[from] SnapshotError),
    /// Any other inconsistency.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
