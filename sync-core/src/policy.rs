//! Removal-trust policy for reconciliation.
//!
//! When an item present in the base snapshot is missing from the modified
//! snapshot, the policy decides whether that disappearance is a genuine
//! local removal (nothing to do) or suspect (plan a pull from the cluster to
//! restore it). The decision is made separately for join and merge mode.
//!
//! Unset flags trust removals. Only an explicit `false` forces compensation.

use thiserror::Error;

use crate::generator::Mode;

/// Setting key for [`Policy::allow_join_removals`].
pub const JOIN_REMOVALS: &str = "allow_join_removals";
/// Setting key for [`Policy::allow_merge_removals`].
pub const MERGE_REMOVALS: &str = "allow_merge_removals";

/// Errors raised while building a policy from named settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The setting name is not a policy flag.
    #[error("unknown policy setting: {0}")]
    UnknownSetting(String),

    /// The value could not be read as a boolean.
    #[error("invalid value for {key}: {value:?} (expected true or false)")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// Value as given.
        value: String,
    },

    /// The setting was not in `key=value` form.
    #[error("malformed policy setting {0:?} (expected key=value)")]
    Malformed(String),
}

/// Decides whether apparent local removals are trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policy {
    allow_join_removals: Option<bool>,
    allow_merge_removals: Option<bool>,
}

impl Policy {
    /// A policy with both flags unset (removals trusted).
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that compensates every removal in both modes.
    pub fn strict() -> Self {
        Self::new()
            .with_join_removals(false)
            .with_merge_removals(false)
    }

    /// Set the join-mode flag.
    pub fn with_join_removals(mut self, allow: bool) -> Self {
        self.allow_join_removals = Some(allow);
        self
    }

    /// Set the merge-mode flag.
    pub fn with_merge_removals(mut self, allow: bool) -> Self {
        self.allow_merge_removals = Some(allow);
        self
    }

    /// Whether removals are trusted while joining the cluster.
    pub fn allow_join_removals(&self) -> bool {
        self.allow_join_removals.unwrap_or(true)
    }

    /// Whether removals are trusted while merging with a peer.
    pub fn allow_merge_removals(&self) -> bool {
        self.allow_merge_removals.unwrap_or(true)
    }

    /// The flag that applies to `mode`.
    pub fn allows_removals(&self, mode: &Mode) -> bool {
        match mode {
            Mode::Join { .. } => self.allow_join_removals(),
            Mode::Merge => self.allow_merge_removals(),
        }
    }

    /// Set a flag by name.
    pub fn set(&mut self, key: &str, allow: bool) -> Result<(), PolicyError> {
        match key {
            JOIN_REMOVALS => self.allow_join_removals = Some(allow),
            MERGE_REMOVALS => self.allow_merge_removals = Some(allow),
            other => return Err(PolicyError::UnknownSetting(other.to_string())),
        }
        Ok(())
    }

    /// Apply a `key=value` setting, e.g. `allow_join_removals=false`.
    pub fn apply(&mut self, setting: &str) -> Result<(), PolicyError> {
        let (key, value) = setting
            .split_once('=')
            .ok_or_else(|| PolicyError::Malformed(setting.to_string()))?;
        let key = key.trim();
        let value = value.trim();
        let allow = match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => true,
            "false" | "no" | "off" => false,
            _ => {
                return Err(PolicyError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
        };
        self.set(key, allow)
    }

    /// Build a policy from named settings, rejecting unknown names.
    pub fn from_settings<I, K>(settings: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let mut policy = Self::new();
        for (key, allow) in settings {
            policy.set(key.as_ref(), allow)?;
        }
        Ok(policy)
    }
}
