//! Reconciliation of a base snapshot against a modified snapshot.
//!
//! The generator compares two snapshots root by root and produces a
//! [`Plan`]: pulls for removals the policy does not trust, then pushes for
//! new or changed items. It is a pure function of its inputs.
//!
//! Two modes exist:
//! - **Merge**: two independently evolved peers with no trusted common
//!   ancestor (e.g. after a partition heals). Reads
//!   [`Policy::allow_merge_removals`].
//! - **Join**: a node reconciling its possibly stale state against the
//!   cluster's current view before participating. Carries the cluster's
//!   reference snapshot and reads [`Policy::allow_join_removals`].

use std::collections::BTreeSet;

use sync_types::{Root, Snapshot};

use crate::modification::{Modification, Plan};
use crate::policy::Policy;

/// Operating mode of a [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Peers with no shared recent history.
    Merge,
    /// Joining the cluster.
    Join {
        /// The cluster's authoritative state at the moment of joining.
        reference: Snapshot,
    },
}

/// Produces modification plans from snapshot pairs.
#[derive(Debug, Clone)]
pub struct Generator {
    policy: Policy,
    mode: Mode,
}

impl Generator {
    /// Create a generator in merge mode.
    pub fn merge(policy: Policy) -> Self {
        Self {
            policy,
            mode: Mode::Merge,
        }
    }

    /// Create a generator in join mode.
    ///
    /// `reference` does not change which items are planned; it is kept so
    /// the executor can decide where a pull is sourced from.
    pub fn join(policy: Policy, reference: Snapshot) -> Self {
        Self {
            policy,
            mode: Mode::Join { reference },
        }
    }

    /// The policy in use.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The operating mode.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The reference snapshot, in join mode.
    pub fn reference(&self) -> Option<&Snapshot> {
        match &self.mode {
            Mode::Join { reference } => Some(reference),
            Mode::Merge => None,
        }
    }

    /// Plan the transfers that bring `base` in line with `modified`.
    ///
    /// Roots are matched by name; a root missing on one side is compared
    /// against an empty root. Within the plan all pulls come first (root
    /// name order, then path order), followed by all pushes in the same
    /// order.
    pub fn reconcile(&self, base: &Snapshot, modified: &Snapshot) -> Plan {
        let allow_removals = self.policy.allows_removals(&self.mode);

        let names: BTreeSet<&str> = base.root_names().chain(modified.root_names()).collect();

        let mut pulls = Vec::new();
        let mut pushes = Vec::new();
        for name in names {
            let base_root = base.root(name);
            let modified_root = modified.root(name);

            if !allow_removals {
                if let Some(base_root) = base_root {
                    removal_pass(name, base_root, modified_root, &mut pulls);
                }
            }
            if let Some(modified_root) = modified_root {
                addition_pass(name, base_root, modified_root, &mut pushes);
            }
        }

        Plan::from_passes(pulls, pushes)
    }
}

/// Pull every base item whose path is missing from `modified`.
fn removal_pass(
    name: &str,
    base: &Root,
    modified: Option<&Root>,
    pulls: &mut Vec<Modification>,
) {
    for item in base.items() {
        let present = modified.is_some_and(|root| root.get(item.relative_path()).is_some());
        if !present {
            pulls.push(Modification::pull(name, item.clone()));
        }
    }
}

/// Push every modified item that is new, or differs from its base version.
fn addition_pass(
    name: &str,
    base: Option<&Root>,
    modified: &Root,
    pushes: &mut Vec<Modification>,
) {
    for item in modified.items() {
        let unchanged = base
            .and_then(|root| root.get(item.relative_path()))
            .is_some_and(|existing| existing == item);
        if !unchanged {
            pushes.push(Modification::push(name, item.clone()));
        }
    }
}
