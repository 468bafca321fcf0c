//! # sync-core
//!
//! Pure reconciliation logic for contentsync (no I/O, instant tests).
//!
//! This crate decides which content transfers bring a node's repository back
//! into agreement with a reference snapshot, without touching the network or
//! the disk.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take snapshots and produce a
//! plan without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about push/pull decisions
//!
//! Executing the plan (fetching content from the cluster, pushing local
//! content outward) is the caller's job.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod generator;
pub mod modification;
pub mod policy;

pub use generator::{Generator, Mode};
pub use modification::{Modification, ModificationKind, Plan};
pub use policy::{Policy, PolicyError};
