//! # sync-types
//!
//! Snapshot data model for contentsync.
//!
//! This crate provides the value types shared by every contentsync crate:
//! - [`RelativePath`], [`NodeId`] - Identity and provenance types
//! - [`Item`] - One file or directory known to a content root
//! - [`Root`] - A named, path-indexed collection of items
//! - [`Snapshot`] - The full reconciliation unit for one node/profile
//! - [`SnapshotError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod item;
mod root;
mod snapshot;

pub use error::SnapshotError;
pub use ids::{NodeId, RelativePath};
pub use item::Item;
pub use root::{Content, Root};
pub use snapshot::{ProfileKey, Snapshot};
