//! # sync-store
//!
//! Durable snapshot persistence for contentsync.
//!
//! A base snapshot must survive process restarts and come back
//! indistinguishable from what was stored. This crate provides:
//! - [`SnapshotRecord`] - the explicit, versioned persisted layout
//! - [`Format`] - JSON or MessagePack encoding of that layout
//! - [`SnapshotPersister`] - store/load keyed by name, with a
//!   file-backed and an in-memory implementation
//!
//! ## Persisted Layout
//!
//! ```text
//! SnapshotRecord { format_version, implementation, domain, server, name }
//!   └── components: [RootRecord { name }]
//!         └── items: [ItemRecord { relative_path, originating_node,
//!                                  timestamp, directory, removed }]
//! ```
//!
//! All persister calls perform blocking I/O. Async callers should run them
//! on a blocking pool.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod codec;
mod error;
mod persister;
mod record;

pub use codec::Format;
pub use error::StoreError;
pub use persister::{FilePersister, MemoryPersister, SnapshotPersister};
pub use record::{ItemRecord, RootRecord, SnapshotRecord, FORMAT_VERSION, IMPLEMENTATION};
