//! # FamSync Fragment Store
//!
//! Durable, append-only storage of binary update fragments, partitioned by
//! (group, document key).
//!
//! This crate provides:
//! - The [`FragmentStore`] trait: the storage contract the synchronization
//!   service is written against
//! - [`MemoryFragmentStore`]: in-memory store for tests and ephemeral servers
//! - [`FileFragmentStore`]: one framed log file per document, for persistence
//!
//! # Model
//!
//! A document's durable state is entirely its fragment log. Fragments are
//! opaque byte blobs: the store never interprets them, never merges them, and
//! never deletes them. A document is implicitly created by its first append.
//!
//! # Invariants
//!
//! - `append` is atomic with respect to concurrent appenders on the same key
//! - `load_all` returns fragments in append order and never observes a
//!   partially written fragment
//! - a document that has never been written reads back as an empty log, not
//!   an error

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod log;
mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileFragmentStore;
pub use log::{Fragment, FragmentStore};
pub use memory::MemoryFragmentStore;
