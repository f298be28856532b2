//! Fragment store trait definition.

use crate::error::StoreResult;
use std::collections::BTreeMap;

/// An opaque update fragment.
///
/// Fragments are produced by the CRDT document engine (or by clients running
/// the same engine) and are immutable once appended. The store never inspects
/// their contents.
pub type Fragment = Vec<u8>;

/// Append-only, keyed storage of binary update fragments.
///
/// Stores are **opaque blob logs** partitioned by (group, document key).
/// The synchronization service owns all interpretation of fragment bytes;
/// stores do not understand CRDT updates, state vectors, or diffs.
///
/// # Invariants
///
/// - `append` durably adds one fragment to the end of the keyed log and is
///   atomic with respect to concurrent appenders on the same key: no fragment
///   is lost or partially written
/// - `load_all` returns exactly the previously appended fragments, in append
///   order, and observes a consistent per-document snapshot
/// - a key that has never been appended to reads back as an empty log
/// - fragments are never rewritten or removed
///
/// # Implementors
///
/// - [`crate::MemoryFragmentStore`] for tests and ephemeral use
/// - [`crate::FileFragmentStore`] for persistent storage
pub trait FragmentStore: Send + Sync {
    /// Appends `fragment` to the log for (`group`, `doc_key`).
    ///
    /// Creates the log if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying durability layer fails. The store
    /// performs no internal retry; retry policy belongs to the caller.
    fn append(&self, group: &str, doc_key: &str, fragment: &[u8]) -> StoreResult<()>;

    /// Returns all fragments for (`group`, `doc_key`) in append order.
    ///
    /// Returns an empty `Vec` (not an error) if the document has never been
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or if the log is corrupted.
    fn load_all(&self, group: &str, doc_key: &str) -> StoreResult<Vec<Fragment>>;

    /// Returns the logs of every document in `group`, keyed by document key.
    ///
    /// Bulk variant supporting "sync an entire group in one round trip".
    /// Only documents with at least one fragment appear in the result; an
    /// unknown group yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or if any log is corrupted.
    fn load_group(&self, group: &str) -> StoreResult<BTreeMap<String, Vec<Fragment>>>;
}
