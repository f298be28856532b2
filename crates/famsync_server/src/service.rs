//! Core synchronization orchestration.

use crate::error::{ServerError, ServerResult};
use famsync_engine::DocumentEngine;
use famsync_store::FragmentStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

/// The synchronization service.
///
/// A stateless orchestrator over a fragment store and a document engine.
/// Reads replay a document's full fragment log through the engine and diff
/// the result against the caller's progress marker; writes append exactly
/// one fragment. All durable state lives in the store, so concurrent calls
/// interfere only through the store's own append serialization.
pub struct SyncService<S, E> {
    store: Arc<S>,
    engine: E,
}

impl<S: FragmentStore, E: DocumentEngine> SyncService<S, E> {
    /// Creates a service over an explicitly passed store handle and engine.
    pub fn new(store: Arc<S>, engine: E) -> Self {
        Self { store, engine }
    }

    /// Returns the store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Computes per-document diffs for every document known to `group`.
    ///
    /// `markers` maps document keys to raw progress markers; a known document
    /// with no marker entry is treated as "client has nothing" and gets the
    /// full diff. Result entries are `None` when the caller is already
    /// current for that document, so callers can skip storing a no-op.
    ///
    /// Read-only: never mutates the store. Every document of the group
    /// appears in the result, or the whole call fails; there are no silent
    /// partial mappings.
    ///
    /// # Errors
    ///
    /// - [`ServerError::InvalidRequest`] if `group` is empty
    /// - [`ServerError::Store`] if the log read fails
    /// - [`ServerError::Engine`] if stored fragments or a supplied marker
    ///   cannot be decoded
    pub fn sync_documents(
        &self,
        group: &str,
        markers: &BTreeMap<String, Vec<u8>>,
    ) -> ServerResult<BTreeMap<String, Option<Vec<u8>>>> {
        if group.is_empty() {
            return Err(ServerError::InvalidRequest("group must not be empty".into()));
        }

        let logs = self.store.load_group(group)?;
        debug!(group, documents = logs.len(), "syncing group");

        let mut updates = BTreeMap::new();
        for (doc_key, fragments) in logs {
            let state = self.engine.materialize(&fragments).map_err(|e| {
                error!(group, %doc_key, %e, "fragment log failed to materialize");
                e
            })?;
            let marker = markers.get(&doc_key).map(Vec::as_slice);
            let diff = self.engine.diff_since(&state, marker)?;

            debug!(
                group,
                %doc_key,
                fragments = fragments.len(),
                diff_bytes = diff.len(),
                "computed diff"
            );
            let entry = if self.engine.is_noop_diff(&diff) {
                None
            } else {
                Some(diff)
            };
            updates.insert(doc_key, entry);
        }

        Ok(updates)
    }

    /// Appends one fragment to the log for (`group`, `doc_key`).
    ///
    /// The fragment is not materialized or inspected; replay cost is
    /// deferred entirely to sync time.
    ///
    /// # Errors
    ///
    /// - [`ServerError::InvalidRequest`] if any input is empty; an empty
    ///   fragment is rejected before anything is appended
    /// - [`ServerError::Store`] if the append fails; the store's atomicity
    ///   contract guarantees no partial fragment is visible afterwards
    pub fn submit_update(&self, group: &str, doc_key: &str, fragment: &[u8]) -> ServerResult<()> {
        if group.is_empty() {
            return Err(ServerError::InvalidRequest("group must not be empty".into()));
        }
        if doc_key.is_empty() {
            return Err(ServerError::InvalidRequest(
                "documentKey must not be empty".into(),
            ));
        }
        if fragment.is_empty() {
            return Err(ServerError::InvalidRequest(
                "update must not be empty".into(),
            ));
        }

        self.store.append(group, doc_key, fragment)?;
        debug!(group, doc_key, bytes = fragment.len(), "fragment appended");
        Ok(())
    }
}
