//! In-memory fragment store for testing.

use crate::error::StoreResult;
use crate::log::{Fragment, FragmentStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory fragment store.
///
/// This store keeps all fragment logs in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral servers that don't need persistence
///
/// # Thread Safety
///
/// All logs live behind a single `RwLock`, so appends are serialized and a
/// load observes a consistent snapshot of each log it copies out.
///
/// # Example
///
/// ```rust
/// use famsync_store::{FragmentStore, MemoryFragmentStore};
///
/// let store = MemoryFragmentStore::new();
/// store.append("fam1", "gasto42", b"edit1").unwrap();
/// assert_eq!(store.load_all("fam1", "gasto42").unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryFragmentStore {
    logs: RwLock<BTreeMap<(String, String), Vec<Fragment>>>,
}

impl MemoryFragmentStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents with at least one fragment.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.logs.read().len()
    }

    /// Returns the total number of fragments across all documents.
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.logs.read().values().map(Vec::len).sum()
    }
}

impl FragmentStore for MemoryFragmentStore {
    fn append(&self, group: &str, doc_key: &str, fragment: &[u8]) -> StoreResult<()> {
        let mut logs = self.logs.write();
        logs.entry((group.to_string(), doc_key.to_string()))
            .or_default()
            .push(fragment.to_vec());
        Ok(())
    }

    fn load_all(&self, group: &str, doc_key: &str) -> StoreResult<Vec<Fragment>> {
        let logs = self.logs.read();
        Ok(logs
            .get(&(group.to_string(), doc_key.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn load_group(&self, group: &str) -> StoreResult<BTreeMap<String, Vec<Fragment>>> {
        let logs = self.logs.read();
        Ok(logs
            .iter()
            .filter(|((g, _), _)| g == group)
            .map(|((_, key), fragments)| (key.clone(), fragments.clone()))
            .collect())
    }
}
