//! Yjs-backed document engine.

use crate::engine::{Diff, DocumentEngine, ProgressMarker};
use crate::error::{EngineError, EngineResult};
use famsync_store::Fragment;
use yrs::updates::decoder::Decode;
use yrs::updates::encoder::Encode;
use yrs::{Doc, ReadTxn, StateVector, Transact, Update};

/// The lib0 v1 encoding of an update carrying no structs and no deletions.
///
/// `yrs` never produces zero-length diffs; this two-byte payload is what an
/// up-to-date client receives.
const NOOP_UPDATE_V1: [u8; 2] = [0, 0];

/// A document engine backed by [`yrs`], the Rust port of Yjs.
///
/// Fragments are lib0 v1 update payloads, progress markers are encoded state
/// vectors, and diffs are updates encoding everything the marker lacks:
/// the same wire artifacts Yjs clients produce and consume.
///
/// The engine is stateless: every call builds or reads a transient
/// [`yrs::Doc`], so it is trivially `Send + Sync`.
///
/// # Example
///
/// ```rust
/// use famsync_engine::{DocumentEngine, YrsEngine};
///
/// let engine = YrsEngine::new();
/// let state = engine.materialize(&[]).unwrap();
/// let diff = engine.diff_since(&state, None).unwrap();
/// assert!(engine.is_noop_diff(&diff));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct YrsEngine;

impl YrsEngine {
    /// Creates a new Yjs engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentEngine for YrsEngine {
    type State = Doc;

    fn materialize(&self, fragments: &[Fragment]) -> EngineResult<Self::State> {
        let doc = Doc::new();
        {
            let mut txn = doc.transact_mut();
            for fragment in fragments {
                let update = Update::decode_v1(fragment)
                    .map_err(|e| EngineError::MalformedFragment(e.to_string()))?;
                txn.apply_update(update)
                    .map_err(|e| EngineError::MalformedFragment(e.to_string()))?;
            }
        }
        Ok(doc)
    }

    fn apply(&self, state: &mut Self::State, update: &[u8]) -> EngineResult<()> {
        let update = Update::decode_v1(update)
            .map_err(|e| EngineError::MalformedFragment(e.to_string()))?;
        let mut txn = state.transact_mut();
        txn.apply_update(update)
            .map_err(|e| EngineError::MalformedFragment(e.to_string()))?;
        Ok(())
    }

    fn diff_since(&self, state: &Self::State, marker: Option<&[u8]>) -> EngineResult<Diff> {
        let txn = state.transact();
        let sv = match marker {
            Some(bytes) => StateVector::decode_v1(bytes)
                .map_err(|e| EngineError::MalformedMarker(e.to_string()))?,
            None => StateVector::default(),
        };
        Ok(txn.encode_state_as_update_v1(&sv))
    }

    fn encode_marker(&self, state: &Self::State) -> EngineResult<ProgressMarker> {
        let txn = state.transact();
        Ok(txn.state_vector().encode_v1())
    }

    fn is_noop_diff(&self, diff: &[u8]) -> bool {
        diff.is_empty() || diff == NOOP_UPDATE_V1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yrs::{GetString, Text, WriteTxn};

    /// Produces a fragment inserting `text` at `index` of the shared text "t",
    /// built on top of the given base fragments.
    fn edit_fragment(base: &[Fragment], index: u32, text: &str) -> Fragment {
        let engine = YrsEngine::new();
        let doc = engine.materialize(base).unwrap();
        let before = {
            let txn = doc.transact();
            txn.state_vector()
        };
        {
            let mut txn = doc.transact_mut();
            let shared = txn.get_or_insert_text("t");
            shared.insert(&mut txn, index, text);
        }
        let txn = doc.transact();
        txn.encode_state_as_update_v1(&before)
    }

    fn text_of(doc: &Doc) -> String {
        let txn = doc.transact();
        match txn.get_text("t") {
            Some(text) => text.get_string(&txn),
            None => String::new(),
        }
    }

    #[test]
    fn materialize_empty_log() {
        let engine = YrsEngine::new();
        let doc = engine.materialize(&[]).unwrap();
        assert_eq!(text_of(&doc), "");
    }

    #[test]
    fn materialize_is_order_insensitive() {
        let engine = YrsEngine::new();
        let a = edit_fragment(&[], 0, "hello");
        let b = edit_fragment(&[a.clone()], 5, " world");

        let forward = engine.materialize(&[a.clone(), b.clone()]).unwrap();
        let backward = engine.materialize(&[b, a]).unwrap();

        assert_eq!(text_of(&forward), "hello world");
        assert_eq!(text_of(&forward), text_of(&backward));
    }

    #[test]
    fn materialize_tolerates_duplicates() {
        let engine = YrsEngine::new();
        let a = edit_fragment(&[], 0, "once");

        let doc = engine.materialize(&[a.clone(), a.clone(), a]).unwrap();
        assert_eq!(text_of(&doc), "once");
    }

    #[test]
    fn diff_without_marker_encodes_everything() {
        let engine = YrsEngine::new();
        let a = edit_fragment(&[], 0, "edit1");
        let state = engine.materialize(std::slice::from_ref(&a)).unwrap();

        let diff = engine.diff_since(&state, None).unwrap();
        assert!(!engine.is_noop_diff(&diff));

        let mut replica = engine.materialize(&[]).unwrap();
        engine.apply(&mut replica, &diff).unwrap();
        assert_eq!(text_of(&replica), "edit1");
    }

    #[test]
    fn diff_against_marker_is_incremental() {
        let engine = YrsEngine::new();
        let a = edit_fragment(&[], 0, "a");
        let b = edit_fragment(std::slice::from_ref(&a), 1, "b");

        // Client already has A.
        let client = engine.materialize(std::slice::from_ref(&a)).unwrap();
        let marker = engine.encode_marker(&client).unwrap();

        let full = engine.materialize(&[a, b]).unwrap();
        let diff = engine.diff_since(&full, Some(&marker)).unwrap();
        assert!(!engine.is_noop_diff(&diff));

        // Applying the diff on the client's state reproduces the full state.
        let mut client = client;
        engine.apply(&mut client, &diff).unwrap();
        assert_eq!(text_of(&client), "ab");
    }

    #[test]
    fn up_to_date_marker_yields_noop_diff() {
        let engine = YrsEngine::new();
        let a = edit_fragment(&[], 0, "done");
        let state = engine.materialize(std::slice::from_ref(&a)).unwrap();
        let marker = engine.encode_marker(&state).unwrap();

        let diff = engine.diff_since(&state, Some(&marker)).unwrap();
        assert!(engine.is_noop_diff(&diff));
    }

    #[test]
    fn empty_state_diff_is_noop() {
        let engine = YrsEngine::new();
        let state = engine.materialize(&[]).unwrap();
        let diff = engine.diff_since(&state, None).unwrap();
        assert_eq!(diff, NOOP_UPDATE_V1);
        assert!(engine.is_noop_diff(&diff));
    }

    #[test]
    fn malformed_fragment_is_rejected() {
        let engine = YrsEngine::new();
        let result = engine.materialize(&[vec![0xFF; 11]]);
        assert!(matches!(result, Err(EngineError::MalformedFragment(_))));
    }

    #[test]
    fn malformed_marker_is_rejected() {
        let engine = YrsEngine::new();
        let state = engine.materialize(&[]).unwrap();
        let result = engine.diff_since(&state, Some(&[0xFF; 9]));
        assert!(matches!(result, Err(EngineError::MalformedMarker(_))));
    }

    #[test]
    fn concurrent_edits_converge() {
        let engine = YrsEngine::new();
        let base = edit_fragment(&[], 0, "shared");

        // Two clients edit independently from the same base.
        let left = edit_fragment(std::slice::from_ref(&base), 0, "L");
        let right = edit_fragment(std::slice::from_ref(&base), 6, "R");

        let one = engine
            .materialize(&[base.clone(), left.clone(), right.clone()])
            .unwrap();
        let other = engine.materialize(&[right, base, left]).unwrap();

        assert_eq!(text_of(&one), text_of(&other));
    }
}
