//! Grow-only-set engine used as a deterministic test double.

use crate::engine::{Diff, DocumentEngine, ProgressMarker};
use crate::error::{EngineError, EngineResult};
use famsync_store::Fragment;
use std::collections::BTreeSet;

/// A document engine over a grow-only set of fragment blobs.
///
/// State is the set of distinct fragments seen so far; set union is
/// commutative, idempotent, and associative, so this is the smallest possible
/// engine honoring the CRDT contract. Markers and diffs are length-prefixed
/// blob lists.
///
/// Intended for tests that need deterministic, inspectable artifacts without
/// real CRDT encoding; production uses [`crate::YrsEngine`].
#[derive(Debug, Default, Clone, Copy)]
pub struct GSetEngine;

impl GSetEngine {
    /// Creates a new grow-only-set engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Encodes a sequence of blobs as length-prefixed records.
fn encode_blobs<'a>(blobs: impl Iterator<Item = &'a Vec<u8>>) -> Vec<u8> {
    let mut out = Vec::new();
    for blob in blobs {
        out.extend_from_slice(&(blob.len() as u32).to_le_bytes());
        out.extend_from_slice(blob);
    }
    out
}

/// Decodes length-prefixed records; `what` names the payload for errors.
fn decode_blobs(bytes: &[u8], what: &str) -> EngineResult<BTreeSet<Vec<u8>>> {
    let mut blobs = BTreeSet::new();
    let mut offset = 0usize;
    while offset < bytes.len() {
        if bytes.len() - offset < 4 {
            return Err(EngineError::MalformedFragment(format!(
                "truncated {what} length at offset {offset}"
            )));
        }
        let len = u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as usize;
        offset += 4;
        if bytes.len() - offset < len {
            return Err(EngineError::MalformedFragment(format!(
                "truncated {what} payload at offset {offset}"
            )));
        }
        blobs.insert(bytes[offset..offset + len].to_vec());
        offset += len;
    }
    Ok(blobs)
}

impl DocumentEngine for GSetEngine {
    type State = BTreeSet<Vec<u8>>;

    fn materialize(&self, fragments: &[Fragment]) -> EngineResult<Self::State> {
        Ok(fragments.iter().cloned().collect())
    }

    fn apply(&self, state: &mut Self::State, update: &[u8]) -> EngineResult<()> {
        state.extend(decode_blobs(update, "update")?);
        Ok(())
    }

    fn diff_since(&self, state: &Self::State, marker: Option<&[u8]>) -> EngineResult<Diff> {
        let known = match marker {
            Some(bytes) => decode_blobs(bytes, "marker")
                .map_err(|e| EngineError::MalformedMarker(e.to_string()))?,
            None => BTreeSet::new(),
        };
        Ok(encode_blobs(state.iter().filter(|blob| !known.contains(*blob))))
    }

    fn encode_marker(&self, state: &Self::State) -> EngineResult<ProgressMarker> {
        Ok(encode_blobs(state.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(blobs: &[&[u8]]) -> BTreeSet<Vec<u8>> {
        blobs.iter().map(|b| b.to_vec()).collect()
    }

    #[test]
    fn materialize_dedupes_and_ignores_order() {
        let engine = GSetEngine::new();
        let forward = engine
            .materialize(&[b"a".to_vec(), b"b".to_vec(), b"a".to_vec()])
            .unwrap();
        let backward = engine.materialize(&[b"b".to_vec(), b"a".to_vec()]).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward, set(&[b"a", b"b"]));
    }

    #[test]
    fn diff_without_marker_is_everything() {
        let engine = GSetEngine::new();
        let state = engine.materialize(&[b"x".to_vec(), b"y".to_vec()]).unwrap();

        let diff = engine.diff_since(&state, None).unwrap();
        let mut replica = BTreeSet::new();
        engine.apply(&mut replica, &diff).unwrap();
        assert_eq!(replica, state);
    }

    #[test]
    fn diff_against_marker_excludes_known_blobs() {
        let engine = GSetEngine::new();
        let client = engine.materialize(&[b"a".to_vec()]).unwrap();
        let marker = engine.encode_marker(&client).unwrap();

        let full = engine.materialize(&[b"a".to_vec(), b"b".to_vec()]).unwrap();
        let diff = engine.diff_since(&full, Some(&marker)).unwrap();

        let mut decoded = BTreeSet::new();
        engine.apply(&mut decoded, &diff).unwrap();
        assert_eq!(decoded, set(&[b"b"]));
    }

    #[test]
    fn up_to_date_marker_yields_empty_diff() {
        let engine = GSetEngine::new();
        let state = engine.materialize(&[b"a".to_vec()]).unwrap();
        let marker = engine.encode_marker(&state).unwrap();

        let diff = engine.diff_since(&state, Some(&marker)).unwrap();
        assert!(diff.is_empty());
        assert!(engine.is_noop_diff(&diff));
    }

    #[test]
    fn truncated_marker_is_rejected() {
        let engine = GSetEngine::new();
        let state = engine.materialize(&[b"a".to_vec()]).unwrap();

        let result = engine.diff_since(&state, Some(&[9, 0, 0, 0, 1]));
        assert!(matches!(result, Err(EngineError::MalformedMarker(_))));
    }

    proptest! {
        #[test]
        fn round_trip_reproduces_full_state(
            fragments in proptest::collection::vec(
                proptest::collection::vec(any::<u8>(), 0..32),
                0..12,
            ),
            split in 0usize..12,
        ) {
            let engine = GSetEngine::new();
            let split = split.min(fragments.len());

            // Client holds a prefix of the log; server holds everything.
            let client_state = engine.materialize(&fragments[..split]).unwrap();
            let marker = engine.encode_marker(&client_state).unwrap();
            let full = engine.materialize(&fragments).unwrap();

            let diff = engine.diff_since(&full, Some(&marker)).unwrap();
            let mut merged = client_state;
            engine.apply(&mut merged, &diff).unwrap();

            prop_assert_eq!(merged, full);
        }
    }
}
