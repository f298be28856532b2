//! Document engine trait definition.

use crate::error::EngineResult;
use famsync_store::Fragment;

/// An opaque progress marker.
///
/// Produced by clients (and by [`DocumentEngine::encode_marker`]) to express
/// "the set of edits I already have". For the Yjs engine this is an encoded
/// state vector; the synchronization service never looks inside it.
pub type ProgressMarker = Vec<u8>;

/// An opaque diff payload.
///
/// Represents exactly the edits present in a document state but absent from
/// a given progress marker. Applying a diff on top of the marker-holder's
/// state reproduces the full document state.
pub type Diff = Vec<u8>;

/// A conflict-free document engine.
///
/// This is a capability interface: the synchronization service depends on
/// these operations and nothing else, so alternative CRDT implementations
/// can be substituted without touching the service.
///
/// # Contract
///
/// - `materialize` is a deterministic fold that tolerates an empty sequence
///   and is insensitive to duplicated or reordered fragments
/// - `diff_since(state, Some(marker))` followed by `apply` on the
///   marker-holder's state reproduces `state` exactly
/// - `diff_since(state, None)` encodes the entire state
pub trait DocumentEngine: Send + Sync {
    /// Materialized document state.
    type State;

    /// Folds a fragment log into a document state.
    ///
    /// An empty log yields the empty/initial state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::MalformedFragment`] if a fragment cannot
    /// be decoded.
    fn materialize(&self, fragments: &[Fragment]) -> EngineResult<Self::State>;

    /// Merges one update (a fragment or a diff) into an existing state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::MalformedFragment`] if the update cannot
    /// be decoded.
    fn apply(&self, state: &mut Self::State, update: &[u8]) -> EngineResult<()>;

    /// Computes the edits present in `state` but not covered by `marker`.
    ///
    /// With no marker, the diff encodes the entire state. The result may be
    /// a no-op diff (see [`DocumentEngine::is_noop_diff`]) when the marker
    /// already reflects everything.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::MalformedMarker`] if the marker cannot
    /// be decoded.
    fn diff_since(&self, state: &Self::State, marker: Option<&[u8]>) -> EngineResult<Diff>;

    /// Encodes a progress marker summarizing everything in `state`.
    ///
    /// A client holding this marker receives a no-op diff until the document
    /// grows past `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be summarized.
    fn encode_marker(&self, state: &Self::State) -> EngineResult<ProgressMarker>;

    /// Returns true if `diff` carries no edits.
    ///
    /// Engines whose encoding of "nothing to send" is non-zero-length
    /// override this.
    fn is_noop_diff(&self, diff: &[u8]) -> bool {
        diff.is_empty()
    }
}
