//! Error types for the document engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while materializing or diffing documents.
///
/// Fragments reach the engine only through the trusted append path, so a
/// malformed fragment is a data-integrity condition, not a routine client
/// error; callers are expected to log and surface it rather than swallow it.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A stored fragment could not be decoded as an engine update.
    #[error("malformed fragment: {0}")]
    MalformedFragment(String),

    /// A client-supplied progress marker could not be decoded.
    #[error("malformed progress marker: {0}")]
    MalformedMarker(String),
}
