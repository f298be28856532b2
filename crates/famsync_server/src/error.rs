//! Error types for the synchronization service.

use famsync_engine::EngineError;
use famsync_protocol::ProtocolError;
use famsync_store::StoreError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the synchronization service.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Malformed or missing required fields at the operation boundary.
    ///
    /// Always client-caused and non-retryable; no partial effect occurred.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The durability layer failed.
    ///
    /// The service performs no implicit retry; retry policy belongs to the
    /// transport or caller.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The document engine failed on stored fragment bytes.
    ///
    /// Fragments only enter through the trusted append path, so this is a
    /// data-integrity condition: logged at the point of failure and surfaced,
    /// never swallowed.
    #[error("document engine error: {0}")]
    Engine(#[from] EngineError),
}

impl From<ProtocolError> for ServerError {
    fn from(e: ProtocolError) -> Self {
        ServerError::InvalidRequest(e.to_string())
    }
}

impl ServerError {
    /// Returns true if this is a client error (4xx at an HTTP boundary).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServerError::InvalidRequest(_))
    }

    /// Returns true if this is a server error (5xx at an HTTP boundary).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, ServerError::Store(_) | ServerError::Engine(_))
    }
}
