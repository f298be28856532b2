//! Error types for protocol decoding and validation.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while validating or decoding a request.
///
/// All variants are client-caused: a request that trips one of these maps to
/// `InvalidRequest` (a 4xx at an HTTP boundary), never a server failure.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A required field is absent or empty.
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),

    /// A payload field is not valid Base64.
    #[error("field {field} is not valid base64: {source}")]
    InvalidBase64 {
        /// Name of the offending field.
        field: &'static str,
        /// Underlying decode failure.
        source: base64::DecodeError,
    },

    /// The request body is not valid JSON of the expected shape.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
}
