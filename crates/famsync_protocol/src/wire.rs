//! Base64 payload codec.
//!
//! All fragment, marker, and diff payloads cross the gateway boundary as
//! standard-alphabet Base64 text; internally they are raw byte sequences.

use crate::error::{ProtocolError, ProtocolResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Encodes an opaque payload for the wire.
#[must_use]
pub fn encode_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a Base64 payload field.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidBase64`] naming `field` if the text is not
/// valid Base64.
pub fn decode_payload(field: &'static str, text: &str) -> ProtocolResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|source| ProtocolError::InvalidBase64 { field, source })
}
