//! # FamSync Protocol
//!
//! Request/response shapes crossing the gateway boundary, plus the Base64
//! payload codec.
//!
//! The protocol is transport-agnostic JSON: the gateway (an external HTTP
//! layer) frames requests, this crate validates their shape and converts
//! Base64 payload fields to and from the raw bytes the synchronization
//! service works with. Fragment, marker, and diff byte layouts stay opaque
//! end to end.
//!
//! # Shapes
//!
//! - Sync: `{ "group": g, "markers": { docKey: base64 } }` →
//!   `{ "updates": { docKey: base64 | null } }`, where `null` means the
//!   caller is already current for that document
//! - Submit: `{ "group": g, "documentKey": k, "update": base64 }` →
//!   `{ "success": true }`

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;
mod wire;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    GatewayMessage, SubmitRequest, SubmitResponse, SyncRequest, SyncResponse,
};
pub use wire::{decode_payload, encode_payload};
