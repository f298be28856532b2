//! Gateway request and response messages.

use crate::error::{ProtocolError, ProtocolResult};
use crate::wire::{decode_payload, encode_payload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A gateway message.
///
/// Transport-agnostic envelope the gateway routes; JSON-tagged so a single
/// endpoint (or a test harness) can dispatch on `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GatewayMessage {
    /// Sync request.
    SyncRequest(SyncRequest),
    /// Sync response.
    SyncResponse(SyncResponse),
    /// Submit request.
    SubmitRequest(SubmitRequest),
    /// Submit response.
    SubmitResponse(SubmitResponse),
}

impl GatewayMessage {
    /// Encodes the message as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a message from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Json`] on malformed input.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Group-wide sync request from a client.
///
/// `markers` maps document keys to Base64 progress markers; a document the
/// server knows but the client omits gets a full diff back. The field itself
/// is required: a fresh client sends an explicit empty map, and a request
/// without one fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Tenant/partition identifier.
    pub group: String,
    /// Per-document progress markers, Base64-encoded.
    pub markers: BTreeMap<String, String>,
}

impl SyncRequest {
    /// Creates a sync request.
    pub fn new(group: impl Into<String>, markers: BTreeMap<String, String>) -> Self {
        Self {
            group: group.into(),
            markers,
        }
    }

    /// Validates required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingField`] if `group` is empty.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.group.is_empty() {
            return Err(ProtocolError::MissingField("group"));
        }
        Ok(())
    }

    /// Decodes every marker to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidBase64`] if any marker is not valid
    /// Base64.
    pub fn decoded_markers(&self) -> ProtocolResult<BTreeMap<String, Vec<u8>>> {
        self.markers
            .iter()
            .map(|(key, text)| Ok((key.clone(), decode_payload("markers", text)?)))
            .collect()
    }
}

/// Group-wide sync response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    /// Per-document diffs, Base64-encoded; `None` means already current.
    pub updates: BTreeMap<String, Option<String>>,
}

impl SyncResponse {
    /// Builds a response from raw per-document diffs.
    #[must_use]
    pub fn from_diffs(diffs: BTreeMap<String, Option<Vec<u8>>>) -> Self {
        Self {
            updates: diffs
                .into_iter()
                .map(|(key, diff)| (key, diff.map(|bytes| encode_payload(&bytes))))
                .collect(),
        }
    }

    /// Decodes every non-null diff to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidBase64`] if any diff is not valid
    /// Base64.
    pub fn decoded_updates(&self) -> ProtocolResult<BTreeMap<String, Option<Vec<u8>>>> {
        self.updates
            .iter()
            .map(|(key, diff)| {
                let bytes = diff
                    .as_ref()
                    .map(|text| decode_payload("updates", text))
                    .transpose()?;
                Ok((key.clone(), bytes))
            })
            .collect()
    }
}

/// Update submission from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Tenant/partition identifier.
    pub group: String,
    /// Document the update belongs to.
    pub document_key: String,
    /// The update fragment, Base64-encoded.
    pub update: String,
}

impl SubmitRequest {
    /// Creates a submit request with an already-encoded payload.
    pub fn new(
        group: impl Into<String>,
        document_key: impl Into<String>,
        update: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            document_key: document_key.into(),
            update: update.into(),
        }
    }

    /// Creates a submit request from raw fragment bytes.
    pub fn from_fragment(
        group: impl Into<String>,
        document_key: impl Into<String>,
        fragment: &[u8],
    ) -> Self {
        Self::new(group, document_key, encode_payload(fragment))
    }

    /// Validates required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingField`] if any field is empty. An
    /// empty `update` is rejected here, before any decode or append happens.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.group.is_empty() {
            return Err(ProtocolError::MissingField("group"));
        }
        if self.document_key.is_empty() {
            return Err(ProtocolError::MissingField("documentKey"));
        }
        if self.update.is_empty() {
            return Err(ProtocolError::MissingField("update"));
        }
        Ok(())
    }

    /// Decodes the update payload to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidBase64`] on undecodable payload.
    pub fn decoded_update(&self) -> ProtocolResult<Vec<u8>> {
        decode_payload("update", &self.update)
    }
}

/// Submission acknowledgement.
///
/// Only constructed on acceptance; a failed submit surfaces as an error and
/// never yields `success: true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Always `true`; present for wire compatibility.
    pub success: bool,
}

impl SubmitResponse {
    /// Creates an acceptance response.
    #[must_use]
    pub fn accepted() -> Self {
        Self { success: true }
    }
}
