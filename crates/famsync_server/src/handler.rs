//! Request handlers for the gateway boundary.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::service::SyncService;
use famsync_engine::DocumentEngine;
use famsync_protocol::{SubmitRequest, SubmitResponse, SyncRequest, SyncResponse};
use famsync_store::FragmentStore;

/// Handler for gateway-shaped sync and submit requests.
///
/// Sits between the external gateway (which owns HTTP framing) and the
/// [`SyncService`]: validates request shape, enforces configured limits,
/// and converts Base64 wire payloads to and from raw bytes. Shape and
/// decode failures map to [`ServerError::InvalidRequest`] with no effect
/// on the store.
pub struct RequestHandler<S, E> {
    config: ServerConfig,
    service: SyncService<S, E>,
}

impl<S: FragmentStore, E: DocumentEngine> RequestHandler<S, E> {
    /// Creates a new request handler.
    pub fn new(config: ServerConfig, service: SyncService<S, E>) -> Self {
        Self { config, service }
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the underlying service.
    pub fn service(&self) -> &SyncService<S, E> {
        &self.service
    }

    /// Handles a group-wide sync request.
    ///
    /// # Errors
    ///
    /// [`ServerError::InvalidRequest`] on malformed shape, undecodable
    /// markers, or too many markers; store/engine failures propagate
    /// unchanged, so a sync never silently drops a document from the result.
    pub fn handle_sync(&self, request: SyncRequest) -> ServerResult<SyncResponse> {
        request.validate()?;
        if request.markers.len() > self.config.max_markers_per_sync {
            return Err(ServerError::InvalidRequest(format!(
                "too many markers: {} > {}",
                request.markers.len(),
                self.config.max_markers_per_sync
            )));
        }

        let markers = request.decoded_markers()?;
        let diffs = self.service.sync_documents(&request.group, &markers)?;
        Ok(SyncResponse::from_diffs(diffs))
    }

    /// Handles an update submission.
    ///
    /// # Errors
    ///
    /// [`ServerError::InvalidRequest`] on missing/empty fields, undecodable
    /// payload, or an oversized fragment; [`ServerError::Store`] if the
    /// append fails. A failed submit never yields a success response.
    pub fn handle_submit(&self, request: SubmitRequest) -> ServerResult<SubmitResponse> {
        request.validate()?;
        let fragment = request.decoded_update()?;
        if fragment.len() > self.config.max_fragment_bytes {
            return Err(ServerError::InvalidRequest(format!(
                "fragment too large: {} > {} bytes",
                fragment.len(),
                self.config.max_fragment_bytes
            )));
        }

        self.service
            .submit_update(&request.group, &request.document_key, &fragment)?;
        Ok(SubmitResponse::accepted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use famsync_engine::GSetEngine;
    use famsync_store::MemoryFragmentStore;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn handler() -> RequestHandler<MemoryFragmentStore, GSetEngine> {
        let service = SyncService::new(Arc::new(MemoryFragmentStore::new()), GSetEngine::new());
        RequestHandler::new(ServerConfig::default(), service)
    }

    #[test]
    fn submit_then_sync() {
        let handler = handler();

        let response = handler
            .handle_submit(SubmitRequest::from_fragment("fam1", "gasto42", b"edit1"))
            .unwrap();
        assert!(response.success);

        let response = handler
            .handle_sync(SyncRequest::new("fam1", BTreeMap::new()))
            .unwrap();
        assert!(response.updates["gasto42"].is_some());
    }

    #[test]
    fn submit_empty_update_is_rejected_without_append() {
        let handler = handler();

        let result = handler.handle_submit(SubmitRequest::new("fam1", "gasto42", ""));
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));
        assert_eq!(handler.service().store().fragment_count(), 0);
    }

    #[test]
    fn submit_undecodable_payload_is_rejected() {
        let handler = handler();

        let result = handler.handle_submit(SubmitRequest::new("fam1", "gasto42", "%%%"));
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));
        assert_eq!(handler.service().store().fragment_count(), 0);
    }

    #[test]
    fn submit_oversized_fragment_is_rejected() {
        let service = SyncService::new(Arc::new(MemoryFragmentStore::new()), GSetEngine::new());
        let handler =
            RequestHandler::new(ServerConfig::default().with_max_fragment_bytes(4), service);

        let result =
            handler.handle_submit(SubmitRequest::from_fragment("fam1", "gasto42", b"too big"));
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));
    }

    #[test]
    fn sync_rejects_undecodable_marker() {
        let handler = handler();

        let mut markers = BTreeMap::new();
        markers.insert("gasto42".to_string(), "***".to_string());
        let result = handler.handle_sync(SyncRequest::new("fam1", markers));
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));
    }

    #[test]
    fn sync_rejects_too_many_markers() {
        let service = SyncService::new(Arc::new(MemoryFragmentStore::new()), GSetEngine::new());
        let handler =
            RequestHandler::new(ServerConfig::default().with_max_markers_per_sync(1), service);

        let mut markers = BTreeMap::new();
        markers.insert("a".to_string(), String::new());
        markers.insert("b".to_string(), String::new());
        let result = handler.handle_sync(SyncRequest::new("fam1", markers));
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));
    }

    #[test]
    fn sync_empty_group_field_is_rejected() {
        let handler = handler();
        let result = handler.handle_sync(SyncRequest::new("", BTreeMap::new()));
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));
    }
}
