//! Main sync server facade.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;
use crate::service::SyncService;
use famsync_engine::DocumentEngine;
use famsync_protocol::{GatewayMessage, SubmitRequest, SubmitResponse, SyncRequest, SyncResponse};
use famsync_store::FragmentStore;
use std::sync::Arc;

/// The sync server.
///
/// Bundles configuration, the synchronization service, and request handling
/// behind the two operations the gateway invokes. The server carries no
/// session or handshake state: every call is self-contained.
///
/// # Example
///
/// ```
/// use famsync_engine::YrsEngine;
/// use famsync_server::{ServerConfig, SyncServer};
/// use famsync_store::MemoryFragmentStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryFragmentStore::new());
/// let server = SyncServer::new(ServerConfig::default(), store, YrsEngine::new());
///
/// // In a real application an HTTP gateway would route request bodies
/// // to server.handle_sync() and server.handle_submit().
/// ```
pub struct SyncServer<S, E> {
    handler: RequestHandler<S, E>,
}

impl<S: FragmentStore, E: DocumentEngine> SyncServer<S, E> {
    /// Creates a sync server over the given store handle and engine.
    pub fn new(config: ServerConfig, store: Arc<S>, engine: E) -> Self {
        let service = SyncService::new(store, engine);
        let handler = RequestHandler::new(config, service);
        Self { handler }
    }

    /// Handles a sync request.
    ///
    /// # Errors
    ///
    /// See [`RequestHandler::handle_sync`].
    pub fn handle_sync(&self, request: SyncRequest) -> ServerResult<SyncResponse> {
        self.handler.handle_sync(request)
    }

    /// Handles an update submission.
    ///
    /// # Errors
    ///
    /// See [`RequestHandler::handle_submit`].
    pub fn handle_submit(&self, request: SubmitRequest) -> ServerResult<SubmitResponse> {
        self.handler.handle_submit(request)
    }

    /// Handles a gateway message, dispatching to the appropriate handler.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidRequest`] for response-typed messages;
    /// otherwise as the dispatched handler.
    pub fn handle_message(&self, message: GatewayMessage) -> ServerResult<GatewayMessage> {
        match message {
            GatewayMessage::SyncRequest(req) => {
                self.handle_sync(req).map(GatewayMessage::SyncResponse)
            }
            GatewayMessage::SubmitRequest(req) => {
                self.handle_submit(req).map(GatewayMessage::SubmitResponse)
            }
            GatewayMessage::SyncResponse(_) | GatewayMessage::SubmitResponse(_) => Err(
                ServerError::InvalidRequest("unexpected message type".into()),
            ),
        }
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        self.handler.config()
    }

    /// Returns the underlying synchronization service.
    pub fn service(&self) -> &SyncService<S, E> {
        self.handler.service()
    }
}
