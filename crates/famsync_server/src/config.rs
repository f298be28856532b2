//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the sync server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the external gateway binds to.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Request timeout.
    pub request_timeout: Duration,
    /// Maximum accepted fragment size in bytes (after Base64 decoding).
    pub max_fragment_bytes: usize,
    /// Maximum number of progress markers in a single sync request.
    pub max_markers_per_sync: usize,
}

impl ServerConfig {
    /// Creates a new server configuration.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            max_connections: 1000,
            request_timeout: Duration::from_secs(30),
            max_fragment_bytes: 1024 * 1024,
            max_markers_per_sync: 1024,
        }
    }

    /// Sets the maximum concurrent connections.
    #[must_use]
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the maximum fragment size.
    #[must_use]
    pub fn with_max_fragment_bytes(mut self, bytes: usize) -> Self {
        self.max_fragment_bytes = bytes;
        self
    }

    /// Sets the maximum marker count per sync request.
    #[must_use]
    pub fn with_max_markers_per_sync(mut self, count: usize) -> Self {
        self.max_markers_per_sync = count;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8080)))
    }
}
