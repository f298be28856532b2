//! # FamSync Server
//!
//! Synchronization service for offline-first, per-entity collaborative
//! documents (shared household-expense records and the like).
//!
//! This crate provides:
//! - [`SyncService`]: the core orchestrator. Replays a document's fragment
//!   log through the document engine, diffs against a client's progress
//!   marker, appends newly submitted fragments
//! - [`RequestHandler`]: validates gateway-shaped requests and converts
//!   between wire payloads and raw bytes
//! - [`SyncServer`]: facade bundling config, service, and handler
//!
//! # Architecture
//!
//! ```text
//! Gateway (external HTTP layer)
//!    │ SyncRequest / SubmitRequest
//!    ▼
//! RequestHandler ── validation, Base64 boundary
//!    ▼
//! SyncService ── stateless orchestration
//!    │ load_group / append          │ materialize / diff_since
//!    ▼                             ▼
//! FragmentStore                DocumentEngine
//! ```
//!
//! The service itself holds no mutable state: all state lives in the
//! fragment store, every call is self-contained given (group, document key)
//! identity, and concurrent calls interfere only through the store's own
//! append serialization.
//!
//! # Key Invariants
//!
//! - a sync never mutates the store and never returns a partial mapping:
//!   every known document of the group appears in the result (with `null`
//!   when the caller is current)
//! - a submit performs exactly one append and never reports success after a
//!   store failure
//! - replay cost is paid entirely at read time; the write path does not
//!   materialize documents

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod server;
mod service;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::RequestHandler;
pub use server::SyncServer;
pub use service::SyncService;
