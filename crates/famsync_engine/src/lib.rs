//! # FamSync Document Engine
//!
//! The conflict-free merge boundary of the synchronization service.
//!
//! This crate provides:
//! - The [`DocumentEngine`] trait: materialize a fragment log into document
//!   state, and diff that state against a client's progress marker
//! - [`YrsEngine`]: the production implementation, backed by [`yrs`]
//!   (the Rust port of Yjs)
//! - [`GSetEngine`]: a minimal grow-only-set CRDT used as a deterministic
//!   test double
//!
//! # Contract
//!
//! The synchronization service's convergence guarantees hold only if the
//! engine's merge is commutative, idempotent, and associative over fragments:
//! replaying a fragment set must yield the same state in any order and with
//! any duplication. Both implementations here satisfy that contract.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod gset;
mod ydoc;

pub use engine::{Diff, DocumentEngine, ProgressMarker};
pub use error::{EngineError, EngineResult};
pub use gset::GSetEngine;
pub use ydoc::YrsEngine;
