//! Error types for fragment storage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during fragment log operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A log file contains an undecodable fragment frame.
    #[error("fragment log corrupted: {0}")]
    Corrupted(String),

    /// A submitted fragment is too large to frame.
    #[error("fragment of {0} bytes exceeds the frame size limit")]
    FragmentTooLarge(usize),

    /// Another process holds the store's lock file.
    #[error("store directory locked by another process: {0}")]
    Locked(PathBuf),
}
