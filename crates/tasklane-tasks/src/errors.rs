//! Error types.
//!
//! Neither type ever escapes a store mutation: storage failures are logged
//! where they happen. `TaskError` is returned only by caller-side helpers
//! (drafts, sort key parsing).

use thiserror::Error;

/// Failure talking to the durable key-value slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The slot cannot be used in this execution context.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the slot failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored bytes are not a task collection, or the collection could
    /// not be encoded.
    #[error("malformed task data: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Caller-side validation errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Input rejected before it reaches the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// Sort key other than `priority`, `status` or `none`.
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
}
