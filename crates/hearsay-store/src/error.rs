//! Store errors.

use thiserror::Error;

/// Errors from a [`Store`](crate::Store) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row could not be turned back into a message.
    #[error("corrupt row: {0}")]
    InvalidData(String),

    /// The on-disk schema cannot be brought to the current version.
    #[error("schema migration failed: {0}")]
    Migration(String),

    /// A lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Lock(String),

    /// The blocking task running a query failed to complete.
    #[error("background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
