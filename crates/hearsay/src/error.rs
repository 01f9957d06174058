//! Error types for the node.

use hearsay_core::{CoreError, IdentityError, ParseError, ResourceExhausted, StructureError};
use hearsay_store::StoreError;
use thiserror::Error;

/// Errors that can occur during node operations.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The message itself was rejected, or the core ran out of resources.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl NodeError {
    /// Whether the same request may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        match self {
            NodeError::Core(e) => e.is_retryable(),
            NodeError::Store(_) => false,
        }
    }
}

impl From<StructureError> for NodeError {
    fn from(e: StructureError) -> Self {
        NodeError::Core(e.into())
    }
}

impl From<IdentityError> for NodeError {
    fn from(e: IdentityError) -> Self {
        NodeError::Core(e.into())
    }
}

impl From<ParseError> for NodeError {
    fn from(e: ParseError) -> Self {
        NodeError::Core(e.into())
    }
}

impl From<ResourceExhausted> for NodeError {
    fn from(e: ResourceExhausted) -> Self {
        NodeError::Core(e.into())
    }
}

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;
