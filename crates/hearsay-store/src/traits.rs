//! Store trait: the abstract interface for message persistence.
//!
//! This trait allows the node to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use hearsay_core::{MessageId, MessageRecord};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Result of inserting a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// Message was inserted.
    Inserted,
    /// A message with this id is already stored (idempotent - not an error).
    AlreadyExists,
}

/// Whether a stored message is shared with other nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Listed and served to anyone who asks.
    Public,
    /// Kept locally; indistinguishable from absent to outside callers.
    Private,
}

impl Visibility {
    /// Convert to the integer stored in SQLite.
    pub fn to_i64(self) -> i64 {
        match self {
            Visibility::Public => 0,
            Visibility::Private => 1,
        }
    }

    /// Try to parse from the stored integer.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Visibility::Public),
            1 => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// A message as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// The message, with `id` set and `n_hops` as received.
    pub record: MessageRecord,
    pub visibility: Visibility,
    /// Local time of first insertion (Unix ms).
    pub received_at: i64,
}

/// The Store trait: async interface for message persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **First writer wins**: Of any number of concurrent inserts of the same
///   id, exactly one returns `Inserted`; the rest return `AlreadyExists` and
///   leave the stored copy untouched.
/// - **No validation**: The store trusts its caller to have validated the
///   message and computed `id`.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Message Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a message under its verified id.
    ///
    /// # Returns
    /// - `Inserted` if the message was new.
    /// - `AlreadyExists` if a message with this id is already stored.
    async fn insert_message(
        &self,
        id: &MessageId,
        record: &MessageRecord,
        visibility: Visibility,
    ) -> Result<InsertResult>;

    /// Get a message by its content-addressed id, whatever its visibility.
    async fn get_message(&self, id: &MessageId) -> Result<Option<StoredMessage>>;

    /// Check if a message exists by id.
    async fn has_message(&self, id: &MessageId) -> Result<bool>;

    /// Number of stored messages.
    async fn count(&self) -> Result<usize>;

    // ─────────────────────────────────────────────────────────────────────────
    // Visibility Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Change a message's visibility. Returns `false` if the id is unknown.
    async fn set_visibility(&self, id: &MessageId, visibility: Visibility) -> Result<bool>;

    /// List public messages ordered by `(timestamp, id)`.
    ///
    /// `since` keeps only messages whose timestamp is at or after it.
    async fn list_public(&self, since: Option<&str>, limit: usize) -> Result<Vec<MessageRecord>>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// Get a message only if it is public.
    ///
    /// Absent and private look the same to the caller.
    fn get_public(
        &self,
        id: &MessageId,
    ) -> impl std::future::Future<Output = Result<Option<MessageRecord>>> + Send;
}

impl<S: Store + ?Sized> StoreExt for S {
    async fn get_public(&self, id: &MessageId) -> Result<Option<MessageRecord>> {
        Ok(self
            .get_message(id)
            .await?
            .filter(|stored| stored.visibility.is_public())
            .map(|stored| stored.record))
    }
}
