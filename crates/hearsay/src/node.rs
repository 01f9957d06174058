//! The Node: one Hearsay participant's view of the message set.
//!
//! The node sits between the HTTP resources and the store. It runs the
//! identity pipeline on every incoming message and decides what is stored
//! and what is shared.

use tracing::{debug, info, warn};

use hearsay_core::{validate_structure, IdentityError, MessageId, MessageRecord};
use hearsay_store::{InsertResult, Store, StoreExt, Visibility};

use crate::config::NodeConfig;
use crate::error::Result;

/// Result of ingesting a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestResult {
    /// Message was accepted and stored.
    Accepted(MessageId),
    /// Message was already in store (idempotent).
    Duplicate(MessageId),
}

impl IngestResult {
    pub fn id(&self) -> MessageId {
        match self {
            IngestResult::Accepted(id) | IngestResult::Duplicate(id) => *id,
        }
    }
}

/// The main Node struct.
///
/// Provides a unified API for:
/// - Composing local messages
/// - Ingesting messages from peers
/// - Querying and listing shared messages
/// - Preparing messages for relay
pub struct Node<S: Store> {
    /// The storage backend.
    store: S,
    /// Configuration.
    config: NodeConfig,
}

impl<S: Store> Node<S> {
    /// Create a new node instance.
    pub fn new(store: S, config: NodeConfig) -> Self {
        Self { store, config }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Local Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Hash and store a locally drafted message.
    ///
    /// Any `id` already on the draft is ignored and replaced by the computed
    /// one.
    pub async fn compose(
        &self,
        mut draft: MessageRecord,
        visibility: Visibility,
    ) -> Result<MessageId> {
        draft.id.clear();
        validate_structure(&draft)?;
        let id = draft.try_content_id()?;
        let record = MessageRecord {
            id: id.to_hex(),
            ..draft
        };

        if self.store.insert_message(&id, &record, visibility).await? == InsertResult::Inserted {
            info!(id = %id, ?visibility, "composed message");
        }
        Ok(id)
    }

    /// Make a stored message public. Returns `false` if it is unknown.
    pub async fn share(&self, id: &MessageId) -> Result<bool> {
        let found = self.store.set_visibility(id, Visibility::Public).await?;
        if found {
            info!(id = %id, "message shared");
        }
        Ok(found)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ingest Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Ingest a message from an external source.
    ///
    /// The content address is always recomputed. A non-empty `id` on the
    /// record must match it, and so must `expected` when given. Nothing is
    /// stored unless every check passes.
    pub async fn ingest(
        &self,
        record: MessageRecord,
        expected: Option<&MessageId>,
    ) -> Result<IngestResult> {
        if self.config.validate_on_ingest {
            if let Err(e) = validate_structure(&record) {
                warn!(error = %e, "rejected malformed message");
                return Err(e.into());
            }
        }

        let computed = record.try_content_id()?;
        if record.is_hashed() {
            let stated = MessageId::from_hex(&record.id)?;
            check_identity(&stated, &computed)?;
        }
        if let Some(expected) = expected {
            check_identity(expected, &computed)?;
        }

        let visibility = if self.config.share_received {
            Visibility::Public
        } else {
            Visibility::Private
        };
        let record = MessageRecord {
            id: computed.to_hex(),
            ..record
        };

        match self.store.insert_message(&computed, &record, visibility).await? {
            InsertResult::Inserted => {
                info!(id = %computed, hops = %record.n_hops, "accepted message");
                Ok(IngestResult::Accepted(computed))
            }
            InsertResult::AlreadyExists => {
                debug!(id = %computed, "duplicate message");
                Ok(IngestResult::Duplicate(computed))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a shared message by id.
    ///
    /// Private and absent messages both yield `None`.
    pub async fn get(&self, id: &MessageId) -> Result<Option<MessageRecord>> {
        Ok(self.store.get_public(id).await?)
    }

    /// List shared messages, oldest first.
    ///
    /// `limit` is capped at the configured listing limit.
    pub async fn list(
        &self,
        since: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<MessageRecord>> {
        let limit = limit
            .unwrap_or(self.config.list_limit)
            .min(self.config.list_limit);
        Ok(self.store.list_public(since, limit).await?)
    }

    /// The copy of a shared message to forward to a peer, one hop further.
    pub async fn relay(&self, id: &MessageId) -> Result<Option<MessageRecord>> {
        match self.get(id).await? {
            Some(record) => Ok(Some(record.relayed()?)),
            None => Ok(None),
        }
    }
}

fn check_identity(stated: &MessageId, computed: &MessageId) -> Result<()> {
    if stated != computed {
        warn!(stated = %stated, computed = %computed, "rejected message with mismatched id");
        return Err(IdentityError::HashMismatch {
            stated: stated.to_hex(),
            computed: computed.to_hex(),
        }
        .into());
    }
    Ok(())
}
