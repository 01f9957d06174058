//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use hearsay_core::{MessageId, MessageRecord};

use crate::error::{Result, StoreError};
use crate::traits::{InsertResult, Store, StoredMessage, Visibility};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    messages: RwLock<HashMap<MessageId, StoredMessage>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<MessageId, StoredMessage>>> {
        self.messages
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<MessageId, StoredMessage>>> {
        self.messages
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_message(
        &self,
        id: &MessageId,
        record: &MessageRecord,
        visibility: Visibility,
    ) -> Result<InsertResult> {
        // Check and insert under one write lock so concurrent writers of the
        // same id cannot both win.
        let mut messages = self.write()?;
        if messages.contains_key(id) {
            debug!(id = %id, "message already stored");
            return Ok(InsertResult::AlreadyExists);
        }

        let mut record = record.clone();
        record.id = id.to_hex();
        messages.insert(
            *id,
            StoredMessage {
                record,
                visibility,
                received_at: Utc::now().timestamp_millis(),
            },
        );
        debug!(id = %id, ?visibility, "message stored");
        Ok(InsertResult::Inserted)
    }

    async fn get_message(&self, id: &MessageId) -> Result<Option<StoredMessage>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn has_message(&self, id: &MessageId) -> Result<bool> {
        Ok(self.read()?.contains_key(id))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    async fn set_visibility(&self, id: &MessageId, visibility: Visibility) -> Result<bool> {
        let mut messages = self.write()?;
        match messages.get_mut(id) {
            Some(stored) => {
                stored.visibility = visibility;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_public(&self, since: Option<&str>, limit: usize) -> Result<Vec<MessageRecord>> {
        let messages = self.read()?;
        let mut public: Vec<&MessageRecord> = messages
            .values()
            .filter(|stored| stored.visibility.is_public())
            .map(|stored| &stored.record)
            .filter(|record| since.map_or(true, |since| record.timestamp.as_str() >= since))
            .collect();

        public.sort_by(|a, b| (&a.timestamp, &a.id).cmp(&(&b.timestamp, &b.id)));
        Ok(public.into_iter().take(limit).cloned().collect())
    }
}
