//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for a Hearsay node. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use hearsay_core::{MessageId, MessageRecord};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InsertResult, Store, StoredMessage, Visibility};

const MESSAGE_COLUMNS: &str = "message_id, version, timestamp, sender_name, sender_address,
    sender_address_type, message_reference, n_hops, content_type, message_body,
    visibility, received_at";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Lock(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

// Helper to convert a row to a StoredMessage
fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredMessage> {
    let id_bytes: Vec<u8> = row.get("message_id")?;
    let id_bytes: [u8; 32] = id_bytes.try_into().map_err(|_| {
        rusqlite::Error::InvalidColumnType(0, "message_id".into(), rusqlite::types::Type::Blob)
    })?;
    let visibility: i64 = row.get("visibility")?;
    let visibility = Visibility::from_i64(visibility)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(10, visibility))?;

    Ok(StoredMessage {
        record: MessageRecord {
            version: row.get("version")?,
            id: MessageId::from_bytes(id_bytes).to_hex(),
            timestamp: row.get("timestamp")?,
            sender_name: row.get("sender_name")?,
            sender_address: row.get("sender_address")?,
            sender_address_type: row.get("sender_address_type")?,
            message_reference: row.get("message_reference")?,
            n_hops: row.get("n_hops")?,
            content_type: row.get("content_type")?,
            message_body: row.get("message_body")?,
        },
        visibility,
        received_at: row.get("received_at")?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_message(
        &self,
        id: &MessageId,
        record: &MessageRecord,
        visibility: Visibility,
    ) -> Result<InsertResult> {
        let id = *id;
        let record = record.clone();

        self.with_conn(move |conn| {
            // The primary key makes this atomic: of concurrent inserts of the
            // same id exactly one changes a row.
            let changed = conn.execute(
                "INSERT OR IGNORE INTO messages (
                    message_id, version, timestamp, sender_name, sender_address,
                    sender_address_type, message_reference, n_hops, content_type,
                    message_body, visibility, received_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    id.as_bytes().as_slice(),
                    record.version,
                    record.timestamp,
                    record.sender_name,
                    record.sender_address,
                    record.sender_address_type,
                    record.message_reference,
                    record.n_hops,
                    record.content_type,
                    record.message_body,
                    visibility.to_i64(),
                    Utc::now().timestamp_millis(),
                ],
            )?;

            if changed == 0 {
                debug!(id = %id, "message already stored");
                Ok(InsertResult::AlreadyExists)
            } else {
                debug!(id = %id, ?visibility, "message stored");
                Ok(InsertResult::Inserted)
            }
        })
        .await
    }

    async fn get_message(&self, id: &MessageId) -> Result<Option<StoredMessage>> {
        let id = *id;
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ?1"),
                params![id.as_bytes().as_slice()],
                row_to_message,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn has_message(&self, id: &MessageId) -> Result<bool> {
        let id = *id;
        self.with_conn(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM messages WHERE message_id = ?1",
                    params![id.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            usize::try_from(count).map_err(|_| StoreError::InvalidData(format!("count {count}")))
        })
        .await
    }

    async fn set_visibility(&self, id: &MessageId, visibility: Visibility) -> Result<bool> {
        let id = *id;
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE messages SET visibility = ?1 WHERE message_id = ?2",
                params![visibility.to_i64(), id.as_bytes().as_slice()],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn list_public(&self, since: Option<&str>, limit: usize) -> Result<Vec<MessageRecord>> {
        let since = since.unwrap_or("").to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE visibility = ?1 AND timestamp >= ?2
                 ORDER BY timestamp, message_id
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(
                params![Visibility::Public.to_i64(), since, limit],
                row_to_message,
            )?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row?.record);
            }
            Ok(records)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;

    fn make_test_message(body: &str) -> (MessageId, MessageRecord) {
        let record = MessageRecord {
            version: "0.0".into(),
            timestamp: "2012-01-01T00:00:00Z".into(),
            sender_name: "alice".into(),
            sender_address: "10.0.0.1".into(),
            sender_address_type: "IPv4".into(),
            n_hops: "2".into(),
            content_type: "text/plain".into(),
            message_body: body.into(),
            ..MessageRecord::default()
        }
        .hashed();
        (record.content_id(), record)
    }

    #[tokio::test]
    async fn test_insert_and_get_message() {
        let store = SqliteStore::open_memory().unwrap();
        let (id, record) = make_test_message("Hi");

        // Insert
        let result = store
            .insert_message(&id, &record, Visibility::Public)
            .await
            .unwrap();
        assert_eq!(result, InsertResult::Inserted);

        // Get by ID
        let stored = store.get_message(&id).await.unwrap().unwrap();
        assert_eq!(stored.record, record);
        assert_eq!(stored.visibility, Visibility::Public);
        assert!(store.has_message(&id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_idempotent_insert() {
        let store = SqliteStore::open_memory().unwrap();
        let (id, record) = make_test_message("Hi");
        let mut relayed = record.clone();
        relayed.n_hops = "3".into();

        // First insert
        let r1 = store
            .insert_message(&id, &record, Visibility::Public)
            .await
            .unwrap();
        assert_eq!(r1, InsertResult::Inserted);

        // Second insert - should be idempotent and keep the first copy
        let r2 = store
            .insert_message(&id, &relayed, Visibility::Private)
            .await
            .unwrap();
        assert_eq!(r2, InsertResult::AlreadyExists);

        let stored = store.get_message(&id).await.unwrap().unwrap();
        assert_eq!(stored.record.n_hops, "2");
        assert_eq!(stored.visibility, Visibility::Public);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_private_messages_are_not_listed() {
        let store = SqliteStore::open_memory().unwrap();
        let (public_id, public) = make_test_message("public");
        let (private_id, private) = make_test_message("private");
        store
            .insert_message(&public_id, &public, Visibility::Public)
            .await
            .unwrap();
        store
            .insert_message(&private_id, &private, Visibility::Private)
            .await
            .unwrap();

        let listed = store.list_public(None, 100).await.unwrap();
        assert_eq!(listed, vec![public]);
        assert!(store.get_public(&private_id).await.unwrap().is_none());

        assert!(store
            .set_visibility(&private_id, Visibility::Public)
            .await
            .unwrap());
        assert_eq!(store.list_public(None, 100).await.unwrap().len(), 2);
        assert_eq!(store.list_public(None, 1).await.unwrap().len(), 1);
        assert!(store
            .list_public(Some("2013-01-01T00:00:00Z"), 100)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_missing_message() {
        let store = SqliteStore::open_memory().unwrap();
        let (id, _) = make_test_message("never stored");
        assert!(store.get_message(&id).await.unwrap().is_none());
        assert!(!store.has_message(&id).await.unwrap());
        assert!(!store.set_visibility(&id, Visibility::Private).await.unwrap());
    }

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hearsay.db");
        let (id, record) = make_test_message("durable");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .insert_message(&id, &record, Visibility::Public)
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let stored = store.get_message(&id).await.unwrap().unwrap();
        assert_eq!(stored.record, record);
    }
}
