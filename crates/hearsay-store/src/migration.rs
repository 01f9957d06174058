//! Versioned SQLite schema for the message store.
//!
//! `MIGRATIONS[n]` moves the schema from version `n` to `n + 1`. Pending
//! steps run in one transaction and each applied version is recorded in
//! `schema_migrations`.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;

use crate::error::{Result, StoreError};

const MIGRATIONS: &[&str] = &[
    // v1: one row per content address.
    r#"
    CREATE TABLE messages (
        message_id BLOB PRIMARY KEY,      -- SHA-256 of canonical content
        version TEXT NOT NULL,
        timestamp TEXT NOT NULL,          -- YYYY-MM-DDThh:mm:ssZ, sorts as text
        sender_name TEXT NOT NULL,
        sender_address TEXT NOT NULL,
        sender_address_type TEXT NOT NULL,
        message_reference TEXT NOT NULL,
        n_hops TEXT NOT NULL,             -- first copy received
        content_type TEXT NOT NULL,
        message_body TEXT NOT NULL,
        visibility INTEGER NOT NULL DEFAULT 0,  -- 0=public, 1=private
        received_at INTEGER NOT NULL      -- Unix ms of first insert
    );

    CREATE INDEX idx_messages_public ON messages(visibility, timestamp, message_id);
    CREATE INDEX idx_messages_reference ON messages(message_reference);
    "#,
];

/// Schema version this build reads and writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
    )?;

    let found = schema_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "schema version {found} is newer than supported version {CURRENT_VERSION}"
        )));
    }
    if found == CURRENT_VERSION {
        return Ok(());
    }

    info!(from = found, to = CURRENT_VERSION, "migrating message store schema");
    let tx = conn.transaction()?;
    for (step, sql) in MIGRATIONS.iter().enumerate().skip(found as usize) {
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![step as u32 + 1, Utc::now().timestamp_millis()],
        )?;
    }
    tx.commit()?;
    Ok(())
}

/// Highest applied schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
