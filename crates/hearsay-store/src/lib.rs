//! # Hearsay Store
//!
//! Storage abstraction for Hearsay nodes. Provides a trait-based interface
//! for message persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts message storage behind the [`Store`] trait,
//! allowing the node to be storage-agnostic. The primary implementation
//! is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`InsertResult`] - Result of inserting a message
//! - [`Visibility`] - Whether a stored message is shared
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hearsay_core::MessageBuilder;
//! use hearsay_store::{InsertResult, SqliteStore, Store, Visibility};
//!
//! async fn example() -> hearsay_store::Result<()> {
//!     let store = SqliteStore::open("hearsay.db")?;
//!
//!     let record = MessageBuilder::new().body("Hello").build().unwrap();
//!     let id = record.content_id();
//!     let result = store.insert_message(&id, &record, Visibility::Public).await?;
//!     assert_eq!(result, InsertResult::Inserted);
//!     Ok(())
//! }
//! ```
//!
//! The store does not validate. Callers insert only messages whose id they
//! have verified.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertResult, Store, StoreExt, StoredMessage, Visibility};
