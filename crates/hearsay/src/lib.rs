//! # Hearsay
//!
//! A Hearsay node: content-addressed messages passed from peer to peer and
//! served over a small set of HTTP resources.
//!
//! ## Overview
//!
//! A message's id is the SHA-256 of its canonical content. Anyone can check
//! that a message is what its id says, so a node accepts messages from
//! untrusted peers, stores each id once, and forwards them with a hop count
//! that does not affect identity.
//!
//! - **Node**: validates, verifies identity, stores and shares messages
//! - **Resources**: `GET`/`POST` semantics under `/hearsay`
//! - **Codecs**: `text/hearsay` and `application/json` representations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use hearsay::{MessageBuilder, Node, NodeConfig};
//! use hearsay::store::{SqliteStore, Visibility};
//!
//! async fn example() -> hearsay::Result<()> {
//!     let store = SqliteStore::open("hearsay.db")?;
//!     let node = Node::new(store, NodeConfig::default());
//!
//!     let draft = MessageBuilder::new().body("Hello").draft();
//!     let id = node.compose(draft, Visibility::Public).await?;
//!
//!     let request = http::Request::get(format!("/hearsay/message/{id}"))
//!         .body(Bytes::new())
//!         .unwrap();
//!     let response = node.handle(request).await;
//!     assert_eq!(response.status(), http::StatusCode::OK);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `hearsay::core` - Field model, identity, validation and codecs
//! - `hearsay::store` - Storage abstraction and SQLite

pub mod config;
pub mod error;
pub mod node;
pub mod resource;

// Re-export component crates
pub use hearsay_core as core;
pub use hearsay_store as store;

// Re-export main types for convenience
pub use config::{NodeConfig, DEFAULT_PORT};
pub use error::{NodeError, Result};
pub use node::{IngestResult, Node};
pub use resource::{message_path, Format, ImplementationInfo, ROOT};

// Re-export commonly used core types
pub use hearsay_core::{
    AddressType, CoreError, Field, IdentityError, MessageBuilder, MessageId, MessageRecord,
    ParseError, StructureError,
};
