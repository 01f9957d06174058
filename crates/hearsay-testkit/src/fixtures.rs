//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request, Response};

use hearsay::{Node, NodeConfig};
use hearsay_core::json::JSON_MIME;
use hearsay_core::text::{self, TEXT_MIME};
use hearsay_core::{AddressType, MessageBuilder, MessageId, MessageRecord};
use hearsay_store::MemoryStore;

/// Fixed timestamp for reproducible drafts.
pub const EPOCH: &str = "2012-01-01T00:00:00Z";

/// A test fixture: one node over a memory store, speaking as one sender.
pub struct TestFixture {
    pub node: Node<MemoryStore>,
    pub name: String,
    pub address: String,
}

impl TestFixture {
    /// Create a fixture with default configuration.
    pub fn new() -> Self {
        Self::with_config(NodeConfig::default())
    }

    pub fn with_config(config: NodeConfig) -> Self {
        Self {
            node: Node::new(MemoryStore::new(), config),
            name: "alice".to_string(),
            address: "10.0.0.1".to_string(),
        }
    }

    /// Draft an anonymous message at [`EPOCH`].
    pub fn make_message(&self, body: &str) -> MessageRecord {
        MessageBuilder::new().timestamp(EPOCH).body(body).draft()
    }

    /// Draft a message signed with this fixture's name and address.
    pub fn make_signed(&self, body: &str) -> MessageRecord {
        MessageBuilder::new()
            .timestamp(EPOCH)
            .sender_name(self.name.clone())
            .sender(AddressType::IPv4, self.address.clone())
            .body(body)
            .draft()
    }

    /// Draft a reply to `parent`.
    pub fn make_reply(&self, parent: MessageId, body: &str) -> MessageRecord {
        MessageBuilder::new()
            .timestamp(EPOCH)
            .reply_to(parent)
            .body(body)
            .draft()
    }

    /// Send a request to the fixture's node.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: impl Into<Bytes>,
    ) -> Response<Bytes> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        match builder.body(body.into()) {
            Ok(request) => self.node.handle(request).await,
            Err(e) => panic!("bad test request {uri}: {e}"),
        }
    }

    /// `GET` a resource, asking for JSON when `json` is set.
    pub async fn get(&self, uri: &str, json: bool) -> Response<Bytes> {
        let accept = if json { JSON_MIME } else { TEXT_MIME };
        match Request::get(uri).header(ACCEPT, accept).body(Bytes::new()) {
            Ok(request) => self.node.handle(request).await,
            Err(e) => panic!("bad test request {uri}: {e}"),
        }
    }

    /// `POST` a record in the text form to `/hearsay/message/new`.
    pub async fn post_new(&self, record: &MessageRecord) -> Response<Bytes> {
        self.request(
            Method::POST,
            "/hearsay/message/new",
            Some(TEXT_MIME),
            text::serialize(record),
        )
        .await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create fixtures for multi-node tests, each with its own sender identity.
pub fn peer_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| TestFixture {
            name: format!("peer-{i}"),
            address: format!("10.0.0.{}", i % 250 + 1),
            ..TestFixture::new()
        })
        .collect()
}
