//! Node configuration.

use serde::Deserialize;

use hearsay_core::json::JSON_MAXIMUM_SIZE;
use hearsay_core::TEXT_MAXIMUM_SIZE;

/// Default Hearsay port.
pub const DEFAULT_PORT: u16 = 1687;

/// Configuration for a [`Node`](crate::Node).
///
/// Every field has a default, so a JSON config only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Port the node is reachable on. Reported by `GET /hearsay`.
    pub port: u16,
    /// `text/hearsay` request bodies larger than this are rejected before
    /// parsing.
    pub max_body_size: usize,
    /// The same bound for `application/json` bodies, whose escapes take
    /// more room.
    pub max_json_body_size: usize,
    /// Whether messages received from peers are listed and served.
    pub share_received: bool,
    /// Whether to run structural validation on ingest.
    ///
    /// Identity is verified either way.
    pub validate_on_ingest: bool,
    /// Upper bound on the number of messages one listing returns.
    pub list_limit: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_body_size: TEXT_MAXIMUM_SIZE,
            max_json_body_size: JSON_MAXIMUM_SIZE,
            share_received: true,
            validate_on_ingest: true,
            list_limit: 100,
        }
    }
}

impl NodeConfig {
    /// Load from a JSON document. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
