//! MessageRecord: one immutable Hearsay message.
//!
//! A record is drafted with every field but `id`, hashed once, and from then
//! on only `n_hops` may change. Any other edit produces a different message.

use chrono::{DateTime, Utc};

use crate::canonical::{canonicalize, try_canonicalize};
use crate::digest::{digest, Sha256Hash};
use crate::error::{ResourceExhausted, StructureError, Violation};
use crate::field::{Field, N_HOPS_MAX_LEN};
use crate::types::{AddressType, MessageId};
use crate::validation::validate_structure;

/// Hearsay API major version.
pub const API_VERSION_MAJOR: u8 = 0;

/// Hearsay API minor version.
pub const API_VERSION_MINOR: u8 = 0;

/// `API_VERSION_MAJOR.API_VERSION_MINOR`, the default `version` of new messages.
pub const API_VERSION: &str = "0.0";

/// chrono format string for the `timestamp` field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Render a UTC time as a `timestamp` field value.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// A Hearsay message. Every field is its wire text; empty means absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageRecord {
    pub version: String,
    pub id: String,
    pub timestamp: String,
    pub sender_name: String,
    pub sender_address: String,
    pub sender_address_type: String,
    pub message_reference: String,
    pub n_hops: String,
    pub content_type: String,
    pub message_body: String,
}

impl MessageRecord {
    /// Borrow a field's value.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Version => &self.version,
            Field::Id => &self.id,
            Field::Timestamp => &self.timestamp,
            Field::SenderName => &self.sender_name,
            Field::SenderAddress => &self.sender_address,
            Field::SenderAddressType => &self.sender_address_type,
            Field::MessageReference => &self.message_reference,
            Field::NHops => &self.n_hops,
            Field::ContentType => &self.content_type,
            Field::MessageBody => &self.message_body,
        }
    }

    /// Mutable access to a field's value. Used by the codecs.
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Version => &mut self.version,
            Field::Id => &mut self.id,
            Field::Timestamp => &mut self.timestamp,
            Field::SenderName => &mut self.sender_name,
            Field::SenderAddress => &mut self.sender_address,
            Field::SenderAddressType => &mut self.sender_address_type,
            Field::MessageReference => &mut self.message_reference,
            Field::NHops => &mut self.n_hops,
            Field::ContentType => &mut self.content_type,
            Field::MessageBody => &mut self.message_body,
        }
    }

    /// Compute the id this record's content hashes to.
    ///
    /// Never reads or writes `self.id`.
    pub fn compute_id(&self) -> String {
        digest(&canonicalize(self))
    }

    /// The computed id as a typed value.
    pub fn content_id(&self) -> MessageId {
        MessageId(Sha256Hash::hash(&canonicalize(self)).0)
    }

    /// Like [`content_id`](Self::content_id), reporting allocation failure
    /// instead of aborting.
    pub fn try_content_id(&self) -> Result<MessageId, ResourceExhausted> {
        Ok(MessageId(Sha256Hash::hash(&try_canonicalize(self)?).0))
    }

    /// Whether an id has been assigned. Says nothing about whether it matches.
    pub fn is_hashed(&self) -> bool {
        !self.id.is_empty()
    }

    /// Drafted → Hashed: return the record with `id` set from its content.
    pub fn hashed(mut self) -> Self {
        self.id = self.compute_id();
        self
    }

    /// Parsed hop count, if the field holds a number.
    pub fn hops(&self) -> Option<u32> {
        if self.n_hops.is_empty() || !self.n_hops.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.n_hops.parse().ok()
    }

    /// Copy of this record as a relay forwards it: `n_hops` incremented.
    ///
    /// The id is untouched since `n_hops` is not part of the content.
    pub fn relayed(&self) -> Result<Self, StructureError> {
        let hops = self.hops().ok_or_else(|| {
            StructureError::new(
                Field::NHops,
                Violation::InvalidFormat(format!("not a hop count: {:?}", self.n_hops)),
            )
        })?;
        let too_long = |actual| {
            StructureError::new(
                Field::NHops,
                Violation::TooLong {
                    max: N_HOPS_MAX_LEN,
                    actual,
                },
            )
        };
        let next = hops
            .checked_add(1)
            .ok_or_else(|| too_long(self.n_hops.len() + 1))?
            .to_string();
        if next.len() > N_HOPS_MAX_LEN {
            return Err(too_long(next.len()));
        }
        let mut copy = self.clone();
        copy.n_hops = next;
        Ok(copy)
    }

    /// The sender's address type, if set and recognised.
    pub fn address_type(&self) -> Option<AddressType> {
        self.sender_address_type.parse().ok()
    }
}

/// Builder for drafting messages.
pub struct MessageBuilder {
    record: MessageRecord,
}

impl MessageBuilder {
    /// Start a draft stamped with the current time.
    pub fn new() -> Self {
        Self {
            record: MessageRecord {
                version: API_VERSION.to_string(),
                timestamp: format_timestamp(Utc::now()),
                n_hops: "0".to_string(),
                content_type: "text/plain".to_string(),
                ..MessageRecord::default()
            },
        }
    }

    /// Set the version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.record.version = version.into();
        self
    }

    /// Set the timestamp field verbatim.
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.record.timestamp = timestamp.into();
        self
    }

    /// Set the timestamp from a UTC time. Sub-second precision is dropped.
    pub fn timestamp_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.timestamp = format_timestamp(at);
        self
    }

    pub fn sender_name(mut self, name: impl Into<String>) -> Self {
        self.record.sender_name = name.into();
        self
    }

    /// Set the sender address together with its type.
    pub fn sender(mut self, kind: AddressType, address: impl Into<String>) -> Self {
        self.record.sender_address = address.into();
        self.record.sender_address_type = kind.as_str().to_string();
        self
    }

    /// Mark this message as a reply to or continuation of another.
    pub fn reply_to(mut self, id: MessageId) -> Self {
        self.record.message_reference = id.to_hex();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.record.content_type = content_type.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.record.message_body = body.into();
        self
    }

    /// The draft as is, without an id and without checks.
    pub fn draft(self) -> MessageRecord {
        self.record
    }

    /// Validate the draft and hash it.
    pub fn build(self) -> Result<MessageRecord, StructureError> {
        validate_structure(&self.record)?;
        Ok(self.record.hashed())
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
