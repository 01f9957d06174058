//! The Field Model: every message field, its bounds and its role.
//!
//! Validator and both codecs read their limits from here and nowhere else.

use std::fmt;

/// Hearsay API version string length. Format `M.N` or `MM.NN`.
pub const VERSION_MAX_LEN: usize = 5;

/// Message id length: a hex-encoded SHA-256 digest.
pub const ID_LEN: usize = 64;

/// `YYYY-MM-DDThh:mm:ssZ`.
pub const TIMESTAMP_LEN: usize = 20;

pub const SENDER_NAME_MAX_LEN: usize = 73;

/// Longest textual IPv6 address.
pub const SENDER_ADDRESS_MAX_LEN: usize = 71;

/// `MAC`, `IPv4` or `IPv6`.
pub const ADDRESS_TYPE_MAX_LEN: usize = 4;

pub const N_HOPS_MAX_LEN: usize = 5;

/// RFC 4288 bound on a MIME type.
pub const CONTENT_TYPE_MAX_LEN: usize = 255;

pub const MESSAGE_BODY_MAX_LEN: usize = 2011;

/// Widest UTF-8 encoding of a single char.
const MAX_UTF8_WIDTH: usize = 4;

/// Upper bound, in bytes, of any valid `text/hearsay` representation.
///
/// Every header line at full length (with a tolerated `\r`), the separator
/// line and a full-length body.
pub const TEXT_MAXIMUM_SIZE: usize = text_maximum_size();

const fn text_maximum_size() -> usize {
    let mut total = 2;
    let mut i = 0;
    while i < Field::ALL.len() {
        let field = Field::ALL[i];
        let value = field.max_len() * MAX_UTF8_WIDTH;
        total += match field {
            Field::MessageBody => value,
            _ => field.label().len() + 2 + value + 2,
        };
        i += 1;
    }
    total
}

/// A message field.
///
/// Declaration order is the wire order of the text and JSON forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Version,
    Id,
    Timestamp,
    SenderName,
    SenderAddress,
    SenderAddressType,
    MessageReference,
    NHops,
    ContentType,
    MessageBody,
}

impl Field {
    /// All fields in wire order.
    pub const ALL: [Field; 10] = [
        Field::Version,
        Field::Id,
        Field::Timestamp,
        Field::SenderName,
        Field::SenderAddress,
        Field::SenderAddressType,
        Field::MessageReference,
        Field::NHops,
        Field::ContentType,
        Field::MessageBody,
    ];

    /// Fields that make up the canonical content, in hashing order.
    ///
    /// `Id` is the output of hashing and `NHops` is volatile; neither is here.
    pub const CANONICAL: [Field; 8] = [
        Field::Version,
        Field::Timestamp,
        Field::SenderName,
        Field::SenderAddress,
        Field::SenderAddressType,
        Field::MessageReference,
        Field::ContentType,
        Field::MessageBody,
    ];

    /// JSON key and canonical field name.
    pub const fn key(self) -> &'static str {
        match self {
            Field::Version => "version",
            Field::Id => "id",
            Field::Timestamp => "timestamp",
            Field::SenderName => "sender_name",
            Field::SenderAddress => "sender_address",
            Field::SenderAddressType => "sender_address_type",
            Field::MessageReference => "message_reference",
            Field::NHops => "n_hops",
            Field::ContentType => "content_type",
            Field::MessageBody => "message_body",
        }
    }

    /// Header label in the `text/hearsay` form.
    pub const fn label(self) -> &'static str {
        match self {
            Field::Version => "Version",
            Field::Id => "Id",
            Field::Timestamp => "Timestamp",
            Field::SenderName => "Sender-Name",
            Field::SenderAddress => "Sender-Address",
            Field::SenderAddressType => "Sender-Address-Type",
            Field::MessageReference => "Message-Reference",
            Field::NHops => "Hops",
            Field::ContentType => "Content-Type",
            Field::MessageBody => "Message-Body",
        }
    }

    /// Maximum length in chars.
    pub const fn max_len(self) -> usize {
        match self {
            Field::Version => VERSION_MAX_LEN,
            Field::Id => ID_LEN,
            Field::Timestamp => TIMESTAMP_LEN,
            Field::SenderName => SENDER_NAME_MAX_LEN,
            Field::SenderAddress => SENDER_ADDRESS_MAX_LEN,
            Field::SenderAddressType => ADDRESS_TYPE_MAX_LEN,
            Field::MessageReference => ID_LEN,
            Field::NHops => N_HOPS_MAX_LEN,
            Field::ContentType => CONTENT_TYPE_MAX_LEN,
            Field::MessageBody => MESSAGE_BODY_MAX_LEN,
        }
    }

    /// Whether an empty value is a structural error.
    ///
    /// `Id` is optional here: a drafted message has none yet.
    pub const fn is_required(self) -> bool {
        matches!(
            self,
            Field::Version
                | Field::Timestamp
                | Field::NHops
                | Field::ContentType
                | Field::MessageBody
        )
    }

    /// Whether the value may change in transit without changing the message.
    pub const fn is_volatile(self) -> bool {
        matches!(self, Field::NHops)
    }

    /// Whether the field contributes to the canonical content.
    pub const fn is_identity(self) -> bool {
        !matches!(self, Field::Id | Field::NHops)
    }

    /// Whether the value must fit on one line.
    pub const fn is_single_line(self) -> bool {
        !matches!(self, Field::MessageBody)
    }

    /// Look up a field by its JSON key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Look up a field by its text label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
