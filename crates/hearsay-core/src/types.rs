//! Strong type definitions for Hearsay.
//!
//! Wire-level fields stay plain strings on [`MessageRecord`](crate::MessageRecord);
//! these newtypes are what callers get once a value has been checked.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::IdentityError;
use crate::field::ID_LEN;

/// A 32-byte message identifier: SHA-256 of the canonical content.
///
/// Two messages with the same canonical content have the same MessageId,
/// regardless of how many hops they travelled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub [u8; 32]);

impl MessageId {
    /// Create a new MessageId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to the 64-char lowercase hex form used on the wire.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex. Upper-case digits are accepted.
    pub fn from_hex(s: &str) -> Result<Self, IdentityError> {
        if s.len() != ID_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IdentityError::MalformedId(s.to_string()));
        }
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr).map_err(|_| IdentityError::MalformedId(s.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for MessageId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for MessageId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for MessageId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Kind of network address a sender gave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    #[serde(rename = "MAC")]
    Mac,
    IPv4,
    IPv6,
}

impl AddressType {
    pub const fn as_str(self) -> &'static str {
        match self {
            AddressType::Mac => "MAC",
            AddressType::IPv4 => "IPv4",
            AddressType::IPv6 => "IPv6",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAC" => Ok(AddressType::Mac),
            "IPv4" => Ok(AddressType::IPv4),
            "IPv6" => Ok(AddressType::IPv6),
            other => Err(format!("unknown address type {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_hex_roundtrip() {
        let id = MessageId::from_bytes([0x42; 32]);
        let hex = id.to_hex();
        let recovered = MessageId::from_hex(&hex).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_message_id_accepts_uppercase() {
        let lower = "ab".repeat(32);
        let upper = lower.to_uppercase();
        assert_eq!(
            MessageId::from_hex(&lower).unwrap(),
            MessageId::from_hex(&upper).unwrap()
        );
        assert_eq!(MessageId::from_hex(&upper).unwrap().to_hex(), lower);
    }

    #[test]
    fn test_message_id_rejects_malformed() {
        assert!(matches!(
            MessageId::from_hex("abc"),
            Err(IdentityError::MalformedId(_))
        ));
        assert!(MessageId::from_hex(&"g".repeat(64)).is_err());
        assert!(MessageId::from_hex(&"a".repeat(65)).is_err());
        // Non-ASCII must not slip through the length check.
        assert!(MessageId::from_hex(&format!("{}é", "a".repeat(62))).is_err());
    }

    #[test]
    fn test_message_id_display_is_full_hex() {
        let id = MessageId::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", id), "ab".repeat(32));
    }

    #[test]
    fn test_message_id_debug() {
        let id = MessageId::from_bytes([0xcd; 32]);
        let debug = format!("{:?}", id);
        assert_eq!(debug, "MessageId(cdcdcdcdcdcdcdcd)");
    }

    #[test]
    fn test_message_id_serde_as_hex() {
        let id = MessageId::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_address_type_names() {
        for ty in [AddressType::Mac, AddressType::IPv4, AddressType::IPv6] {
            assert_eq!(ty.as_str().parse::<AddressType>().unwrap(), ty);
        }
        assert!("ipv4".parse::<AddressType>().is_err());
    }
}
