//! The Hash Engine: SHA-256 over canonical content, rendered as lowercase hex.
//!
//! The hex rendering is a wire contract shared by every implementation:
//! two characters per digest byte, high nibble first, lowercase, in digest
//! order. All of it goes through `hex::encode`.

use sha2::{Digest, Sha256};
use std::fmt;

/// A raw SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    pub fn hash(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The wire rendering of this digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sha256Hash").field(&self.to_hex()).finish()
    }
}

/// Digest bytes into a 64-char lowercase hex string.
pub fn digest(bytes: &[u8]) -> String {
    Sha256Hash::hash(bytes).to_hex()
}
