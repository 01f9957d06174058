//! # Hearsay Core
//!
//! Pure primitives for Hearsay messages: the field model, canonical content,
//! content-addressed identity, validation and the two wire representations.
//!
//! This crate contains no I/O, no storage, no networking. Every function is
//! a pure computation over in-memory values and is safe to call from any
//! number of threads at once.
//!
//! ## Key Types
//!
//! - [`MessageRecord`] - One message, every field as wire text
//! - [`MessageId`] - Content-addressed identifier (SHA-256 of canonical content)
//! - [`Field`] - Field Model: names, limits, requiredness, volatility
//!
//! ## Identity
//!
//! A message id is `digest(canonicalize(record))`. See [`canonical`] for the
//! exact byte layout and [`digest`](mod@digest) for the hex rendering.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod field;
pub mod json;
pub mod message;
pub mod text;
pub mod types;
pub mod validation;

pub use canonical::{canonical_len, canonicalize, try_canonicalize};
pub use digest::{digest, Sha256Hash};
pub use error::{CoreError, IdentityError, ParseError, ResourceExhausted, StructureError, Violation};
pub use field::{Field, TEXT_MAXIMUM_SIZE};
pub use message::{
    format_timestamp, MessageBuilder, MessageRecord, API_VERSION, API_VERSION_MAJOR,
    API_VERSION_MINOR,
};
pub use types::{AddressType, MessageId};
pub use validation::{check_field, validate_identity, validate_message, validate_structure};

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
