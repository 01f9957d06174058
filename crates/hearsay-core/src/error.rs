//! Error types for Hearsay Core.
//!
//! Every failure mode is its own kind. Semantic invalidity (structure,
//! identity, parsing) and resource exhaustion are never merged, so callers
//! can tell a bad message from a node that is out of memory.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::field::Field;

/// Why a single field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("required field is empty")]
    Missing,

    #[error("length {actual} exceeds maximum of {max}")]
    TooLong { max: usize, actual: usize },

    #[error("expected exactly {expected} characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("contains control characters")]
    ControlCharacter,

    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// A field violates its length, format or requiredness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct StructureError {
    pub field: Field,
    pub reason: Violation,
}

impl StructureError {
    pub fn new(field: Field, reason: Violation) -> Self {
        Self { field, reason }
    }
}

/// A message's stated identifier does not hold up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The recomputed digest disagrees with the stated id.
    #[error("id does not match content: stated {stated}, computed {computed}")]
    HashMismatch { stated: String, computed: String },

    /// The id is not 64 hexadecimal characters.
    #[error("malformed id: {0:?}")]
    MalformedId(String),
}

/// A codec could not interpret its input as a Hearsay message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input of {actual} bytes exceeds maximum of {max}")]
    InputTooLarge { max: usize, actual: usize },

    #[error("input is not valid UTF-8 (at byte {0})")]
    InvalidEncoding(usize),

    #[error("line {line}: expected `Label: value`")]
    MalformedLine { line: usize },

    #[error("unknown field {name:?}")]
    UnknownField { line: Option<usize>, name: String },

    #[error("duplicate field {0}")]
    DuplicateField(Field),

    #[error("missing required field {0}")]
    MissingField(Field),

    #[error("{field} too long: {actual} characters, maximum is {max}")]
    FieldTooLong {
        field: Field,
        max: usize,
        actual: usize,
    },

    #[error("missing empty line before message body")]
    MissingBody,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("{0} must be a string")]
    NotAString(Field),
}

impl ParseError {
    /// The field this error refers to, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            ParseError::DuplicateField(field)
            | ParseError::MissingField(field)
            | ParseError::NotAString(field)
            | ParseError::FieldTooLong { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Allocation for a digest or canonical buffer failed.
///
/// Retryable. Never a verdict on the message itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resource exhausted: {0}")]
pub struct ResourceExhausted(pub String);

impl From<TryReserveError> for ResourceExhausted {
    fn from(e: TryReserveError) -> Self {
        ResourceExhausted(e.to_string())
    }
}

/// Any error the core can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    ResourceExhausted(#[from] ResourceExhausted),
}

impl CoreError {
    /// Whether the caller may retry the same input later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::ResourceExhausted(_))
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Structure(_) => "structure",
            CoreError::Identity(IdentityError::HashMismatch { .. }) => "hash_mismatch",
            CoreError::Identity(IdentityError::MalformedId(_)) => "malformed_id",
            CoreError::Parse(_) => "parse",
            CoreError::ResourceExhausted(_) => "resource_exhausted",
        }
    }

    /// The field the error refers to, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            CoreError::Structure(e) => Some(e.field),
            CoreError::Identity(IdentityError::MalformedId(_)) => Some(Field::Id),
            CoreError::Parse(e) => e.field(),
            _ => None,
        }
    }
}
