//! Message validation: structural checks and identity verification.
//!
//! The two checks are separate so callers can tell a malformed message from
//! a well-formed one whose id does not match its content. Both are
//! read-only; a record is never modified while being checked.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{CoreError, IdentityError, StructureError, Violation};
use crate::field::{Field, ID_LEN, TIMESTAMP_LEN};
use crate::message::{MessageRecord, TIMESTAMP_FORMAT};
use crate::types::{AddressType, MessageId};

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{1,2}\.[0-9]{1,2}$").expect("invalid regex"))
}

fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z$")
            .expect("invalid regex")
    })
}

/// `type/subtype` with optional `; name=value` parameters (RFC 4288 tokens).
fn mime_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,126}/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,126}",
            r#"(\s*;\s*[A-Za-z0-9!#$&^_.+-]+=("[^"]*"|[A-Za-z0-9!#$&^_.+-]+))*$"#,
        ))
        .expect("invalid regex")
    })
}

fn mac_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").expect("invalid regex")
    })
}

fn is_lower_hex(value: &str) -> bool {
    value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Check one field value against its Field Model constraints.
///
/// Checks length, requiredness, control characters and per-field format.
/// Cross-field rules live in [`validate_structure`].
pub fn check_field(field: Field, value: &str) -> Result<(), Violation> {
    let len = value.chars().count();
    if len > field.max_len() {
        return Err(Violation::TooLong {
            max: field.max_len(),
            actual: len,
        });
    }
    if value.is_empty() {
        return if field.is_required() {
            Err(Violation::Missing)
        } else {
            Ok(())
        };
    }
    if field.is_single_line() && value.chars().any(char::is_control) {
        return Err(Violation::ControlCharacter);
    }

    match field {
        Field::Version => {
            if !version_regex().is_match(value) {
                return Err(Violation::InvalidFormat("expected M.N or MM.NN".into()));
            }
        }
        Field::Id | Field::MessageReference => check_hex_id(value)?,
        Field::Timestamp => {
            if len != TIMESTAMP_LEN {
                return Err(Violation::WrongLength {
                    expected: TIMESTAMP_LEN,
                    actual: len,
                });
            }
            if !timestamp_regex().is_match(value)
                || NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).is_err()
            {
                return Err(Violation::InvalidFormat(
                    "expected YYYY-MM-DDThh:mm:ssZ".into(),
                ));
            }
        }
        Field::SenderAddressType => {
            value
                .parse::<AddressType>()
                .map_err(Violation::InvalidFormat)?;
        }
        Field::NHops => {
            if !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Violation::InvalidFormat("expected a decimal count".into()));
            }
        }
        Field::ContentType => {
            if !mime_regex().is_match(value) {
                return Err(Violation::InvalidFormat("expected type/subtype".into()));
            }
        }
        Field::SenderName | Field::SenderAddress | Field::MessageBody => {}
    }
    Ok(())
}

fn check_hex_id(value: &str) -> Result<(), Violation> {
    let len = value.chars().count();
    if len != ID_LEN {
        return Err(Violation::WrongLength {
            expected: ID_LEN,
            actual: len,
        });
    }
    if !is_lower_hex(value) {
        return Err(Violation::InvalidFormat("expected lowercase hexadecimal digits".into()));
    }
    Ok(())
}

/// Check that a sender address matches its declared type.
fn check_sender(record: &MessageRecord) -> Result<(), StructureError> {
    let address = record.sender_address.as_str();
    let kind = record.sender_address_type.as_str();

    match (address.is_empty(), kind.is_empty()) {
        (true, true) => return Ok(()),
        (false, true) => {
            return Err(StructureError::new(
                Field::SenderAddressType,
                Violation::Missing,
            ))
        }
        (true, false) => {
            return Err(StructureError::new(Field::SenderAddress, Violation::Missing))
        }
        (false, false) => {}
    }

    let valid = match record.address_type() {
        Some(AddressType::IPv4) => address.parse::<Ipv4Addr>().is_ok(),
        Some(AddressType::IPv6) => address.parse::<Ipv6Addr>().is_ok(),
        Some(AddressType::Mac) => mac_regex().is_match(address),
        // Already rejected by check_field.
        None => true,
    };
    if !valid {
        return Err(StructureError::new(
            Field::SenderAddress,
            Violation::InvalidFormat(format!("not a valid {kind} address")),
        ));
    }
    Ok(())
}

/// Validate a record's structure.
///
/// Fields are checked in wire order and the first violation is reported.
/// An empty `id` is allowed; a drafted record has none yet.
pub fn validate_structure(record: &MessageRecord) -> Result<(), StructureError> {
    for field in Field::ALL {
        check_field(field, record.field(field))
            .map_err(|reason| StructureError::new(field, reason))?;
    }
    check_sender(record)
}

/// Verify that a record's stated id is the digest of its content.
///
/// Returns the verified id. Upper-case ids are accepted here, though
/// [`validate_structure`] refuses them. Repeating the
/// check on the same record always gives the same answer.
pub fn validate_identity(record: &MessageRecord) -> Result<MessageId, IdentityError> {
    let stated = MessageId::from_hex(&record.id)?;
    let computed = record.content_id();
    if stated != computed {
        return Err(IdentityError::HashMismatch {
            stated: record.id.to_ascii_lowercase(),
            computed: computed.to_hex(),
        });
    }
    Ok(computed)
}

/// Structure first, then identity.
pub fn validate_message(record: &MessageRecord) -> Result<MessageId, CoreError> {
    validate_structure(record)?;
    Ok(validate_identity(record)?)
}
