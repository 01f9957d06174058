//! The `text/hearsay` representation.
//!
//! One `Label: value` line per header field in wire order, an empty line,
//! then the message body verbatim to the end of input:
//!
//! ```text
//! Version: 0.0
//! Id: 5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7
//! Timestamp: 2012-01-01T00:00:00Z
//! Sender-Name:
//! Sender-Address:
//! Sender-Address-Type:
//! Message-Reference:
//! Hops: 0
//! Content-Type: text/plain
//!
//! Hello
//! ```
//!
//! Empty values are written as the bare label and a colon. On input, labels
//! are matched ignoring case, one space after the colon is dropped, a
//! trailing `\r` is tolerated and optional headers may be left out.

use crate::error::{CoreError, ParseError};
use crate::field::{Field, TEXT_MAXIMUM_SIZE};
use crate::message::MessageRecord;
use crate::validation::validate_structure;

/// MIME type of the text representation.
pub const TEXT_MIME: &str = "text/hearsay";

/// Older name for [`TEXT_MIME`], still accepted.
pub const TEXT_MIME_ALIAS: &str = "text/x-hearsay";

/// Render a record in the text representation.
pub fn serialize(record: &MessageRecord) -> String {
    let mut out = String::with_capacity(256 + record.message_body.len());
    for field in Field::ALL {
        if field == Field::MessageBody {
            continue;
        }
        out.push_str(field.label());
        out.push(':');
        let value = record.field(field);
        if !value.is_empty() {
            out.push(' ');
            if field == Field::Id {
                out.push_str(&value.to_ascii_lowercase());
            } else {
                out.push_str(value);
            }
        }
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&record.message_body);
    out
}

/// Parse the text representation into a record.
///
/// Checks framing, field lengths and presence of required fields. Field
/// formats are left to [`validate_structure`].
pub fn parse(input: impl AsRef<[u8]>) -> Result<MessageRecord, ParseError> {
    let bytes = input.as_ref();
    if bytes.len() > TEXT_MAXIMUM_SIZE {
        return Err(ParseError::InputTooLarge {
            max: TEXT_MAXIMUM_SIZE,
            actual: bytes.len(),
        });
    }
    let text =
        std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidEncoding(e.valid_up_to()))?;

    let mut record = MessageRecord::default();
    let mut seen = [false; Field::ALL.len()];
    let mut rest = text;
    let mut line_no = 0;

    let body = loop {
        line_no += 1;
        let Some((line, tail)) = rest.split_once('\n') else {
            return Err(ParseError::MissingBody);
        };
        rest = tail;
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            break rest;
        }

        let (label, value) = line
            .split_once(':')
            .ok_or(ParseError::MalformedLine { line: line_no })?;
        let field = Field::from_label(label.trim())
            .filter(|f| *f != Field::MessageBody)
            .ok_or_else(|| ParseError::UnknownField {
                line: Some(line_no),
                name: label.trim().to_string(),
            })?;

        let slot = field as usize;
        if seen[slot] {
            return Err(ParseError::DuplicateField(field));
        }
        seen[slot] = true;

        let value = value.strip_prefix(' ').unwrap_or(value);
        check_len(field, value)?;
        *record.field_mut(field) = value.to_string();
    };

    check_len(Field::MessageBody, body)?;
    record.message_body = body.to_string();
    record.id.make_ascii_lowercase();

    for field in Field::ALL {
        if field.is_required() && record.field(field).is_empty() {
            return Err(ParseError::MissingField(field));
        }
    }
    Ok(record)
}

fn check_len(field: Field, value: &str) -> Result<(), ParseError> {
    let actual = value.chars().count();
    if actual > field.max_len() {
        return Err(ParseError::FieldTooLong {
            field,
            max: field.max_len(),
            actual,
        });
    }
    Ok(())
}

/// Whether `input` is a structurally valid text-form message.
pub fn validate(input: impl AsRef<[u8]>) -> Result<(), CoreError> {
    let record = parse(input)?;
    validate_structure(&record)?;
    Ok(())
}
