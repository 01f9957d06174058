//! The `application/json` representation.
//!
//! A flat object with one string value per field, keyed by the field's
//! Field Model key and written in wire order. Every key is always present
//! on output; optional keys may be omitted on input, but none may repeat.

use std::fmt;

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::{Map, Value};

use crate::error::{CoreError, ParseError};
use crate::field::Field;
use crate::message::MessageRecord;
use crate::validation::validate_structure;

/// MIME type of the JSON representation.
pub const JSON_MIME: &str = "application/json";

/// Upper bound, in bytes, of a JSON-form message worth parsing.
///
/// Every value at full length with each char escaped as a surrogate pair.
pub const JSON_MAXIMUM_SIZE: usize = json_maximum_size();

const fn json_maximum_size() -> usize {
    // `\uXXXX\uXXXX`
    const MAX_ESCAPED_WIDTH: usize = 12;
    let mut total = 2;
    let mut i = 0;
    while i < Field::ALL.len() {
        let field = Field::ALL[i];
        // "key": "value",
        total += field.key().len() + 6 + field.max_len() * MAX_ESCAPED_WIDTH + 2;
        i += 1;
    }
    total
}

/// Convert a record to a JSON object.
pub fn serialize(record: &MessageRecord) -> Value {
    let mut map = Map::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        let value = match field {
            Field::Id => record.id.to_ascii_lowercase(),
            _ => record.field(field).to_string(),
        };
        map.insert(field.key().to_string(), Value::String(value));
    }
    Value::Object(map)
}

/// Render a record as a compact JSON string.
pub fn to_string(record: &MessageRecord) -> String {
    serialize(record).to_string()
}

/// Parse a JSON document into a record.
pub fn parse(input: impl AsRef<[u8]>) -> Result<MessageRecord, ParseError> {
    let bytes = input.as_ref();
    if bytes.len() > JSON_MAXIMUM_SIZE {
        return Err(ParseError::InputTooLarge {
            max: JSON_MAXIMUM_SIZE,
            actual: bytes.len(),
        });
    }
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    // `Value` keeps only the last of repeated keys.
    if value.is_object() {
        let ObjectKeys(keys) =
            serde_json::from_slice(bytes).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
        check_unique(&keys)?;
    }
    from_value(&value)
}

fn check_unique(keys: &[String]) -> Result<(), ParseError> {
    let mut seen = [false; Field::ALL.len()];
    for key in keys {
        if let Some(field) = Field::from_key(key) {
            let slot = field as usize;
            if seen[slot] {
                return Err(ParseError::DuplicateField(field));
            }
            seen[slot] = true;
        }
    }
    Ok(())
}

/// Keys of a JSON object in document order, repeats included.
struct ObjectKeys(Vec<String>);

impl<'de> Deserialize<'de> for ObjectKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = ObjectKeys;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ObjectKeys, A::Error> {
                let mut keys = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    map.next_value::<IgnoredAny>()?;
                    keys.push(key);
                }
                Ok(ObjectKeys(keys))
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

/// Build a record from an already-decoded JSON value.
pub fn from_value(value: &Value) -> Result<MessageRecord, ParseError> {
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    let mut record = MessageRecord::default();
    for (key, value) in object {
        let field = Field::from_key(key).ok_or_else(|| ParseError::UnknownField {
            line: None,
            name: key.clone(),
        })?;
        let text = value.as_str().ok_or(ParseError::NotAString(field))?;
        let actual = text.chars().count();
        if actual > field.max_len() {
            return Err(ParseError::FieldTooLong {
                field,
                max: field.max_len(),
                actual,
            });
        }
        *record.field_mut(field) = text.to_string();
    }
    record.id.make_ascii_lowercase();

    for field in Field::ALL {
        if field.is_required() && record.field(field).is_empty() {
            return Err(ParseError::MissingField(field));
        }
    }
    Ok(record)
}

/// Whether `input` is a structurally valid JSON-form message.
pub fn validate(input: impl AsRef<[u8]>) -> Result<(), CoreError> {
    let record = parse(input)?;
    validate_structure(&record)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario_a() -> MessageRecord {
        MessageRecord {
            version: "0.0".into(),
            timestamp: "2012-01-01T00:00:00Z".into(),
            n_hops: "0".into(),
            content_type: "text/plain".into(),
            message_body: "Hello".into(),
            ..MessageRecord::default()
        }
        .hashed()
    }

    #[test]
    fn test_serialize_keys_in_wire_order() {
        let value = serialize(&scenario_a());
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let expected: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys, expected);
        assert_eq!(value["sender_name"], json!(""));
        assert_eq!(value["n_hops"], json!("0"));
    }

    #[test]
    fn test_roundtrip() {
        let mut record = scenario_a();
        record.message_body = "quote \" backslash \\ newline \n tab \t".into();
        assert_eq!(parse(to_string(&record)).unwrap(), record);
        assert_eq!(from_value(&serialize(&record)).unwrap(), record);
    }

    #[test]
    fn test_optional_keys_may_be_omitted() {
        let doc = json!({
            "version": "0.0",
            "id": scenario_a().id.to_uppercase(),
            "timestamp": "2012-01-01T00:00:00Z",
            "n_hops": "0",
            "content_type": "text/plain",
            "message_body": "Hello",
        });
        assert_eq!(from_value(&doc).unwrap(), scenario_a());
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(
            parse("{not json").unwrap_err(),
            ParseError::InvalidJson(_)
        ));
        assert_eq!(parse("[1, 2]").unwrap_err(), ParseError::NotAnObject);

        let mut doc = serialize(&scenario_a());
        doc["n_hops"] = json!(0);
        assert_eq!(
            from_value(&doc).unwrap_err(),
            ParseError::NotAString(Field::NHops)
        );

        let mut doc = serialize(&scenario_a());
        doc["priority"] = json!("high");
        assert!(matches!(
            from_value(&doc).unwrap_err(),
            ParseError::UnknownField { line: None, .. }
        ));

        let mut doc = serialize(&scenario_a());
        doc["content_type"] = json!(format!("text/{}", "x".repeat(251)));
        assert_eq!(
            from_value(&doc).unwrap_err().field(),
            Some(Field::ContentType)
        );

        let repeated = to_string(&scenario_a()).replacen('{', r#"{"version":"0.1","#, 1);
        assert_eq!(
            parse(repeated).unwrap_err(),
            ParseError::DuplicateField(Field::Version)
        );

        let mut doc = serialize(&scenario_a());
        doc.as_object_mut().unwrap().remove("message_body");
        assert_eq!(
            from_value(&doc).unwrap_err(),
            ParseError::MissingField(Field::MessageBody)
        );
    }

    #[test]
    fn test_id_is_written_lowercase() {
        let record = scenario_a();
        let mut shouting = record.clone();
        shouting.id.make_ascii_uppercase();

        assert_eq!(serialize(&shouting)["id"], json!(record.id));
        assert_eq!(parse(to_string(&shouting)).unwrap(), record);
    }

    #[test]
    fn test_agrees_with_text_codec() {
        let record = scenario_a();
        let via_json = parse(to_string(&record)).unwrap();
        let via_text = crate::text::parse(crate::text::serialize(&record)).unwrap();
        assert_eq!(via_json, via_text);
        assert_eq!(via_json.compute_id(), via_text.compute_id());
    }

    #[test]
    fn test_validate() {
        validate(to_string(&scenario_a())).unwrap();

        let mut record = scenario_a();
        record.timestamp = "yesterday".into();
        assert_eq!(
            validate(to_string(&record)).unwrap_err().field(),
            Some(Field::Timestamp)
        );
    }
}
