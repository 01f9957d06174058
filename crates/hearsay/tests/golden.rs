//! Golden test vectors for cross-implementation verification.
//!
//! Every Hearsay implementation must produce identical:
//! - canonical bytes
//! - id (lowercase hex SHA-256 of the canonical bytes)
//! - text/hearsay rendering
//! - JSON rendering

use hearsay::core::{canonicalize, json, text};
use hearsay::{AddressType, CoreError, IdentityError, MessageBuilder, MessageId, MessageRecord};
use serde::{Deserialize, Serialize};

/// A single golden test vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Derived outputs
    pub canonical: String,
    pub id: String,
    pub text: String,
    pub json: String,
}

fn at_epoch() -> MessageBuilder {
    MessageBuilder::new().timestamp("2012-01-01T00:00:00Z")
}

fn generate_vector(name: &str, description: &str, draft: MessageRecord) -> GoldenVector {
    let record = draft.hashed();
    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        canonical: String::from_utf8(canonicalize(&record)).expect("canonical bytes are UTF-8"),
        id: record.id.clone(),
        text: text::serialize(&record),
        json: json::to_string(&record),
    }
}

pub fn generate_all_vectors() -> Vec<GoldenVector> {
    let hello = at_epoch().body("Hello").draft();
    vec![
        generate_vector("minimal", "Required fields only", hello.clone()),
        generate_vector(
            "edited_body",
            "One character added to the body",
            at_epoch().body("Hello!").draft(),
        ),
        generate_vector(
            "with_sender",
            "Sender name, address and address type",
            at_epoch()
                .sender_name("alice")
                .sender(AddressType::IPv4, "10.0.0.1")
                .body("Hi")
                .draft(),
        ),
        generate_vector(
            "reply",
            "Message reference to the minimal vector",
            at_epoch()
                .reply_to(hello.content_id())
                .body("re: Hello")
                .draft(),
        ),
        generate_vector(
            "multiline_body",
            "Body with an embedded newline",
            at_epoch().body("line one\nline two").draft(),
        ),
        generate_vector(
            "unicode_body",
            "Body outside ASCII",
            at_epoch().body("Héllo ☃").draft(),
        ),
    ]
}

const EXPECTED: &[(&str, &str, &str)] = &[
    (
        "minimal",
        "0.02012-01-01T00:00:00Ztext/plainHello",
        "5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7",
    ),
    (
        "edited_body",
        "0.02012-01-01T00:00:00Ztext/plainHello!",
        "3e1c70f9a01ba575726a770365723fcbc565878ec49422aa340f134997a6f062",
    ),
    (
        "with_sender",
        "0.02012-01-01T00:00:00Zalice10.0.0.1IPv4text/plainHi",
        "a34f037c0419766e458bcd7da8215fa2d215337eb79b6c2b2941336afddd62f3",
    ),
    (
        "reply",
        concat!(
            "0.02012-01-01T00:00:00Z",
            "5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7",
            "text/plainre: Hello",
        ),
        "876d0a1b54c486dfeb5d3776c6b43e68984e7089758e87680886dc11f561e432",
    ),
    (
        "multiline_body",
        "0.02012-01-01T00:00:00Ztext/plainline one\nline two",
        "5f661cd1f36af8d718baa7e5e086fcf5b2cf3ee605c445c318427bcb34f7c3ef",
    ),
    (
        "unicode_body",
        "0.02012-01-01T00:00:00Ztext/plainHéllo ☃",
        "9853f0320fc88c58293a377fd519cf20540284681f7581673cca980b0b7afdf9",
    ),
];

#[test]
fn test_vectors_match_expected() {
    let vectors = generate_all_vectors();
    assert_eq!(vectors.len(), EXPECTED.len());

    for (v, (name, canonical, id)) in vectors.iter().zip(EXPECTED) {
        assert_eq!(v.name, *name);
        assert_eq!(v.canonical, *canonical, "canonical mismatch for {}", v.name);
        assert_eq!(v.id, *id, "id mismatch for {}", v.name);
    }
}

#[test]
fn test_vectors_deterministic() {
    let a = generate_all_vectors();
    let b = generate_all_vectors();

    for (a, b) in a.iter().zip(b.iter()) {
        assert_eq!(a.canonical, b.canonical, "canonical mismatch for {}", a.name);
        assert_eq!(a.id, b.id, "id mismatch for {}", a.name);
        assert_eq!(a.text, b.text, "text mismatch for {}", a.name);
        assert_eq!(a.json, b.json, "json mismatch for {}", a.name);
    }
}

#[test]
fn test_vectors_parse_back() {
    for v in generate_all_vectors() {
        let from_text = text::parse(&v.text).unwrap();
        let from_json = json::parse(&v.json).unwrap();
        assert_eq!(from_text, from_json, "codecs disagree for {}", v.name);
        assert_eq!(from_text.compute_id(), v.id, "text id mismatch for {}", v.name);
        assert_eq!(
            hearsay::core::validate_message(&from_json).unwrap().to_hex(),
            v.id,
            "json id mismatch for {}",
            v.name
        );
    }
}

#[test]
fn print_golden_vectors_json() {
    let vectors = generate_all_vectors();
    let json = serde_json::to_string_pretty(&vectors).unwrap();
    println!("{}", json);
}

// ============================================================================
// Wire forms
// ============================================================================

#[test]
fn test_minimal_text_form() {
    let record = at_epoch().body("Hello").draft().hashed();
    assert_eq!(
        text::serialize(&record),
        "Version: 0.0\n\
         Id: 5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7\n\
         Timestamp: 2012-01-01T00:00:00Z\n\
         Sender-Name:\n\
         Sender-Address:\n\
         Sender-Address-Type:\n\
         Message-Reference:\n\
         Hops: 0\n\
         Content-Type: text/plain\n\
         \n\
         Hello"
    );
}

#[test]
fn test_minimal_json_form() {
    let record = at_epoch().body("Hello").draft().hashed();
    assert_eq!(
        json::to_string(&record),
        concat!(
            r#"{"version":"0.0","#,
            r#""id":"5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7","#,
            r#""timestamp":"2012-01-01T00:00:00Z","#,
            r#""sender_name":"","sender_address":"","sender_address_type":"","#,
            r#""message_reference":"","n_hops":"0","content_type":"text/plain","#,
            r#""message_body":"Hello"}"#,
        )
    );
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_hops_do_not_change_id() {
    let mut record = at_epoch().body("Hello").draft();
    let id = record.compute_id();
    for hops in ["1", "7", "9999"] {
        record.n_hops = hops.to_string();
        assert_eq!(record.compute_id(), id);
    }
}

#[test]
fn test_edited_body_detected() {
    let mut record = at_epoch().body("Hello").draft().hashed();
    record.message_body = "Hello!".to_string();

    match hearsay::core::validate_message(&record).unwrap_err() {
        CoreError::Identity(IdentityError::HashMismatch { stated, computed }) => {
            assert_eq!(stated, EXPECTED[0].2);
            assert_eq!(computed, EXPECTED[1].2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_uppercase_id_normalised_on_input() {
    let mut record = at_epoch().body("Hello").draft();
    record.id = EXPECTED[0].2.to_uppercase();
    assert!(matches!(
        hearsay::core::validate_message(&record),
        Err(CoreError::Structure(_))
    ));

    let wire = text::serialize(&record);
    assert!(wire.contains(EXPECTED[0].2));
    let parsed = text::parse(&wire).unwrap();
    assert_eq!(parsed.id, EXPECTED[0].2);
    let id = hearsay::core::validate_message(&parsed).unwrap();
    assert_eq!(id, MessageId::from_hex(EXPECTED[0].2).unwrap());
    assert_eq!(text::serialize(&parsed), wire);
}
