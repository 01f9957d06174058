//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical byte layout and the id derived from it.
//! The expected ids were computed independently of this codebase.

use hearsay_core::{canonicalize, AddressType, MessageBuilder, MessageRecord};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub timestamp: &'static str,
    pub sender_name: &'static str,
    /// Sender address type and address, if any.
    pub sender: Option<(AddressType, &'static str)>,
    pub message_reference: &'static str,
    pub n_hops: &'static str,
    pub body: &'static str,
    /// Expected canonical bytes, as text.
    pub expected_canonical: &'static str,
    /// Expected id (hex).
    pub expected_id: &'static str,
}

const EPOCH: &str = "2012-01-01T00:00:00Z";

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "minimal hello",
            timestamp: EPOCH,
            sender_name: "",
            sender: None,
            message_reference: "",
            n_hops: "0",
            body: "Hello",
            expected_canonical: "0.02012-01-01T00:00:00Ztext/plainHello",
            expected_id: "5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7",
        },
        GoldenVector {
            name: "minimal hello after 42 hops",
            timestamp: EPOCH,
            sender_name: "",
            sender: None,
            message_reference: "",
            n_hops: "42",
            body: "Hello",
            expected_canonical: "0.02012-01-01T00:00:00Ztext/plainHello",
            expected_id: "5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7",
        },
        GoldenVector {
            name: "edited body",
            timestamp: EPOCH,
            sender_name: "",
            sender: None,
            message_reference: "",
            n_hops: "0",
            body: "Hello!",
            expected_canonical: "0.02012-01-01T00:00:00Ztext/plainHello!",
            expected_id: "3e1c70f9a01ba575726a770365723fcbc565878ec49422aa340f134997a6f062",
        },
        GoldenVector {
            name: "with IPv4 sender",
            timestamp: EPOCH,
            sender_name: "alice",
            sender: Some((AddressType::IPv4, "10.0.0.1")),
            message_reference: "",
            n_hops: "0",
            body: "Hi",
            expected_canonical: "0.02012-01-01T00:00:00Zalice10.0.0.1IPv4text/plainHi",
            expected_id: "a34f037c0419766e458bcd7da8215fa2d215337eb79b6c2b2941336afddd62f3",
        },
        GoldenVector {
            name: "reply to minimal hello",
            timestamp: EPOCH,
            sender_name: "",
            sender: None,
            message_reference: "5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7",
            n_hops: "1",
            body: "re: Hello",
            expected_canonical: concat!(
                "0.02012-01-01T00:00:00Z",
                "5434ba358551455a69faf0805c1f7b595b3db61d691e0114a2dff0a6658f9fa7",
                "text/plainre: Hello",
            ),
            expected_id: "876d0a1b54c486dfeb5d3776c6b43e68984e7089758e87680886dc11f561e432",
        },
        GoldenVector {
            name: "non-ASCII body",
            timestamp: EPOCH,
            sender_name: "",
            sender: None,
            message_reference: "",
            n_hops: "0",
            body: "Héllo ☃",
            expected_canonical: "0.02012-01-01T00:00:00Ztext/plainHéllo ☃",
            expected_id: "9853f0320fc88c58293a377fd519cf20540284681f7581673cca980b0b7afdf9",
        },
    ]
}

/// Build the drafted record a vector describes.
pub fn record_from_vector(vector: &GoldenVector) -> MessageRecord {
    let mut builder = MessageBuilder::new()
        .timestamp(vector.timestamp)
        .sender_name(vector.sender_name)
        .body(vector.body);
    if let Some((kind, address)) = vector.sender {
        builder = builder.sender(kind, address);
    }
    let mut record = builder.draft();
    record.message_reference = vector.message_reference.to_string();
    record.n_hops = vector.n_hops.to_string();
    record
}

/// Canonical bytes of a vector's record, hex-encoded for dumps.
pub fn canonical_hex(vector: &GoldenVector) -> String {
    hex::encode(canonicalize(&record_from_vector(vector)))
}

/// Check every vector against its expected id.
///
/// Returns `(name, matches, computed id)` for each.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let id = record_from_vector(v).compute_id();
            (v.name.to_string(), id == v.expected_id, id)
        })
        .collect()
}
