//! Proptest generators for property-based testing.
//!
//! Every strategy here yields values that pass structural validation.

use std::net::{Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;

use hearsay_core::{AddressType, MessageBuilder, MessageId, MessageRecord};

/// Generate a random MessageId.
pub fn message_id() -> impl Strategy<Value = MessageId> {
    any::<[u8; 32]>().prop_map(MessageId::from_bytes)
}

/// Generate a `M.N` or `MM.NN` version.
pub fn version() -> impl Strategy<Value = String> {
    (0u8..=99, 0u8..=99).prop_map(|(major, minor)| format!("{major}.{minor}"))
}

/// Generate a timestamp. Days stop at 28 so every month is valid.
pub fn timestamp() -> impl Strategy<Value = String> {
    (1970u32..=9999, 1u32..=12, 1u32..=28, 0u32..=23, 0u32..=59, 0u32..=59).prop_map(
        |(y, mo, d, h, mi, s)| format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z"),
    )
}

/// Generate a sender name, possibly empty.
pub fn sender_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Za-z0-9][A-Za-z0-9 ._-]{0,40}".prop_map(String::from),
    ]
}

/// Generate an address with its matching type.
pub fn sender() -> impl Strategy<Value = (AddressType, String)> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(|b| (AddressType::IPv4, Ipv4Addr::from(b).to_string())),
        any::<[u16; 8]>().prop_map(|s| (AddressType::IPv6, Ipv6Addr::from(s).to_string())),
        any::<[u8; 6]>().prop_map(|b| {
            let octets: Vec<String> = b.iter().map(|o| format!("{o:02x}")).collect();
            (AddressType::Mac, octets.join(":"))
        }),
    ]
}

/// Generate a hop count.
pub fn n_hops() -> impl Strategy<Value = String> {
    (0u32..=99_999).prop_map(|n| n.to_string())
}

/// Generate a content type.
pub fn content_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("text/plain".to_string()),
        Just("text/plain; charset=utf-8".to_string()),
        Just("text/markdown".to_string()),
        Just("application/json".to_string()),
        "[a-z]{1,10}/[a-z0-9][a-z0-9.+-]{0,19}".prop_map(String::from),
    ]
}

/// Generate a non-empty message body of at most `max_len` chars.
pub fn body(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![9 => any::<char>(), 1 => Just('\n')], 1..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Parameters for generating a message.
#[derive(Debug, Clone)]
pub struct MessageParams {
    pub version: String,
    pub timestamp: String,
    pub sender_name: String,
    pub sender: Option<(AddressType, String)>,
    pub message_reference: Option<MessageId>,
    pub n_hops: String,
    pub content_type: String,
    pub body: String,
}

impl Arbitrary for MessageParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            version(),
            timestamp(),
            sender_name(),
            prop::option::of(sender()),
            prop::option::of(message_id()),
            n_hops(),
            content_type(),
            body(300),
        )
            .prop_map(
                |(version, timestamp, sender_name, sender, reference, n_hops, content_type, body)| {
                    MessageParams {
                        version,
                        timestamp,
                        sender_name,
                        sender,
                        message_reference: reference,
                        n_hops,
                        content_type,
                        body,
                    }
                },
            )
            .boxed()
    }
}

/// Build the drafted record for a set of parameters.
pub fn message_from_params(params: &MessageParams) -> MessageRecord {
    let mut builder = MessageBuilder::new()
        .version(params.version.clone())
        .timestamp(params.timestamp.clone())
        .sender_name(params.sender_name.clone())
        .content_type(params.content_type.clone())
        .body(params.body.clone());
    if let Some((kind, address)) = &params.sender {
        builder = builder.sender(*kind, address.clone());
    }
    if let Some(reference) = params.message_reference {
        builder = builder.reply_to(reference);
    }
    let mut record = builder.draft();
    record.n_hops = params.n_hops.clone();
    record
}
