//! Property tests over generated messages.

use proptest::prelude::*;

use hearsay_core::field::MESSAGE_BODY_MAX_LEN;
use hearsay_core::{
    canonicalize, json, text, validate_identity, validate_message, validate_structure, Field,
    Violation,
};
use hearsay_testkit::generators::{body, message_from_params, n_hops, MessageParams};

proptest! {
    #[test]
    fn hops_never_change_identity(params in any::<MessageParams>(), hops in n_hops()) {
        let record = message_from_params(&params);
        let mut relayed = record.clone();
        relayed.n_hops = hops;

        prop_assert_eq!(canonicalize(&record), canonicalize(&relayed));
        prop_assert_eq!(record.compute_id(), relayed.compute_id());
    }

    #[test]
    fn stated_id_never_changes_identity(params in any::<MessageParams>()) {
        let record = message_from_params(&params);
        let hashed = record.clone().hashed();
        prop_assert_eq!(record.compute_id(), hashed.compute_id());
    }

    #[test]
    fn every_canonical_field_is_covered(params in any::<MessageParams>()) {
        let record = message_from_params(&params);
        let id = record.compute_id();
        for field in Field::CANONICAL {
            let mut edited = record.clone();
            edited.field_mut(field).push('0');
            prop_assert_ne!(edited.compute_id(), id.clone(), "{} not covered", field);
        }
    }

    #[test]
    fn text_round_trip(params in any::<MessageParams>()) {
        let record = message_from_params(&params).hashed();
        let parsed = text::parse(text::serialize(&record)).unwrap();
        prop_assert_eq!(parsed, record);
    }

    #[test]
    fn json_round_trip(params in any::<MessageParams>()) {
        let record = message_from_params(&params).hashed();
        let parsed = json::parse(json::to_string(&record)).unwrap();
        prop_assert_eq!(parsed, record);
    }

    #[test]
    fn codecs_agree_on_identity(params in any::<MessageParams>()) {
        let record = message_from_params(&params).hashed();
        let from_text = text::parse(text::serialize(&record)).unwrap();
        let from_json = json::parse(json::to_string(&record)).unwrap();

        let id = validate_message(&from_text).unwrap();
        prop_assert_eq!(validate_message(&from_json).unwrap(), id);
        prop_assert_eq!(id.to_hex(), record.id);
    }

    #[test]
    fn validation_is_idempotent(params in any::<MessageParams>()) {
        let record = message_from_params(&params).hashed();
        let before = record.clone();

        let first = validate_identity(&record);
        let second = validate_identity(&record);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.unwrap().to_hex(), record.id.clone());
        prop_assert_eq!(validate_structure(&record), validate_structure(&record));
        prop_assert_eq!(record, before);
    }

    #[test]
    fn oversized_body_rejected(extra in 1usize..50) {
        let mut long_body = "x".repeat(MESSAGE_BODY_MAX_LEN);
        long_body.push_str(&"y".repeat(extra));
        let record = hearsay_core::MessageBuilder::new()
            .timestamp("2012-01-01T00:00:00Z")
            .body(long_body)
            .draft();

        let err = validate_structure(&record).unwrap_err();
        prop_assert_eq!(err.field, Field::MessageBody);
        prop_assert_eq!(
            err.reason,
            Violation::TooLong { max: MESSAGE_BODY_MAX_LEN, actual: MESSAGE_BODY_MAX_LEN + extra }
        );
        prop_assert!(text::parse(text::serialize(&record)).is_err());
    }

    #[test]
    fn edited_body_detected(params in any::<MessageParams>(), other in body(50)) {
        prop_assume!(params.body != other);
        let mut record = message_from_params(&params).hashed();
        record.message_body = other;
        prop_assert!(validate_message(&record).is_err());
    }
}
