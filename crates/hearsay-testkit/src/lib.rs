//! # Hearsay Testkit
//!
//! Testing utilities for Hearsay.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known messages with expected canonical bytes and ids
//! - **Generators**: Proptest strategies for valid messages
//! - **Fixtures**: A ready node and helpers for driving its HTTP resources
//!
//! ## Golden Vectors
//!
//! Every implementation must hash these messages to the same ids:
//!
//! ```rust
//! use hearsay_testkit::vectors::{all_vectors, record_from_vector};
//!
//! for vector in all_vectors() {
//!     let record = record_from_vector(&vector);
//!     assert_eq!(record.compute_id(), vector.expected_id);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use hearsay_testkit::generators::{message_from_params, MessageParams};
//!
//! proptest! {
//!     #[test]
//!     fn id_is_deterministic(params: MessageParams) {
//!         let record = message_from_params(&params);
//!         prop_assert_eq!(record.compute_id(), record.compute_id());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use hearsay_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let draft = fixture.make_message("Hello");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{peer_fixtures, TestFixture};
pub use generators::{message_from_params, MessageParams};
pub use vectors::{all_vectors, record_from_vector, verify_all_vectors, GoldenVector};
