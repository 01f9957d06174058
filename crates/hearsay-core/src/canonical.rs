//! Canonical content: the exact bytes a message id is computed over.
//!
//! The identity fields are concatenated in [`Field::CANONICAL`] order, each
//! contributing the UTF-8 bytes of its logical value. There are no
//! separators, no padding and no length prefixes. `id` and `n_hops` never
//! contribute.
//!
//! The encoding is critical: any implementation that orders, pads or
//! filters fields differently computes different ids and cannot
//! interoperate.

use crate::error::ResourceExhausted;
use crate::field::Field;
use crate::message::MessageRecord;

/// Length in bytes of the canonical content of `record`.
pub fn canonical_len(record: &MessageRecord) -> usize {
    Field::CANONICAL
        .iter()
        .map(|&f| record.field(f).len())
        .sum()
}

/// Encode a record's identity fields to canonical bytes.
///
/// The caller is expected to have validated the record first; over-long
/// fields are encoded as given.
pub fn canonicalize(record: &MessageRecord) -> Vec<u8> {
    let mut buf = Vec::with_capacity(canonical_len(record));
    write_fields(&mut buf, record);
    buf
}

/// Like [`canonicalize`], but reports allocation failure instead of aborting.
pub fn try_canonicalize(record: &MessageRecord) -> Result<Vec<u8>, ResourceExhausted> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(canonical_len(record))?;
    write_fields(&mut buf, record);
    Ok(buf)
}

fn write_fields(buf: &mut Vec<u8>, record: &MessageRecord) {
    for field in Field::CANONICAL {
        buf.extend_from_slice(record.field(field).as_bytes());
    }
}
