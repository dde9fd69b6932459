//! BER length field encoding and decoding.
//!
//! X.690 Section 8.1.3: lengths below 128 use the short form (one octet);
//! anything larger uses the long form, an initial octet `0x80 | n` followed
//! by `n` big-endian length octets. The indefinite form (bare 0x80) is
//! rejected; SNMP never uses it.

use crate::error::{BadValueKind, Error, Result};

/// Largest content length the decoder will accept.
///
/// SNMPv1 datagrams are bounded by [`crate::MAX_MESSAGE_SIZE`], so any
/// long-form length past 64 KiB is hostile or corrupt input, not a message.
pub const MAX_CONTENT_LEN: usize = 0xFFFF;

/// Number of octets `push_length` will emit for a given content length.
pub fn length_encoded_len(len: usize) -> usize {
    if len < 128 {
        1
    } else {
        let mut octets = 0;
        let mut rest = len;
        while rest > 0 {
            octets += 1;
            rest >>= 8;
        }
        1 + octets
    }
}

/// Encode a length field.
///
/// Returns the octets in **reverse** order together with their count, ready
/// for prepending into a back-to-front [`super::EncodeBuf`].
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut out = [0u8; 5];

    if len < 128 {
        out[0] = len as u8;
        return (out, 1);
    }

    let mut count = 0;
    let mut rest = len;
    while rest > 0 {
        out[count] = rest as u8;
        rest >>= 8;
        count += 1;
    }
    out[count] = 0x80 | count as u8;
    (out, count + 1)
}

/// Decode a length field from the front of `data`.
///
/// Returns `(content_length, octets_consumed)`. `base_offset` is the
/// position of `data[0]` within the enclosing buffer, used only for error
/// reporting.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let first = *data
        .first()
        .ok_or_else(|| Error::bad_value(base_offset, BadValueKind::TruncatedData))?;

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    if first == 0x80 {
        return Err(Error::bad_value(base_offset, BadValueKind::IndefiniteLength));
    }

    let octets = (first & 0x7F) as usize;
    if octets > 4 {
        return Err(Error::bad_value(
            base_offset,
            BadValueKind::LengthTooLong { octets },
        ));
    }
    if data.len() < 1 + octets {
        return Err(Error::bad_value(base_offset, BadValueKind::TruncatedData));
    }

    let mut len: usize = 0;
    for &byte in &data[1..=octets] {
        len = (len << 8) | byte as usize;
    }

    if len > MAX_CONTENT_LEN {
        return Err(Error::bad_value(
            base_offset,
            BadValueKind::LengthExceedsMax {
                length: len,
                max: MAX_CONTENT_LEN,
            },
        ));
    }

    Ok((len, 1 + octets))
}
