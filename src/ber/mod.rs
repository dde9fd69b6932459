//! ASN.1/BER codec.
//!
//! [`Decoder`] walks a received buffer as a cursor over zero-copy [`Bytes`];
//! [`EncodeBuf`] builds messages back-to-front so every length field is known
//! when it is written, with no second pass and no length back-patching.
//!
//! Only single-octet tags are supported. SNMPv1's fixed tag set never reaches
//! tag number 31, so the high-tag-number form is deliberately unimplemented;
//! such a tag byte decodes as an [`crate::Value::Unknown`] with whatever
//! content its length announces.

mod decode;
mod length;

pub use decode::{Decoder, Tlv};
pub use length::{MAX_CONTENT_LEN, decode_length, encode_length, length_encoded_len};

use bytes::Bytes;

use crate::oid::Oid;

/// BER tag bytes used by SNMPv1.
pub mod tag {
    /// Universal class (X.690).
    pub mod universal {
        pub const INTEGER: u8 = 0x02;
        pub const BIT_STRING: u8 = 0x03;
        pub const OCTET_STRING: u8 = 0x04;
        pub const NULL: u8 = 0x05;
        pub const OBJECT_IDENTIFIER: u8 = 0x06;
        pub const SEQUENCE: u8 = 0x30;
    }

    /// Application class (RFC 1155 / RFC 1442 SMI types).
    pub mod application {
        pub const IP_ADDRESS: u8 = 0x40;
        pub const COUNTER32: u8 = 0x41;
        pub const GAUGE32: u8 = 0x42;
        pub const TIMETICKS: u8 = 0x43;
        pub const NSAP_ADDRESS: u8 = 0x45;
        pub const COUNTER64: u8 = 0x46;
        pub const UINTEGER32: u8 = 0x47;
    }

    /// Context class: SNMPv1 PDU tags (RFC 1157, implicit tagging).
    pub mod pdu {
        pub const GET_REQUEST: u8 = 0xA0;
        pub const GET_NEXT_REQUEST: u8 = 0xA1;
        pub const GET_RESPONSE: u8 = 0xA2;
        pub const SET_REQUEST: u8 = 0xA3;
        pub const TRAP: u8 = 0xA4;
    }
}

/// Content octets needed for a signed INTEGER (minimal two's complement).
pub fn integer_content_len(v: i32) -> usize {
    let mut n = 4;
    while n > 1 {
        let hi = (v >> ((n - 1) * 8)) as u8;
        let next_msb = ((v >> ((n - 2) * 8)) as u8) & 0x80;
        if (hi == 0x00 && next_msb == 0) || (hi == 0xFF && next_msb != 0) {
            n -= 1;
        } else {
            break;
        }
    }
    n
}

/// Content octets needed for an unsigned 32-bit value.
///
/// One more than the significant byte count when the top bit of the leading
/// byte is set, since the content is still a signed INTEGER encoding.
pub fn unsigned32_content_len(v: u32) -> usize {
    let mut n = 1;
    let mut rest = v >> 8;
    while rest > 0 {
        n += 1;
        rest >>= 8;
    }
    if (v >> ((n - 1) * 8)) & 0x80 != 0 { n + 1 } else { n }
}

/// Content octets needed for an unsigned 64-bit value.
pub fn unsigned64_content_len(v: u64) -> usize {
    let mut n = 1;
    let mut rest = v >> 8;
    while rest > 0 {
        n += 1;
        rest >>= 8;
    }
    if (v >> ((n - 1) * 8)) & 0x80 != 0 { n + 1 } else { n }
}

/// Reverse-building BER encoder.
///
/// Octets are stored innermost-first; [`EncodeBuf::finish`] reverses once at
/// the end. Because of this, composite structures are written *inside-out*:
/// push the content, then its length, then its tag. [`push_constructed`]
/// wraps that pattern for SEQUENCE-like frames.
///
/// ```
/// use snmpv1::ber::{EncodeBuf, tag};
///
/// let mut buf = EncodeBuf::new();
/// buf.push_integer(5);
/// assert_eq!(buf.finish().as_ref(), &[0x02, 0x01, 0x05]);
/// ```
///
/// [`push_constructed`]: EncodeBuf::push_constructed
#[derive(Default)]
pub struct EncodeBuf {
    // Reversed octets; index 0 is the *last* byte of the final message.
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { buf: Vec::with_capacity(crate::MAX_MESSAGE_SIZE) }
    }

    /// Number of octets written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn raw_push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Append raw content octets (given in wire order).
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buf.extend(data.iter().rev());
    }

    /// Append a tag byte.
    pub fn push_tag(&mut self, tag: u8) {
        self.raw_push(tag);
    }

    /// Append a length field for `len` content octets.
    pub fn push_length(&mut self, len: usize) {
        let (octets, n) = encode_length(len);
        // encode_length already yields reversed octets
        self.buf.extend_from_slice(&octets[..n]);
    }

    /// Append a complete INTEGER TLV.
    pub fn push_integer(&mut self, v: i32) {
        let n = integer_content_len(v);
        for i in 0..n {
            self.raw_push((v >> (8 * i)) as u8);
        }
        self.push_length(n);
        self.push_tag(tag::universal::INTEGER);
    }

    /// Append an unsigned 32-bit TLV with the given application tag
    /// (Counter32, Gauge32, TimeTicks, UInteger32).
    pub fn push_unsigned32(&mut self, tag: u8, v: u32) {
        let mut sig = 1;
        let mut rest = v >> 8;
        while rest > 0 {
            sig += 1;
            rest >>= 8;
        }
        for i in 0..sig {
            self.raw_push((v >> (8 * i)) as u8);
        }
        let mut n = sig;
        if (v >> ((sig - 1) * 8)) & 0x80 != 0 {
            self.raw_push(0x00);
            n += 1;
        }
        self.push_length(n);
        self.push_tag(tag);
    }

    /// Append an unsigned 64-bit TLV (Counter64).
    pub fn push_unsigned64(&mut self, tag: u8, v: u64) {
        let mut sig = 1;
        let mut rest = v >> 8;
        while rest > 0 {
            sig += 1;
            rest >>= 8;
        }
        for i in 0..sig {
            self.raw_push((v >> (8 * i)) as u8);
        }
        let mut n = sig;
        if (v >> ((sig - 1) * 8)) & 0x80 != 0 {
            self.raw_push(0x00);
            n += 1;
        }
        self.push_length(n);
        self.push_tag(tag);
    }

    /// Append an OCTET STRING TLV.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_tagged(tag::universal::OCTET_STRING, data);
    }

    /// Append a TLV with arbitrary tag and raw content.
    pub fn push_tagged(&mut self, tag: u8, data: &[u8]) {
        self.push_bytes(data);
        self.push_length(data.len());
        self.push_tag(tag);
    }

    /// Append a NULL TLV.
    pub fn push_null(&mut self) {
        self.push_length(0);
        self.push_tag(tag::universal::NULL);
    }

    /// Append an OBJECT IDENTIFIER TLV.
    pub fn push_oid(&mut self, oid: &Oid) {
        let content = oid.encode_content();
        self.push_bytes(&content);
        self.push_length(content.len());
        self.push_tag(tag::universal::OBJECT_IDENTIFIER);
    }

    /// Append an IpAddress TLV (APPLICATION 0, four octets).
    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_tagged(tag::application::IP_ADDRESS, &addr);
    }

    /// Append a SEQUENCE frame around whatever `f` writes.
    pub fn push_sequence(&mut self, f: impl FnOnce(&mut Self)) {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Append a constructed frame with the given tag around whatever `f`
    /// writes. Remember the reverse discipline: `f` must write its fields in
    /// reverse field order.
    pub fn push_constructed(&mut self, tag: u8, f: impl FnOnce(&mut Self)) {
        let before = self.buf.len();
        f(self);
        let content_len = self.buf.len() - before;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Finalize into wire-order bytes.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_content_lengths() {
        assert_eq!(integer_content_len(0), 1);
        assert_eq!(integer_content_len(127), 1);
        assert_eq!(integer_content_len(128), 2);
        assert_eq!(integer_content_len(-1), 1);
        assert_eq!(integer_content_len(-128), 1);
        assert_eq!(integer_content_len(-129), 2);
        assert_eq!(integer_content_len(i32::MAX), 4);
        assert_eq!(integer_content_len(i32::MIN), 4);
    }

    #[test]
    fn unsigned_content_lengths() {
        assert_eq!(unsigned32_content_len(0), 1);
        assert_eq!(unsigned32_content_len(127), 1);
        assert_eq!(unsigned32_content_len(128), 2); // leading 0x00
        assert_eq!(unsigned32_content_len(0xFFFF_FFFF), 5);
        assert_eq!(unsigned64_content_len(u64::MAX), 9);
    }

    #[test]
    fn encode_integer() {
        let mut buf = EncodeBuf::new();
        buf.push_integer(128);
        assert_eq!(buf.finish().as_ref(), &[0x02, 0x02, 0x00, 0x80]);

        let mut buf = EncodeBuf::new();
        buf.push_integer(-1);
        assert_eq!(buf.finish().as_ref(), &[0x02, 0x01, 0xFF]);
    }

    #[test]
    fn encode_unsigned_with_leading_zero() {
        let mut buf = EncodeBuf::new();
        buf.push_unsigned32(tag::application::COUNTER32, 0x80);
        assert_eq!(buf.finish().as_ref(), &[0x41, 0x02, 0x00, 0x80]);
    }

    #[test]
    fn encode_null() {
        let mut buf = EncodeBuf::new();
        buf.push_null();
        assert_eq!(buf.finish().as_ref(), &[0x05, 0x00]);
    }

    #[test]
    fn encode_nested_sequence() {
        // SEQUENCE { INTEGER 1, INTEGER 2 } - fields pushed in reverse
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            buf.push_integer(2);
            buf.push_integer(1);
        });
        assert_eq!(
            buf.finish().as_ref(),
            &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]
        );
    }

    #[test]
    fn encode_octet_string() {
        let mut buf = EncodeBuf::new();
        buf.push_octet_string(b"hi");
        assert_eq!(buf.finish().as_ref(), &[0x04, 0x02, b'h', b'i']);
    }
}
