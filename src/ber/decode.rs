//! BER decoding.
//!
//! [`Decoder`] is a cursor over `Bytes`; slicing out nested content is
//! zero-copy. Malformed input that announces more content than the buffer
//! holds fails with an error rather than succeeding short.

use bytes::Bytes;

use super::length::decode_length;
use super::tag;
use crate::error::{BadValueKind, Error, Result};
use crate::oid::Oid;

/// One decoded tag-length-value unit.
///
/// `total_len` covers the tag byte, the length field, and the content, so a
/// caller scanning a buffer can advance its own cursor by `total_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub tag: u8,
    pub total_len: usize,
    pub value: Bytes,
}

/// BER cursor over a byte buffer.
pub struct Decoder {
    data: Bytes,
    offset: usize,
}

impl Decoder {
    /// Create a decoder over `data`.
    pub fn new(data: Bytes) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a decoder from a slice (copies the data).
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Current byte position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Octets left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// True once the cursor has consumed the whole buffer.
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Look at the next tag byte without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    fn read_byte(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.offset)
            .ok_or_else(|| Error::bad_value(self.offset, BadValueKind::TruncatedData))?;
        self.offset += 1;
        Ok(byte)
    }

    /// Read one tag byte.
    ///
    /// Only single-octet tags exist in SNMPv1; the high-tag-number form
    /// (tag number 31 and up) is not interpreted.
    pub fn read_tag(&mut self) -> Result<u8> {
        self.read_byte()
    }

    /// Read a length field, advancing past it.
    pub fn read_length(&mut self) -> Result<usize> {
        let (len, consumed) = decode_length(&self.data[self.offset..], self.offset)?;
        self.offset += consumed;
        Ok(len)
    }

    /// Read `len` content octets without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        // saturating_add so a hostile length cannot wrap past the check
        if self.offset.saturating_add(len) > self.data.len() {
            tracing::debug!(
                target: "snmpv1::ber",
                offset = self.offset,
                needed = len,
                available = self.remaining(),
                "content length exceeds remaining buffer"
            );
            return Err(Error::bad_value(self.offset, BadValueKind::TruncatedData));
        }
        let bytes = self.data.slice(self.offset..self.offset + len);
        self.offset += len;
        Ok(bytes)
    }

    /// Read one complete TLV, returning tag, overall size, and content.
    pub fn read_tlv(&mut self) -> Result<Tlv> {
        let start = self.offset;
        let tag = self.read_tag()?;
        let len = self.read_length()?;
        let value = self.read_bytes(len)?;
        Ok(Tlv {
            tag,
            total_len: self.offset - start,
            value,
        })
    }

    /// Skip one TLV without interpreting it.
    pub fn skip_tlv(&mut self) -> Result<()> {
        let _ = self.read_tag()?;
        let len = self.read_length()?;
        let _ = self.read_bytes(len)?;
        Ok(())
    }

    /// Require a specific tag; returns the content length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let actual = self.read_tag()?;
        if actual != expected {
            return Err(Error::bad_value(
                self.offset - 1,
                BadValueKind::UnexpectedTag { expected, actual },
            ));
        }
        self.read_length()
    }

    /// Read an INTEGER TLV.
    pub fn read_integer(&mut self) -> Result<i32> {
        let len = self.expect_tag(tag::universal::INTEGER)?;
        self.read_integer_value(len)
    }

    /// Read signed integer content of a pre-read length.
    ///
    /// Content longer than 4 octets is truncated with a warning rather than
    /// rejected; permissive parsing matches deployed agents.
    pub fn read_integer_value(&mut self, len: usize) -> Result<i32> {
        if len == 0 {
            return Err(Error::bad_value(self.offset, BadValueKind::ZeroLengthInteger));
        }
        if len > 4 {
            tracing::warn!(target: "snmpv1::ber", offset = self.offset, length = len, "integer too long, truncating to 4 octets");
        }

        let bytes = self.read_bytes(len)?;
        let mut value: i32 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
        for &byte in bytes.iter().take(4) {
            value = (value << 8) | byte as i32;
        }
        Ok(value)
    }

    /// Read an unsigned 32-bit TLV with the given tag.
    pub fn read_unsigned32(&mut self, expected: u8) -> Result<u32> {
        let len = self.expect_tag(expected)?;
        self.read_unsigned32_value(len)
    }

    /// Read unsigned 32-bit content of a pre-read length.
    ///
    /// Accepts up to 5 octets (one leading zero); longer content is
    /// truncated with a warning.
    pub fn read_unsigned32_value(&mut self, len: usize) -> Result<u32> {
        if len == 0 {
            return Err(Error::bad_value(self.offset, BadValueKind::ZeroLengthInteger));
        }
        if len > 5 {
            tracing::warn!(target: "snmpv1::ber", offset = self.offset, length = len, "unsigned integer too long, truncating");
        }

        let bytes = self.read_bytes(len)?;
        let mut value: u32 = 0;
        for &byte in bytes.iter().take(5) {
            value = (value << 8) | byte as u32;
        }
        Ok(value)
    }

    /// Read unsigned 64-bit content of a pre-read length (Counter64).
    pub fn read_unsigned64_value(&mut self, len: usize) -> Result<u64> {
        if len == 0 {
            return Err(Error::bad_value(self.offset, BadValueKind::ZeroLengthInteger));
        }
        if len > 9 {
            // one leading zero plus eight value octets
            return Err(Error::bad_value(
                self.offset,
                BadValueKind::Integer64TooLong { length: len },
            ));
        }

        let bytes = self.read_bytes(len)?;
        let mut value: u64 = 0;
        for &byte in bytes.iter() {
            value = (value << 8) | byte as u64;
        }
        Ok(value)
    }

    /// Read an OCTET STRING TLV.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        let len = self.expect_tag(tag::universal::OCTET_STRING)?;
        self.read_bytes(len)
    }

    /// Read a NULL TLV.
    pub fn read_null(&mut self) -> Result<()> {
        let len = self.expect_tag(tag::universal::NULL)?;
        if len != 0 {
            return Err(Error::bad_value(self.offset, BadValueKind::InvalidNull));
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER TLV.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        self.read_oid_value(len)
    }

    /// Read OID content of a pre-read length.
    pub fn read_oid_value(&mut self, len: usize) -> Result<Oid> {
        let base = self.offset;
        let bytes = self.read_bytes(len)?;
        Oid::decode_content(&bytes).map_err(|e| match e {
            // Re-anchor content-relative offsets to this buffer
            Error::BadValue { offset, kind } => Error::bad_value(base + offset, kind),
            other => other,
        })
    }

    /// Read an IpAddress TLV (exactly four octets).
    pub fn read_ip_address(&mut self) -> Result<[u8; 4]> {
        let len = self.expect_tag(tag::application::IP_ADDRESS)?;
        if len != 4 {
            return Err(Error::bad_value(
                self.offset,
                BadValueKind::InvalidAddressLength {
                    expected: 4,
                    actual: len,
                },
            ));
        }
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Enter a SEQUENCE, returning a decoder scoped to its content.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Enter a constructed frame with a specific tag.
    pub fn read_constructed(&mut self, expected: u8) -> Result<Decoder> {
        let len = self.expect_tag(expected)?;
        let content = self.read_bytes(len)?;
        Ok(Decoder::new(content))
    }

    /// Scope a decoder to the next `len` octets.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let content = self.read_bytes(len)?;
        Ok(Decoder::new(content))
    }
}
