//! SNMP value model.
//!
//! [`Value`] is the closed set of ASN.1/SMI types an SNMPv1 message can
//! carry. Every variant owns its BER tag, its canonical in-memory shape, an
//! encode and a decode path, and a human-readable rendering via `Display`.
//! Tags nothing here recognizes decode to [`Value::Unknown`], never an
//! error, so a surrounding SEQUENCE decode can keep making progress over
//! unfamiliar attributes.

use bytes::Bytes;

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{BadValueKind, Error, Result};
use crate::oid::Oid;

/// Modulus applied when constructing a [`Value::Counter64`].
///
/// Intentionally `18_446_744_070_000_000_000` rather than 2^64: widely
/// deployed SNMP stacks reduce by this rounded constant, and interoperating
/// byte-for-byte matters more than arithmetic purity here.
pub const COUNTER64_MODULUS: u128 = 18_446_744_070_000_000_000;

/// An SNMPv1 value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (signed 32-bit).
    Integer(i32),

    /// BIT STRING, kept as raw content octets.
    ///
    /// Stored and emitted verbatim; the unused-bits prefix octet of strict
    /// X.690 is not interpreted, matching the permissive handling of
    /// deployed v1 stacks.
    BitString(Bytes),

    /// OCTET STRING (arbitrary bytes).
    OctetString(Bytes),

    /// NULL. Carries no value; placeholder in Get/GetNext requests.
    Null,

    /// OBJECT IDENTIFIER.
    ObjectIdentifier(Oid),

    /// Constructed SEQUENCE of nested values, arbitrary depth.
    ///
    /// Decoding a whole message generically yields a tree of these.
    Sequence(Vec<Value>),

    /// IpAddress: exactly four octets, network order.
    IpAddress([u8; 4]),

    /// Counter32: monotone counter in `[0, 2^32 - 1]`, wraps.
    Counter32(u32),

    /// Gauge32: level in `[0, 2^32 - 1]`, pegs at the maximum.
    Gauge32(u32),

    /// TimeTicks: hundredths of a second since epoch.
    TimeTicks(u32),

    /// NsapAddress: exactly six octets.
    NsapAddress([u8; 6]),

    /// Counter64: wide counter, reduced by [`COUNTER64_MODULUS`].
    Counter64(u64),

    /// UInteger32: unsigned 32-bit, wraps like Counter32.
    UInteger32(u32),

    /// Unrecognized tag, content preserved for forward compatibility.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Build a Counter32, wrapping the input modulo 2^32.
    ///
    /// ```
    /// use snmpv1::Value;
    ///
    /// assert_eq!(Value::counter32(4_294_967_296), Value::Counter32(0));
    /// assert_eq!(Value::counter32(4_294_967_295), Value::Counter32(4_294_967_295));
    /// ```
    pub fn counter32(v: u64) -> Self {
        Value::Counter32(v as u32)
    }

    /// Build a UInteger32, wrapping the input modulo 2^32.
    pub fn uinteger32(v: u64) -> Self {
        Value::UInteger32(v as u32)
    }

    /// Build a Gauge32, pegging the input at `u32::MAX` instead of wrapping.
    ///
    /// ```
    /// use snmpv1::Value;
    ///
    /// assert_eq!(Value::gauge32(5_000_000_000), Value::Gauge32(u32::MAX));
    /// ```
    pub fn gauge32(v: u64) -> Self {
        Value::Gauge32(v.min(u32::MAX as u64) as u32)
    }

    /// Build a TimeTicks, wrapping the input modulo 2^32.
    pub fn timeticks(v: u64) -> Self {
        Value::TimeTicks(v as u32)
    }

    /// Build a Counter64, reducing the input by [`COUNTER64_MODULUS`].
    pub fn counter64(v: u128) -> Self {
        Value::Counter64((v % COUNTER64_MODULUS) as u64)
    }

    /// Build an IpAddress; the slice must be exactly four octets.
    pub fn ip_address(octets: &[u8]) -> Result<Self> {
        let arr: [u8; 4] = octets.try_into().map_err(|_| {
            Error::invalid(BadValueKind::InvalidAddressLength {
                expected: 4,
                actual: octets.len(),
            })
        })?;
        Ok(Value::IpAddress(arr))
    }

    /// Build an NsapAddress; the slice must be exactly six octets.
    pub fn nsap_address(octets: &[u8]) -> Result<Self> {
        let arr: [u8; 6] = octets.try_into().map_err(|_| {
            Error::invalid(BadValueKind::InvalidAddressLength {
                expected: 6,
                actual: octets.len(),
            })
        })?;
        Ok(Value::NsapAddress(arr))
    }

    /// The BER tag byte this variant encodes with.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Integer(_) => tag::universal::INTEGER,
            Value::BitString(_) => tag::universal::BIT_STRING,
            Value::OctetString(_) => tag::universal::OCTET_STRING,
            Value::Null => tag::universal::NULL,
            Value::ObjectIdentifier(_) => tag::universal::OBJECT_IDENTIFIER,
            Value::Sequence(_) => tag::universal::SEQUENCE,
            Value::IpAddress(_) => tag::application::IP_ADDRESS,
            Value::Counter32(_) => tag::application::COUNTER32,
            Value::Gauge32(_) => tag::application::GAUGE32,
            Value::TimeTicks(_) => tag::application::TIMETICKS,
            Value::NsapAddress(_) => tag::application::NSAP_ADDRESS,
            Value::Counter64(_) => tag::application::COUNTER64,
            Value::UInteger32(_) => tag::application::UINTEGER32,
            Value::Unknown { tag, .. } => *tag,
        }
    }

    /// Short name of the carried type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::BitString(_) => "BitString",
            Value::OctetString(_) => "OctetString",
            Value::Null => "Null",
            Value::ObjectIdentifier(_) => "ObjectIdentifier",
            Value::Sequence(_) => "Sequence",
            Value::IpAddress(_) => "IpAddress",
            Value::Counter32(_) => "Counter32",
            Value::Gauge32(_) => "Gauge32",
            Value::TimeTicks(_) => "TimeTicks",
            Value::NsapAddress(_) => "NsapAddress",
            Value::Counter64(_) => "Counter64",
            Value::UInteger32(_) => "UInteger32",
            Value::Unknown { .. } => "Unknown",
        }
    }

    /// The value as `i32`, for [`Value::Integer`] only.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as `u32` for the unsigned 32-bit family, or a non-negative
    /// Integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) | Value::UInteger32(v) => {
                Some(*v)
            }
            Value::Integer(v) if *v >= 0 => Some(*v as u32),
            _ => None,
        }
    }

    /// The value as `u64`, covering Counter64 and everything `as_u32` does.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            _ => self.as_u32().map(u64::from),
        }
    }

    /// The raw octets of octet-string-family values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(data) | Value::BitString(data) => Some(data),
            Value::IpAddress(octets) => Some(octets),
            Value::NsapAddress(octets) => Some(octets),
            _ => None,
        }
    }

    /// The value as UTF-8 text, for OctetStrings holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::OctetString(data) => std::str::from_utf8(data).ok(),
            _ => None,
        }
    }

    /// The value as an OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// The value as an IPv4 address.
    pub fn as_ip(&self) -> Option<std::net::Ipv4Addr> {
        match self {
            Value::IpAddress(octets) => Some(std::net::Ipv4Addr::from(*octets)),
            _ => None,
        }
    }

    /// Nested values of a [`Value::Sequence`].
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Build a value of the type named by `type_tag` from its textual
    /// rendering, the inverse of `Display` for scalar types.
    ///
    /// Numeric text that does not parse, a malformed address, or a negative
    /// OID component is a `BadValue` error. `Null`, `Sequence`, and unknown
    /// tags accept no value at all.
    ///
    /// ```
    /// use snmpv1::{Value, ber::tag};
    ///
    /// let v = Value::parse_as(tag::application::GAUGE32, "5000000000").unwrap();
    /// assert_eq!(v, Value::Gauge32(u32::MAX));
    /// assert!(Value::parse_as(tag::universal::NULL, "anything").is_err());
    /// ```
    pub fn parse_as(type_tag: u8, text: &str) -> Result<Self> {
        fn numeric<T: std::str::FromStr>(text: &str) -> Result<T> {
            text.trim()
                .parse()
                .map_err(|_| Error::invalid(BadValueKind::UnparsableValue))
        }

        match type_tag {
            tag::universal::INTEGER => Ok(Value::Integer(numeric(text)?)),
            tag::universal::OCTET_STRING => {
                Ok(Value::OctetString(Bytes::copy_from_slice(text.as_bytes())))
            }
            tag::universal::BIT_STRING => {
                Ok(Value::BitString(Bytes::copy_from_slice(text.as_bytes())))
            }
            tag::universal::OBJECT_IDENTIFIER => Ok(Value::ObjectIdentifier(Oid::parse(text)?)),
            tag::application::IP_ADDRESS => {
                let addr: std::net::Ipv4Addr = text
                    .trim()
                    .parse()
                    .map_err(|_| Error::invalid(BadValueKind::UnparsableValue))?;
                Ok(Value::IpAddress(addr.octets()))
            }
            tag::application::NSAP_ADDRESS => {
                let octets = parse_hex_groups(text)?;
                Self::nsap_address(&octets)
            }
            tag::application::COUNTER32 => Ok(Value::counter32(numeric(text)?)),
            tag::application::GAUGE32 => Ok(Value::gauge32(numeric(text)?)),
            tag::application::TIMETICKS => Ok(Value::timeticks(numeric(text)?)),
            tag::application::UINTEGER32 => Ok(Value::uinteger32(numeric(text)?)),
            tag::application::COUNTER64 => Ok(Value::counter64(numeric(text)?)),
            _ => Err(Error::invalid(BadValueKind::NotSettable)),
        }
    }

    /// Encode this value as one complete TLV.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::BitString(data) => buf.push_tagged(tag::universal::BIT_STRING, data),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::Sequence(items) => buf.push_sequence(|buf| {
                for item in items.iter().rev() {
                    item.encode(buf);
                }
            }),
            Value::IpAddress(octets) => buf.push_ip_address(*octets),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::NsapAddress(octets) => buf.push_tagged(tag::application::NSAP_ADDRESS, octets),
            Value::Counter64(v) => buf.push_unsigned64(tag::application::COUNTER64, *v),
            Value::UInteger32(v) => buf.push_unsigned32(tag::application::UINTEGER32, *v),
            Value::Unknown { tag, data } => buf.push_tagged(*tag, data),
        }
    }

    /// Decode one complete TLV.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let value_tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match value_tag {
            tag::universal::INTEGER => Ok(Value::Integer(decoder.read_integer_value(len)?)),
            tag::universal::BIT_STRING => Ok(Value::BitString(decoder.read_bytes(len)?)),
            tag::universal::OCTET_STRING => Ok(Value::OctetString(decoder.read_bytes(len)?)),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::bad_value(decoder.offset(), BadValueKind::InvalidNull));
                }
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Ok(Value::ObjectIdentifier(decoder.read_oid_value(len)?))
            }
            tag::universal::SEQUENCE => {
                let mut inner = decoder.sub_decoder(len)?;
                let mut items = Vec::new();
                while !inner.is_empty() {
                    items.push(Value::decode(&mut inner)?);
                }
                Ok(Value::Sequence(items))
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(Error::bad_value(
                        decoder.offset(),
                        BadValueKind::InvalidAddressLength {
                            expected: 4,
                            actual: len,
                        },
                    ));
                }
                let bytes = decoder.read_bytes(4)?;
                Ok(Value::IpAddress([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            tag::application::NSAP_ADDRESS => {
                if len != 6 {
                    return Err(Error::bad_value(
                        decoder.offset(),
                        BadValueKind::InvalidAddressLength {
                            expected: 6,
                            actual: len,
                        },
                    ));
                }
                let bytes = decoder.read_bytes(6)?;
                Ok(Value::NsapAddress([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5],
                ]))
            }
            tag::application::COUNTER32 => {
                Ok(Value::Counter32(decoder.read_unsigned32_value(len)?))
            }
            tag::application::GAUGE32 => Ok(Value::Gauge32(decoder.read_unsigned32_value(len)?)),
            tag::application::TIMETICKS => {
                Ok(Value::TimeTicks(decoder.read_unsigned32_value(len)?))
            }
            tag::application::COUNTER64 => {
                Ok(Value::Counter64(decoder.read_unsigned64_value(len)?))
            }
            tag::application::UINTEGER32 => {
                Ok(Value::UInteger32(decoder.read_unsigned32_value(len)?))
            }
            other => Ok(Value::Unknown {
                tag: other,
                data: decoder.read_bytes(len)?,
            }),
        }
    }
}

/// Parse colon/dot/dash-separated hex octets, e.g. `"47:00:01:02:03:04"`.
fn parse_hex_groups(text: &str) -> Result<Vec<u8>> {
    text.trim()
        .split(|c| c == ':' || c == '.' || c == '-')
        .map(|group| {
            u8::from_str_radix(group, 16).map_err(|_| Error::invalid(BadValueKind::UnparsableValue))
        })
        .collect()
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::BitString(data) => write!(f, "0x{}", hex(data)),
            Value::OctetString(data) => match std::str::from_utf8(data) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => write!(f, "0x{}", hex(data)),
            },
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::Sequence(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::IpAddress(o) => write!(f, "{}.{}.{}.{}", o[0], o[1], o[2], o[3]),
            Value::Counter32(v) | Value::Gauge32(v) | Value::UInteger32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                write!(
                    f,
                    "{}d {}h {}m {}s",
                    secs / 86400,
                    (secs % 86400) / 3600,
                    (secs % 3600) / 60,
                    secs % 60
                )
            }
            Value::NsapAddress(octets) => {
                for (i, byte) in octets.iter().enumerate() {
                    if i > 0 {
                        write!(f, ":")?;
                    }
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Counter64(v) => write!(f, "{}", v),
            Value::Unknown { tag, data } => {
                write!(f, "Unknown(tag=0x{:02X}, data=0x{})", tag, hex(data))
            }
        }
    }
}

fn hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s))
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::OctetString(Bytes::copy_from_slice(data))
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::OctetString(data)
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<std::net::Ipv4Addr> for Value {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn roundtrip(value: Value) -> Value {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        let mut decoder = Decoder::new(buf.finish());
        let decoded = Value::decode(&mut decoder).unwrap();
        assert!(decoder.is_empty(), "decoder left trailing bytes");
        decoded
    }

    #[test]
    fn roundtrip_all_variants() {
        let samples = [
            Value::Integer(0),
            Value::Integer(42),
            Value::Integer(-42),
            Value::Integer(i32::MIN),
            Value::Integer(i32::MAX),
            Value::BitString(Bytes::from_static(&[0xA5, 0x00])),
            Value::OctetString(Bytes::new()),
            Value::OctetString(Bytes::from_static(b"test-device")),
            Value::OctetString(Bytes::from_static(&[0x00, 0xFF, 0x80])),
            Value::Null,
            Value::ObjectIdentifier(Oid::empty()),
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
            Value::IpAddress([0, 0, 0, 0]),
            Value::IpAddress([255, 255, 255, 255]),
            Value::Counter32(0),
            Value::Counter32(u32::MAX),
            Value::Gauge32(1_000_000_000),
            Value::Gauge32(u32::MAX),
            Value::TimeTicks(123_456),
            Value::NsapAddress([0x47, 0x00, 0x01, 0x02, 0x03, 0x04]),
            Value::Counter64(0),
            Value::Counter64(1 << 62),
            Value::UInteger32(7),
            Value::Sequence(vec![
                Value::Integer(1),
                Value::Sequence(vec![Value::Null, Value::OctetString("x".into())]),
            ]),
        ];
        for value in samples {
            assert_eq!(roundtrip(value.clone()), value);
        }
    }

    #[test]
    fn counter32_wraps() {
        assert_eq!(Value::counter32(4_294_967_296), Value::Counter32(0));
        assert_eq!(Value::counter32(4_294_967_297), Value::Counter32(1));
        assert_eq!(
            Value::counter32(4_294_967_295),
            Value::Counter32(4_294_967_295)
        );
        assert_eq!(Value::uinteger32(1 << 33), Value::UInteger32(0));
    }

    #[test]
    fn gauge32_pegs() {
        assert_eq!(Value::gauge32(5_000_000_000), Value::Gauge32(4_294_967_295));
        assert_eq!(Value::gauge32(12), Value::Gauge32(12));
        assert_eq!(Value::gauge32(u64::MAX), Value::Gauge32(u32::MAX));
    }

    #[test]
    fn counter64_reduces_by_modulus() {
        assert_eq!(Value::counter64(COUNTER64_MODULUS), Value::Counter64(0));
        assert_eq!(Value::counter64(COUNTER64_MODULUS + 7), Value::Counter64(7));
        assert_eq!(
            Value::counter64(COUNTER64_MODULUS - 1),
            Value::Counter64((COUNTER64_MODULUS - 1) as u64)
        );
    }

    #[test]
    fn unknown_tag_preserved() {
        let mut decoder = Decoder::from_slice(&[0x48, 0x03, 0x01, 0x02, 0x03]);
        let value = Value::decode(&mut decoder).unwrap();
        match &value {
            Value::Unknown { tag, data } => {
                assert_eq!(*tag, 0x48);
                assert_eq!(data.as_ref(), &[0x01, 0x02, 0x03]);
            }
            other => panic!("expected Unknown, got {:?}", other),
        }
        assert_eq!(roundtrip(value.clone()), value);
    }

    #[test]
    fn fixed_length_addresses_validated() {
        // IpAddress with 3 octets
        let mut decoder = Decoder::from_slice(&[0x40, 0x03, 1, 2, 3]);
        assert!(Value::decode(&mut decoder).is_err());

        // NsapAddress with 5 octets
        let mut decoder = Decoder::from_slice(&[0x45, 0x05, 1, 2, 3, 4, 5]);
        assert!(Value::decode(&mut decoder).is_err());

        assert!(Value::ip_address(&[1, 2, 3]).is_err());
        assert!(Value::nsap_address(&[1, 2, 3, 4, 5, 6, 7]).is_err());
        assert!(Value::nsap_address(&[1, 2, 3, 4, 5, 6]).is_ok());
    }

    #[test]
    fn null_with_content_rejected() {
        let mut decoder = Decoder::from_slice(&[0x05, 0x01, 0x00]);
        assert!(Value::decode(&mut decoder).is_err());
    }

    #[test]
    fn garbled_integer_rejected() {
        let mut decoder = Decoder::from_slice(&[0x02, 0x00]);
        assert!(Value::decode(&mut decoder).is_err());
    }

    #[test]
    fn parse_as_numeric() {
        assert_eq!(
            Value::parse_as(tag::universal::INTEGER, "-17").unwrap(),
            Value::Integer(-17)
        );
        assert_eq!(
            Value::parse_as(tag::application::COUNTER32, "4294967296").unwrap(),
            Value::Counter32(0)
        );
        assert_eq!(
            Value::parse_as(tag::application::COUNTER64, "12345678901234567890").unwrap(),
            Value::counter64(12_345_678_901_234_567_890)
        );
        assert!(Value::parse_as(tag::universal::INTEGER, "forty-two").is_err());
    }

    #[test]
    fn parse_as_addresses() {
        assert_eq!(
            Value::parse_as(tag::application::IP_ADDRESS, "10.0.0.1").unwrap(),
            Value::IpAddress([10, 0, 0, 1])
        );
        assert!(Value::parse_as(tag::application::IP_ADDRESS, "10.0.0").is_err());
        assert_eq!(
            Value::parse_as(tag::application::NSAP_ADDRESS, "47:00:01:02:03:04").unwrap(),
            Value::NsapAddress([0x47, 0x00, 0x01, 0x02, 0x03, 0x04])
        );
        assert!(Value::parse_as(tag::application::NSAP_ADDRESS, "47:00:01").is_err());
    }

    #[test]
    fn parse_as_oid_rejects_negative() {
        assert!(Value::parse_as(tag::universal::OBJECT_IDENTIFIER, "1.3.-6").is_err());
        assert_eq!(
            Value::parse_as(tag::universal::OBJECT_IDENTIFIER, "1.3.6").unwrap(),
            Value::ObjectIdentifier(oid!(1, 3, 6))
        );
    }

    #[test]
    fn null_is_not_settable() {
        assert!(matches!(
            Value::parse_as(tag::universal::NULL, "0").unwrap_err(),
            Error::BadValue {
                kind: BadValueKind::NotSettable,
                ..
            }
        ));
        // Unknown tags are not settable either
        assert!(Value::parse_as(0x7E, "0").is_err());
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Integer(5).as_i32(), Some(5));
        assert_eq!(Value::Counter32(5).as_i32(), None);
        assert_eq!(Value::UInteger32(9).as_u32(), Some(9));
        assert_eq!(Value::Integer(-1).as_u32(), None);
        assert_eq!(Value::Counter64(10).as_u64(), Some(10));
        assert_eq!(Value::Gauge32(3).as_u64(), Some(3));
        assert_eq!(
            Value::OctetString("hi".into()).as_bytes(),
            Some(b"hi".as_slice())
        );
        assert_eq!(Value::OctetString("hi".into()).as_str(), Some("hi"));
        assert_eq!(
            Value::OctetString(Bytes::from_static(&[0xFF])).as_str(),
            None
        );
        assert_eq!(
            Value::IpAddress([192, 168, 0, 1]).as_ip(),
            Some(std::net::Ipv4Addr::new(192, 168, 0, 1))
        );
        let seq = Value::Sequence(vec![Value::Null]);
        assert_eq!(seq.as_sequence().map(<[Value]>::len), Some(1));
    }

    #[test]
    fn display_renders() {
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::OctetString("router".into()).to_string(), "router");
        assert_eq!(
            Value::OctetString(Bytes::from_static(&[0xFF, 0xFE])).to_string(),
            "0xfffe"
        );
        assert_eq!(Value::IpAddress([10, 1, 2, 3]).to_string(), "10.1.2.3");
        assert_eq!(Value::TimeTicks(123_456).to_string(), "0d 0h 20m 34s");
        assert_eq!(
            Value::NsapAddress([0x47, 0, 1, 2, 3, 4]).to_string(),
            "47:00:01:02:03:04"
        );
        assert_eq!(
            Value::Sequence(vec![Value::Integer(1), Value::Null]).to_string(),
            "(1 NULL)"
        );
    }

    #[test]
    fn counter64_wire_shape() {
        // Top-bit-set values need the leading zero octet
        let mut buf = EncodeBuf::new();
        Value::Counter64(u64::MAX - 1).encode(&mut buf);
        let bytes = buf.finish();
        assert_eq!(bytes[0], 0x46);
        assert_eq!(bytes[1], 9);
        assert_eq!(bytes[2], 0x00);
    }
}
