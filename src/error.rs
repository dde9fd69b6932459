//! Error types.
//!
//! Three families of failure exist and stay distinct:
//!
//! - [`Error::BadValue`]: malformed BER on the wire, or an invalid value
//!   handed to a constructor/parser. Always synchronous, always local to the
//!   codec and value model.
//! - [`Error::Get`] / [`Error::Set`]: protocol-level errors reported by a
//!   peer through the `error-status`/`error-index` fields of a GetResponse,
//!   carrying the 1-based index of the offending variable binding.
//! - [`Error::Network`] / [`Error::Timeout`]: transport failures. A timeout
//!   is a communication failure, never a statement about whether a value
//!   exists.

use std::net::SocketAddr;
use std::time::Duration;

use crate::oid::Oid;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for all operations in this crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed BER data, or an invalid value supplied to a constructor.
    ///
    /// `offset` is the byte position in the buffer being decoded, or 0 when
    /// the failure did not come from a decode cursor.
    #[error("bad value at offset {offset}: {kind}")]
    BadValue { offset: usize, kind: BadValueKind },

    /// A Get or GetNext request failed with a non-zero error status.
    #[error("get failed: {status} at index {index}")]
    Get {
        status: ErrorStatus,
        /// 1-based index of the offending varbind; 0 when the error applies
        /// to the request as a whole.
        index: u32,
        oid: Option<Oid>,
    },

    /// A Set request failed with a non-zero error status.
    #[error("set failed: {status} at index {index}")]
    Set {
        status: ErrorStatus,
        index: u32,
        oid: Option<Oid>,
    },

    /// Socket-level failure (bind, send, receive).
    #[error("network error{}: {source}", fmt_target(.target))]
    Network {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// No correlated reply arrived within the configured timeout.
    #[error("timeout after {elapsed:?} waiting for {target}")]
    Timeout {
        target: SocketAddr,
        elapsed: Duration,
    },

    /// A table or MIB walk was aborted because the device misbehaved.
    #[error("walk aborted for {target}: {reason}")]
    WalkAborted {
        target: SocketAddr,
        reason: WalkAbortReason,
    },

    /// Invalid configuration (bad bind address, empty OID list, ...).
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

fn fmt_target(target: &Option<SocketAddr>) -> String {
    match target {
        Some(addr) => format!(" communicating with {}", addr),
        None => String::new(),
    }
}

impl Error {
    /// Construct a `BadValue` error from a decode cursor position.
    pub(crate) fn bad_value(offset: usize, kind: BadValueKind) -> Self {
        Error::BadValue { offset, kind }
    }

    /// Construct a `BadValue` error with no buffer position (constructor or
    /// parser input, not wire data).
    pub(crate) fn invalid(kind: BadValueKind) -> Self {
        Error::BadValue { offset: 0, kind }
    }

    /// True for the `BadValue` family.
    pub fn is_bad_value(&self) -> bool {
        matches!(self, Error::BadValue { .. })
    }

    /// True for transport failures (network or timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::Timeout { .. })
    }

    /// The protocol error status carried by `Get`/`Set` errors.
    pub fn status(&self) -> Option<ErrorStatus> {
        match self {
            Error::Get { status, .. } | Error::Set { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The 1-based error index carried by `Get`/`Set` errors.
    pub fn error_index(&self) -> Option<u32> {
        match self {
            Error::Get { index, .. } | Error::Set { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Detail for [`Error::BadValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BadValueKind {
    /// Buffer ended before the announced content did.
    TruncatedData,
    /// Indefinite-length form (0x80), which BER permits but SNMP forbids.
    IndefiniteLength,
    /// Long-form length with zero length octets.
    InvalidLength,
    /// Long-form length announcing more octets than we support.
    LengthTooLong { octets: usize },
    /// Announced content length exceeds the sanity cap.
    LengthExceedsMax { length: usize, max: usize },
    /// INTEGER with empty content.
    ZeroLengthInteger,
    /// Counter64 content longer than 9 octets.
    Integer64TooLong { length: usize },
    /// NULL with non-zero content length.
    InvalidNull,
    /// Fixed-length address with the wrong byte count.
    InvalidAddressLength { expected: usize, actual: usize },
    /// OID sub-identifier overflowed 32 bits.
    OidArcOverflow,
    /// OID with more sub-identifiers than the decode cap.
    OidTooLong { count: usize, max: usize },
    /// OID text with a non-numeric or negative component.
    InvalidOidArc,
    /// A different tag was required at this position.
    UnexpectedTag { expected: u8, actual: u8 },
    /// PDU tag outside the SNMPv1 set (0xA0..=0xA4).
    UnknownPduType(u8),
    /// Message version other than 0 (SNMPv1).
    UnknownVersion(i32),
    /// The value variant does not accept a value (Null, Unknown).
    NotSettable,
    /// Textual value could not be parsed for the requested type.
    UnparsableValue,
    /// Asked for a request PDU out of a trap message, or vice versa.
    UnexpectedPduKind,
    /// A response varbind OID does not match the request at that position.
    ResponseOidMismatch { index: usize },
    /// A response carried fewer varbinds than the request.
    EmptyResponse,
}

impl std::fmt::Display for BadValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TruncatedData => write!(f, "truncated data"),
            Self::IndefiniteLength => write!(f, "indefinite length not supported"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::LengthTooLong { octets } => {
                write!(f, "length field of {} octets not supported", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::Integer64TooLong { length } => {
                write!(f, "64-bit integer content of {} octets", length)
            }
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidAddressLength { expected, actual } => {
                write!(f, "address of {} octets, expected {}", actual, expected)
            }
            Self::OidArcOverflow => write!(f, "OID sub-identifier exceeds 32 bits"),
            Self::OidTooLong { count, max } => {
                write!(f, "OID with {} sub-identifiers exceeds maximum {}", count, max)
            }
            Self::InvalidOidArc => write!(f, "invalid OID component"),
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, found 0x{:02X}", expected, actual)
            }
            Self::UnknownPduType(tag) => write!(f, "unknown PDU tag 0x{:02X}", tag),
            Self::UnknownVersion(v) => write!(f, "unsupported SNMP version {}", v),
            Self::NotSettable => write!(f, "value type does not accept a value"),
            Self::UnparsableValue => write!(f, "value text could not be parsed"),
            Self::UnexpectedPduKind => write!(f, "message does not carry the requested PDU kind"),
            Self::ResponseOidMismatch { index } => {
                write!(f, "response OID at position {} does not match request", index)
            }
            Self::EmptyResponse => write!(f, "response carried too few varbinds"),
        }
    }
}

/// SNMPv1 error status codes (RFC 1157 Section 4.1.1).
///
/// Returned by agents in the `error-status` field of a GetResponse, paired
/// with a 1-based `error-index` identifying the offending varbind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    /// Operation succeeded (0).
    NoError,
    /// Response would not fit in a single message (1).
    ValueTooBig,
    /// No such variable exists for this request (2).
    ValueNotAvailable,
    /// Invalid value or syntax in a Set request (3).
    BadValue,
    /// Attempted Set on a read-only variable (4).
    ValueReadOnly,
    /// Unspecified failure (5).
    Failed,
    /// Status code outside the v1 set, preserved as received.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from a raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::ValueTooBig,
            2 => Self::ValueNotAvailable,
            3 => Self::BadValue,
            4 => Self::ValueReadOnly,
            5 => Self::Failed,
            other => {
                tracing::warn!(target: "snmpv1::error", status = other, "unknown SNMP error status");
                Self::Unknown(other)
            }
        }
    }

    /// Convert to the raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::ValueTooBig => 1,
            Self::ValueNotAvailable => 2,
            Self::BadValue => 3,
            Self::ValueReadOnly => 4,
            Self::Failed => 5,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::ValueTooBig => write!(f, "valueTooBig"),
            Self::ValueNotAvailable => write!(f, "valueNotAvailable"),
            Self::BadValue => write!(f, "badValue"),
            Self::ValueReadOnly => write!(f, "valueReadOnly"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Reason a walk operation was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAbortReason {
    /// The device returned an OID that does not advance past the request.
    NonIncreasing,
    /// A secondary table column left its base prefix before the first did.
    IncompleteRow,
}

impl std::fmt::Display for WalkAbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonIncreasing => write!(f, "non-increasing OID"),
            Self::IncompleteRow => write!(f, "incomplete row"),
        }
    }
}
