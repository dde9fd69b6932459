//! SNMP message envelope.
//!
//! The unit actually placed on the wire:
//! `SEQUENCE { version INTEGER, community OCTET STRING, data PDU }`.
//! SNMPv1 encodes version 0; any other version is rejected at decode.

use bytes::Bytes;

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{BadValueKind, Error, Result};
use crate::pdu::{Pdu, TrapPdu};

/// SNMP protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    /// SNMPv1 (wire value 0). The only version this crate speaks.
    #[default]
    V1,
}

impl Version {
    /// Map a wire value; `None` for anything but 0.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::V1),
            _ => None,
        }
    }

    /// The wire value.
    pub fn as_i32(self) -> i32 {
        0
    }
}

/// The PDU carried by a message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// Get/GetNext/GetResponse/Set.
    Request(Pdu),
    /// Trap.
    Trap(TrapPdu),
}

/// A complete SNMPv1 message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub version: Version,
    /// Community string, the v1 access-control token. Raw bytes: nothing
    /// requires it to be text.
    pub community: Bytes,
    pub body: MessageBody,
}

impl Message {
    /// Wrap a request/response PDU.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            body: MessageBody::Request(pdu),
        }
    }

    /// Wrap a trap PDU.
    pub fn trap(version: Version, community: impl Into<Bytes>, trap: TrapPdu) -> Self {
        Self {
            version,
            community: community.into(),
            body: MessageBody::Trap(trap),
        }
    }

    /// The request/response PDU.
    ///
    /// Fails when the message carries a trap; there is no silent downcast
    /// between the two PDU shapes.
    pub fn pdu(&self) -> Result<&Pdu> {
        match &self.body {
            MessageBody::Request(pdu) => Ok(pdu),
            MessageBody::Trap(_) => Err(Error::invalid(BadValueKind::UnexpectedPduKind)),
        }
    }

    /// The trap PDU; fails when the message carries a request/response.
    pub fn trap_pdu(&self) -> Result<&TrapPdu> {
        match &self.body {
            MessageBody::Trap(trap) => Ok(trap),
            MessageBody::Request(_) => Err(Error::invalid(BadValueKind::UnexpectedPduKind)),
        }
    }

    /// Consume into the request/response PDU.
    pub fn into_pdu(self) -> Result<Pdu> {
        match self.body {
            MessageBody::Request(pdu) => Ok(pdu),
            MessageBody::Trap(_) => Err(Error::invalid(BadValueKind::UnexpectedPduKind)),
        }
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            match &self.body {
                MessageBody::Request(pdu) => pdu.encode(buf),
                MessageBody::Trap(trap) => trap.encode(buf),
            }
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i32());
        });
        buf.finish()
    }

    /// Decode from wire bytes.
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let version_num = seq.read_integer()?;
        let version = Version::from_i32(version_num).ok_or_else(|| {
            Error::bad_value(seq.offset(), BadValueKind::UnknownVersion(version_num))
        })?;

        let community = seq.read_octet_string()?;

        // Dispatch on the PDU tag: traps have their own shape
        let body = match seq.peek_tag() {
            Some(tag::pdu::TRAP) => MessageBody::Trap(TrapPdu::decode(&mut seq)?),
            Some(_) => MessageBody::Request(Pdu::decode(&mut seq)?),
            None => return Err(Error::bad_value(seq.offset(), BadValueKind::TruncatedData)),
        };

        Ok(Self {
            version,
            community,
            body,
        })
    }
}
