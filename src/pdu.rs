//! SNMPv1 Protocol Data Units (RFC 1157 Section 4.1).
//!
//! The four request/response operations share one shape ([`Pdu`]); traps
//! carry a different fixed shape ([`TrapPdu`]). Both are implicitly tagged
//! SEQUENCEs on the wire.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{BadValueKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = 0xA0,
    GetNextRequest = 0xA1,
    GetResponse = 0xA2,
    SetRequest = 0xA3,
    Trap = 0xA4,
}

impl PduType {
    /// Map a tag byte to a PDU type; `None` outside the SNMPv1 set.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(Self::GetRequest),
            0xA1 => Some(Self::GetNextRequest),
            0xA2 => Some(Self::GetResponse),
            0xA3 => Some(Self::SetRequest),
            0xA4 => Some(Self::Trap),
            _ => None,
        }
    }

    /// The tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// True for PDU types a peer answers with a GetResponse.
    pub fn expects_response(self) -> bool {
        matches!(
            self,
            Self::GetRequest | Self::GetNextRequest | Self::SetRequest
        )
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::GetResponse => write!(f, "GetResponse"),
            Self::SetRequest => write!(f, "SetRequest"),
            Self::Trap => write!(f, "Trap"),
        }
    }
}

/// Request/response PDU: `(request-id, error-status, error-index, varbinds)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    pub pdu_type: PduType,
    /// Correlates responses with requests over the unreliable transport.
    pub request_id: i32,
    /// 0 in requests; an [`ErrorStatus`] code in responses.
    pub error_status: i32,
    /// 1-based index of the failing varbind; 0 when no varbind is at fault.
    pub error_index: i32,
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// A Get request for the given OIDs (NULL value placeholders).
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        Self::request(PduType::GetRequest, request_id, oids)
    }

    /// A GetNext request for the given OIDs.
    pub fn get_next_request(request_id: i32, oids: &[Oid]) -> Self {
        Self::request(PduType::GetNextRequest, request_id, oids)
    }

    /// A Set request carrying the values to write.
    pub fn set_request(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::SetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    fn request(pdu_type: PduType, request_id: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().cloned().map(VarBind::null).collect(),
        }
    }

    /// A successful GetResponse answering this request with `varbinds`.
    pub fn to_response(&self, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::GetResponse,
            request_id: self.request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// An error GetResponse.
    ///
    /// Per RFC 1157 the var-bind list of an error response is the request
    /// list, echoed verbatim.
    pub fn to_error_response(&self, status: ErrorStatus, error_index: i32) -> Self {
        Self {
            pdu_type: PduType::GetResponse,
            request_id: self.request_id,
            error_status: status.as_i32(),
            error_index,
            varbinds: self.varbinds.clone(),
        }
    }

    /// True when `error_status` is non-zero.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// The error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// Encode as one implicitly tagged frame.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index);
            buf.push_integer(self.error_status);
            buf.push_integer(self.request_id);
        });
    }

    /// Decode one request/response PDU.
    ///
    /// Fails on the trap tag: traps have a different fixed shape and must be
    /// decoded as [`TrapPdu`].
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let pdu_tag = decoder.read_tag()?;
        let pdu_type = match PduType::from_tag(pdu_tag) {
            Some(PduType::Trap) | None => {
                return Err(Error::bad_value(
                    decoder.offset(),
                    BadValueKind::UnknownPduType(pdu_tag),
                ));
            }
            Some(t) => t,
        };

        let len = decoder.read_length()?;
        let mut body = decoder.sub_decoder(len)?;

        let request_id = body.read_integer()?;
        let error_status = body.read_integer()?;
        let error_index = body.read_integer()?;
        let varbinds = decode_varbind_list(&mut body)?;

        Ok(Self {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }
}

/// Generic trap categories (RFC 1157 Section 4.1.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum GenericTrap {
    /// coldStart(0) - reinitializing, configuration may have changed
    ColdStart = 0,
    /// warmStart(1) - reinitializing, configuration unchanged
    WarmStart = 1,
    /// linkDown(2)
    LinkDown = 2,
    /// linkUp(3)
    LinkUp = 3,
    /// authenticationFailure(4)
    AuthenticationFailure = 4,
    /// egpNeighborLoss(5)
    EgpNeighborLoss = 5,
    /// enterpriseSpecific(6) - see the specific-trap field
    EnterpriseSpecific = 6,
}

impl GenericTrap {
    /// Map a raw code; `None` outside 0..=6.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::ColdStart),
            1 => Some(Self::WarmStart),
            2 => Some(Self::LinkDown),
            3 => Some(Self::LinkUp),
            4 => Some(Self::AuthenticationFailure),
            5 => Some(Self::EgpNeighborLoss),
            6 => Some(Self::EnterpriseSpecific),
            _ => None,
        }
    }

    /// The raw code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// SNMPv1 Trap PDU:
/// `(enterprise, agent-addr, generic-trap, specific-trap, time-stamp, varbinds)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrapPdu {
    /// sysObjectID of the entity emitting the trap.
    pub enterprise: Oid,
    /// IP address of the emitting agent.
    pub agent_addr: [u8; 4],
    /// Generic trap category, see [`GenericTrap`].
    pub generic_trap: i32,
    /// Vendor code, meaningful when `generic_trap` is enterpriseSpecific.
    pub specific_trap: i32,
    /// TimeTicks since the agent last (re)initialized.
    pub timestamp: u32,
    pub varbinds: Vec<VarBind>,
}

impl TrapPdu {
    /// Assemble a trap PDU.
    pub fn new(
        enterprise: Oid,
        agent_addr: [u8; 4],
        generic_trap: GenericTrap,
        specific_trap: i32,
        timestamp: u32,
        varbinds: Vec<VarBind>,
    ) -> Self {
        Self {
            enterprise,
            agent_addr,
            generic_trap: generic_trap.as_i32(),
            specific_trap,
            timestamp,
            varbinds,
        }
    }

    /// The generic trap category, if the code is in range.
    pub fn generic_trap_enum(&self) -> Option<GenericTrap> {
        GenericTrap::from_i32(self.generic_trap)
    }

    /// True for enterprise-specific traps.
    pub fn is_enterprise_specific(&self) -> bool {
        self.generic_trap == GenericTrap::EnterpriseSpecific.as_i32()
    }

    /// Encode as one implicitly tagged frame.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(tag::pdu::TRAP, |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_unsigned32(tag::application::TIMETICKS, self.timestamp);
            buf.push_integer(self.specific_trap);
            buf.push_integer(self.generic_trap);
            buf.push_ip_address(self.agent_addr);
            buf.push_oid(&self.enterprise);
        });
    }

    /// Decode one trap PDU.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut body = decoder.read_constructed(tag::pdu::TRAP)?;

        let enterprise = body.read_oid()?;
        let agent_addr = body.read_ip_address()?;
        let generic_trap = body.read_integer()?;
        let specific_trap = body.read_integer()?;
        let timestamp = body.read_unsigned32(tag::application::TIMETICKS)?;
        let varbinds = decode_varbind_list(&mut body)?;

        Ok(Self {
            enterprise,
            agent_addr,
            generic_trap,
            specific_trap,
            timestamp,
            varbinds,
        })
    }
}
