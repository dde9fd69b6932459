// Allow large error types - the Error enum carries OIDs and status codes inline
// so callers can see exactly which variable binding failed without extra lookups.
#![allow(clippy::result_large_err)]

//! # snmpv1
//!
//! Async SNMPv1 engine for Rust: a byte-exact ASN.1/BER codec, the full
//! SNMPv1 value model, and the three network roles from RFC 1157 (a polling
//! client, a request-serving agent, and trap receive/send) over UDP.
//!
//! ## Quick start: polling a device
//!
//! ```rust,no_run
//! use snmpv1::{Client, oid};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> snmpv1::Result<()> {
//!     let client = Client::builder("192.168.1.1:161")
//!         .community("public")
//!         .timeout(Duration::from_secs(5))
//!         .connect()
//!         .await?;
//!
//!     let sys_descr = client.get(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)).await?;
//!     println!("sysDescr: {}", sys_descr.value);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Serving requests
//!
//! An [`Agent`] fans incoming Get/GetNext/Set requests out to registered
//! [`RequestListener`]s and reconciles their partial answers into a single
//! GetResponse. See the [`agent`] module for a complete example.
//!
//! ## Traps
//!
//! [`TrapSender`] emits unsolicited v1 traps; [`TrapListener`] receives them
//! and dispatches to registered [`TrapHandler`]s. Traps are fire-and-forget:
//! no response is ever sent.

pub mod agent;
pub mod ber;
pub mod client;
pub mod error;
pub mod listener;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod transport;
pub mod trap;
pub mod value;
pub mod varbind;

pub(crate) mod util;

// Re-exports for convenience
pub use agent::{Agent, AgentBuilder};
pub use client::{Client, ClientBuilder, ClientConfig, TableRow};
pub use error::{BadValueKind, Error, ErrorStatus, Result, WalkAbortReason};
pub use listener::{
    BoxFuture, ListenerResult, NextVarBind, RequestContext, RequestFailure, RequestListener,
};
pub use message::{Message, MessageBody, Version};
pub use oid::Oid;
pub use pdu::{GenericTrap, Pdu, PduType, TrapPdu};
pub use transport::{Transport, UdpTransport};
pub use trap::{TrapHandler, TrapListener, TrapListenerBuilder, TrapSender};
pub use value::Value;
pub use varbind::VarBind;

/// Default UDP port an agent listens on for requests (RFC 1157).
pub const SNMP_PORT: u16 = 161;

/// Default UDP port traps are sent to (RFC 1157).
pub const TRAP_PORT: u16 = 162;

/// Maximum SNMPv1 datagram payload in bytes.
///
/// RFC 1157 Section 3.2.2 requires implementations to accept messages of at
/// least 484 octets; 512 is the customary receive buffer size. Datagrams
/// larger than this are truncated by the receive path.
pub const MAX_MESSAGE_SIZE: usize = 512;
