//! Client-side transport abstraction.
//!
//! The exchange logic in [`Client`](crate::Client) is written against this
//! trait so it can be driven by a scripted transport in tests; [`UdpTransport`]
//! is the implementation real traffic uses. SNMPv1 runs over UDP only; the
//! seam exists for testability, not for alternative transports.

mod udp;

pub use udp::UdpTransport;

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;

use crate::error::Result;

/// One datagram path to a single peer.
///
/// `Clone` must be cheap (implementations hold an `Arc` internally) because
/// walks own a clone of the client.
pub trait Transport: Send + Sync + Clone {
    /// Send one datagram to the peer.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Receive one datagram, waiting at most `timeout`.
    ///
    /// Returns the payload and the address it came from. Elapsing the
    /// timeout is an [`Error::Timeout`](crate::Error::Timeout), a transport
    /// failure, distinct from any protocol-level error.
    fn recv(&self, timeout: Duration) -> impl Future<Output = Result<(Bytes, SocketAddr)>> + Send;

    /// The peer this transport exchanges datagrams with.
    fn peer_addr(&self) -> SocketAddr;

    /// The local bind address.
    fn local_addr(&self) -> SocketAddr;
}
