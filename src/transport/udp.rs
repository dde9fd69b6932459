//! UDP transport.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use super::Transport;
use crate::error::{Error, Result};
use crate::util::bind_ephemeral_udp_socket;

/// A connected UDP socket to one peer.
#[derive(Clone)]
pub struct UdpTransport {
    inner: Arc<Inner>,
}

struct Inner {
    socket: UdpSocket,
    peer: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral socket and connect it to `peer`.
    ///
    /// Connecting filters inbound datagrams to the peer address at the
    /// kernel level, which is the first line of defense against stray
    /// traffic on the port.
    pub async fn connect(peer: SocketAddr) -> Result<Self> {
        tracing::debug!(target: "snmpv1::transport", peer = %peer, "connecting UDP transport");

        let socket = bind_ephemeral_udp_socket(peer).map_err(|e| Error::Network {
            target: Some(peer),
            source: e,
        })?;

        socket.connect(peer).await.map_err(|e| Error::Network {
            target: Some(peer),
            source: e,
        })?;

        let local_addr = socket.local_addr().map_err(|e| Error::Network {
            target: Some(peer),
            source: e,
        })?;

        Ok(Self {
            inner: Arc::new(Inner {
                socket,
                peer,
                local_addr,
            }),
        })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(target: "snmpv1::transport", peer = %self.inner.peer, bytes = data.len(), "send");
        self.inner
            .socket
            .send(data)
            .await
            .map_err(|e| Error::Network {
                target: Some(self.inner.peer),
                source: e,
            })?;
        Ok(())
    }

    async fn recv(&self, recv_timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let mut buf = vec![0u8; crate::MAX_MESSAGE_SIZE];

        match timeout(recv_timeout, self.inner.socket.recv(&mut buf)).await {
            Ok(Ok(len)) => {
                buf.truncate(len);
                tracing::trace!(target: "snmpv1::transport", peer = %self.inner.peer, bytes = len, "recv");
                Ok((Bytes::from(buf), self.inner.peer))
            }
            Ok(Err(e)) => Err(Error::Network {
                target: Some(self.inner.peer),
                source: e,
            }),
            Err(_) => Err(Error::Timeout {
                target: self.inner.peer,
                elapsed: recv_timeout,
            }),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.peer
    }

    fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }
}
