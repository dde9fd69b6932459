//! Trap receive and send.
//!
//! Traps are fire-and-forget: there is no return channel, so the listener
//! never replies and swallows every malformed datagram (logged, never
//! fatal). [`TrapSender`] is the client-side helper for emitting traps; an
//! [`Agent`](crate::Agent) can also emit them from its own socket via
//! [`Agent::send_trap`](crate::Agent::send_trap).
//!
//! # Receiving
//!
//! ```rust,no_run
//! use snmpv1::trap::{TrapHandler, TrapListener};
//! use snmpv1::{BoxFuture, TrapPdu};
//! use bytes::Bytes;
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! struct LogTraps;
//!
//! impl TrapHandler for LogTraps {
//!     fn process_trap<'a>(
//!         &'a self,
//!         trap: &'a TrapPdu,
//!         _community: &'a Bytes,
//!         source: SocketAddr,
//!     ) -> BoxFuture<'a, ()> {
//!         Box::pin(async move {
//!             println!("trap from {}: enterprise {}", source, trap.enterprise);
//!         })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> snmpv1::Result<()> {
//!     let listener = TrapListener::builder()
//!         .bind("0.0.0.0:162")
//!         .handler(Arc::new(LogTraps))
//!         .build()
//!         .await?;
//!     listener.run().await
//! }
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::listener::BoxFuture;
use crate::message::{Message, MessageBody, Version};
use crate::pdu::TrapPdu;
use crate::util::{bind_ephemeral_udp_socket, bind_udp_socket};

/// A consumer of received traps, registered with a [`TrapListener`].
pub trait TrapHandler: Send + Sync {
    /// Called for every decoded trap, in handler registration order.
    fn process_trap<'a>(
        &'a self,
        trap: &'a TrapPdu,
        community: &'a Bytes,
        source: SocketAddr,
    ) -> BoxFuture<'a, ()>;
}

/// Builder for [`TrapListener`].
pub struct TrapListenerBuilder {
    bind_addr: String,
    handlers: Vec<Arc<dyn TrapHandler>>,
    cancel: Option<CancellationToken>,
}

impl TrapListenerBuilder {
    /// Create a builder with defaults: bind `0.0.0.0:162`, no handlers.
    pub fn new() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{}", crate::TRAP_PORT),
            handlers: Vec::new(),
            cancel: None,
        }
    }

    /// Set the UDP bind address.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Register a handler at build time.
    pub fn handler(mut self, handler: Arc<dyn TrapHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Use an external cancellation token for shutdown.
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Bind the socket and build the listener.
    pub async fn build(self) -> Result<TrapListener> {
        let bind_addr: SocketAddr = self
            .bind_addr
            .parse()
            .map_err(|_| Error::Config(format!("invalid bind address: {}", self.bind_addr).into()))?;

        let socket = bind_udp_socket(bind_addr).map_err(|e| Error::Network {
            target: Some(bind_addr),
            source: e,
        })?;
        let local_addr = socket.local_addr().map_err(|e| Error::Network {
            target: Some(bind_addr),
            source: e,
        })?;

        Ok(TrapListener {
            inner: Arc::new(TrapListenerInner {
                socket,
                local_addr,
                handlers: RwLock::new(self.handlers),
                cancel: self.cancel.unwrap_or_default(),
                running: AtomicBool::new(false),
            }),
        })
    }
}

impl Default for TrapListenerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct TrapListenerInner {
    socket: UdpSocket,
    local_addr: SocketAddr,
    handlers: RwLock<Vec<Arc<dyn TrapHandler>>>,
    cancel: CancellationToken,
    running: AtomicBool,
}

/// UDP server for unsolicited trap messages.
///
/// Mirrors the agent's receive loop but only understands trap-bodied
/// messages and never sends anything back.
#[derive(Clone)]
pub struct TrapListener {
    inner: Arc<TrapListenerInner>,
}

impl TrapListener {
    /// Create a builder.
    pub fn builder() -> TrapListenerBuilder {
        TrapListenerBuilder::new()
    }

    /// The bound local address.
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }

    /// Register a handler. Idempotent: the same `Arc` is kept once.
    pub fn add_handler(&self, handler: Arc<dyn TrapHandler>) {
        let mut handlers = self.inner.handlers.write().unwrap();
        if !handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            handlers.push(handler);
        }
    }

    /// Remove a previously registered handler; a no-op if absent.
    pub fn remove_handler(&self, handler: &Arc<dyn TrapHandler>) {
        let mut handlers = self.inner.handlers.write().unwrap();
        handlers.retain(|h| !Arc::ptr_eq(h, handler));
    }

    /// Start the receive loop on a background task. Idempotent.
    pub fn spawn(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let listener = self.clone();
        tokio::spawn(async move {
            if let Err(e) = listener.run().await {
                tracing::error!(target: "snmpv1::trap", error = %e, "trap listener loop failed");
            }
        });
    }

    /// Stop the receive loop. Idempotent.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    /// Run the receive loop on the calling task until shutdown.
    ///
    /// A single bad packet never exits the loop: undecodable datagrams and
    /// non-trap messages are logged and dropped.
    pub async fn run(&self) -> Result<()> {
        self.inner.running.store(true, Ordering::SeqCst);
        tracing::info!(target: "snmpv1::trap", local_addr = %self.inner.local_addr, "trap listener running");

        let mut buf = vec![0u8; crate::MAX_MESSAGE_SIZE];

        loop {
            let (len, source) = tokio::select! {
                result = self.inner.socket.recv_from(&mut buf) => {
                    result.map_err(|e| Error::Network {
                        target: Some(self.inner.local_addr),
                        source: e,
                    })?
                }
                _ = self.inner.cancel.cancelled() => {
                    tracing::info!(target: "snmpv1::trap", "trap listener shutdown");
                    self.inner.running.store(false, Ordering::SeqCst);
                    return Ok(());
                }
            };

            let data = Bytes::copy_from_slice(&buf[..len]);
            self.dispatch(data, source).await;
        }
    }

    async fn dispatch(&self, data: Bytes, source: SocketAddr) {
        let message = match Message::decode(data) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(target: "snmpv1::trap", source = %source, error = %e, "dropping undecodable datagram");
                return;
            }
        };

        let trap = match &message.body {
            MessageBody::Trap(trap) => trap,
            MessageBody::Request(pdu) => {
                tracing::debug!(target: "snmpv1::trap", source = %source, pdu_type = %pdu.pdu_type, "ignoring non-trap PDU on trap port");
                return;
            }
        };

        tracing::debug!(
            target: "snmpv1::trap",
            source = %source,
            enterprise = %trap.enterprise,
            generic_trap = trap.generic_trap,
            "received trap"
        );

        let handlers: Vec<Arc<dyn TrapHandler>> = self.inner.handlers.read().unwrap().clone();
        for handler in &handlers {
            handler.process_trap(trap, &message.community, source).await;
        }
    }
}

/// Stateless helper for emitting traps.
///
/// Owns its own ephemeral socket, independent of any agent or listener
/// socket. Building the message and sending the single datagram is the whole
/// job; there is no acknowledgement to wait for.
pub struct TrapSender {
    socket: UdpSocket,
}

impl TrapSender {
    /// Bind an ephemeral IPv4 socket for sending.
    pub async fn new() -> Result<Self> {
        let socket =
            bind_ephemeral_udp_socket("0.0.0.0:0".parse().unwrap()).map_err(|e| Error::Network {
                target: None,
                source: e,
            })?;
        Ok(Self { socket })
    }

    /// Send one trap to `target` (conventionally port [`crate::TRAP_PORT`]).
    pub async fn send(
        &self,
        target: SocketAddr,
        community: impl Into<Bytes>,
        trap: TrapPdu,
    ) -> Result<()> {
        let message = Message::trap(Version::V1, community, trap);
        let data = message.encode();

        tracing::debug!(target: "snmpv1::trap", target_addr = %target, bytes = data.len(), "sending trap");

        self.socket
            .send_to(&data, target)
            .await
            .map_err(|e| Error::Network {
                target: Some(target),
                source: e,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingHandler;

    impl TrapHandler for CountingHandler {
        fn process_trap<'a>(
            &'a self,
            _trap: &'a TrapPdu,
            _community: &'a Bytes,
            _source: SocketAddr,
        ) -> BoxFuture<'a, ()> {
            Box::pin(async {})
        }
    }

    #[test]
    fn builder_defaults() {
        let builder = TrapListenerBuilder::new();
        assert_eq!(builder.bind_addr, "0.0.0.0:162");
        assert!(builder.handlers.is_empty());
    }

    #[tokio::test]
    async fn handler_registration_is_idempotent() {
        let listener = TrapListener::builder()
            .bind("127.0.0.1:0")
            .build()
            .await
            .unwrap();

        let handler: Arc<dyn TrapHandler> = Arc::new(CountingHandler);
        listener.add_handler(handler.clone());
        listener.add_handler(handler.clone());
        assert_eq!(listener.inner.handlers.read().unwrap().len(), 1);

        listener.remove_handler(&handler);
        listener.remove_handler(&handler);
        assert!(listener.inner.handlers.read().unwrap().is_empty());
    }
}
