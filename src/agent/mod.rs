//! SNMP agent: the request-serving role.
//!
//! The agent binds one UDP socket and runs one receive loop:
//! decode message → fan out to registered listeners → merge partial answers
//! → reply with a GetResponse. Requests are processed inline, one at a time;
//! a slow listener delays only that request/response cycle and the loop
//! re-enters its receive afterwards.
//!
//! # Example
//!
//! ```rust,no_run
//! use snmpv1::agent::Agent;
//! use snmpv1::{
//!     BoxFuture, ListenerResult, NextVarBind, Pdu, RequestContext, RequestListener,
//!     Value, VarBind, oid,
//! };
//! use std::sync::Arc;
//!
//! struct SysDescr;
//!
//! impl RequestListener for SysDescr {
//!     fn process_request<'a>(
//!         &'a self,
//!         _ctx: &'a RequestContext,
//!         pdu: &'a Pdu,
//!     ) -> BoxFuture<'a, ListenerResult<Vec<VarBind>>> {
//!         Box::pin(async move {
//!             let target = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
//!             Ok(pdu
//!                 .varbinds
//!                 .iter()
//!                 .filter(|vb| vb.oid == target)
//!                 .map(|vb| VarBind::new(vb.oid.clone(), Value::from("my device")))
//!                 .collect())
//!         })
//!     }
//!
//!     fn process_get_next_request<'a>(
//!         &'a self,
//!         _ctx: &'a RequestContext,
//!         _pdu: &'a Pdu,
//!     ) -> BoxFuture<'a, ListenerResult<Vec<NextVarBind>>> {
//!         Box::pin(async { Ok(Vec::new()) })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> snmpv1::Result<()> {
//!     let agent = Agent::builder()
//!         .bind("0.0.0.0:161")
//!         .listener(Arc::new(SysDescr))
//!         .build()
//!         .await?;
//!     agent.run().await
//! }
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use subtle::ConstantTimeEq;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ErrorStatus, Result};
use crate::listener::{RequestContext, RequestListener};
use crate::message::{Message, MessageBody, Version};
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType, TrapPdu};
use crate::util::bind_udp_socket;
use crate::varbind::VarBind;

/// Builder for [`Agent`].
pub struct AgentBuilder {
    bind_addr: String,
    communities: Vec<Vec<u8>>,
    listeners: Vec<Arc<dyn RequestListener>>,
    cancel: Option<CancellationToken>,
}

impl AgentBuilder {
    /// Create a builder with defaults: bind `0.0.0.0:161`, accept every
    /// community, no listeners.
    pub fn new() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{}", crate::SNMP_PORT),
            communities: Vec::new(),
            listeners: Vec::new(),
            cancel: None,
        }
    }

    /// Set the UDP bind address. Port 161 usually needs privileges; tests
    /// bind `127.0.0.1:0`.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Restrict accepted community strings.
    ///
    /// May be called repeatedly to allow several. With no community
    /// configured the agent accepts any community and leaves access
    /// decisions to listeners; once one is configured, requests carrying an
    /// unknown community are silently dropped.
    pub fn community(mut self, community: impl AsRef<[u8]>) -> Self {
        self.communities.push(community.as_ref().to_vec());
        self
    }

    /// Register a listener at build time. More can be added later with
    /// [`Agent::add_listener`].
    pub fn listener(mut self, listener: Arc<dyn RequestListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Use an external cancellation token for shutdown.
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Bind the socket and build the agent.
    pub async fn build(self) -> Result<Agent> {
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

        Ok(Agent {
            inner: Arc::new(AgentInner {
                socket,
                local_addr,
                communities: self.communities,
                listeners: RwLock::new(self.listeners),
                cancel: self.cancel.unwrap_or_default(),
                running: AtomicBool::new(false),
            }),
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct AgentInner {
    socket: UdpSocket,
    local_addr: SocketAddr,
    communities: Vec<Vec<u8>>,
    // Master registration list; the receive loop works on a per-request
    // snapshot, so add/remove never race the iteration.
    listeners: RwLock<Vec<Arc<dyn RequestListener>>>,
    cancel: CancellationToken,
    running: AtomicBool,
}

/// SNMP agent. See the [module docs](self) for an example.
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

impl Agent {
    /// Create a builder.
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// The bound local address.
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }

    /// The cancellation token driving shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    /// Register a listener.
    ///
    /// Idempotent: registering the same `Arc` twice keeps a single entry.
    /// Listeners answer in registration order.
    pub fn add_listener(&self, listener: Arc<dyn RequestListener>) {
        let mut listeners = self.inner.listeners.write().unwrap();
        if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Remove a previously registered listener; a no-op if absent.
    pub fn remove_listener(&self, listener: &Arc<dyn RequestListener>) {
        let mut listeners = self.inner.listeners.write().unwrap();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Start the receive loop on a background task.
    ///
    /// Idempotent: a second call while the loop is alive does nothing.
    pub fn spawn(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let agent = self.clone();
        tokio::spawn(async move {
            if let Err(e) = agent.run().await {
                tracing::error!(target: "snmpv1::agent", error = %e, "agent loop failed");
            }
        });
    }

    /// Stop the receive loop.
    ///
    /// Idempotent. The loop exits once its current blocking receive
    /// returns; the socket is released when the last clone drops.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    /// Run the receive loop on the calling task until shutdown.
    pub async fn run(&self) -> Result<()> {
        self.inner.running.store(true, Ordering::SeqCst);
        tracing::info!(target: "snmpv1::agent", local_addr = %self.inner.local_addr, "agent listening");

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
                    tracing::info!(target: "snmpv1::agent", "agent shutdown");
                    self.inner.running.store(false, Ordering::SeqCst);
                    return Ok(());
                }
            };

            let data = Bytes::copy_from_slice(&buf[..len]);
            if let Some(response) = self.handle_datagram(data, source).await {
                if let Err(e) = self.inner.socket.send_to(&response, source).await {
                    tracing::warn!(target: "snmpv1::agent", source = %source, error = %e, "failed to send response");
                }
            }
        }
    }

    /// Emit a trap from the agent's own socket, independent of the receive
    /// loop.
    pub async fn send_trap(
        &self,
        target: SocketAddr,
        community: impl Into<Bytes>,
        trap: TrapPdu,
    ) -> Result<()> {
        let message = Message::trap(Version::V1, community, trap);
        let data = message.encode();
        self.inner
            .socket
            .send_to(&data, target)
            .await
            .map_err(|e| Error::Network {
                target: Some(target),
                source: e,
            })?;
        Ok(())
    }

    /// Process one datagram; `None` means no response is sent.
    async fn handle_datagram(&self, data: Bytes, source: SocketAddr) -> Option<Bytes> {
        let message = match Message::decode(data) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(target: "snmpv1::agent", source = %source, error = %e, "dropping undecodable datagram");
                return None;
            }
        };

        let pdu = match &message.body {
            MessageBody::Request(pdu) => pdu,
            MessageBody::Trap(_) => {
                tracing::debug!(target: "snmpv1::agent", source = %source, "ignoring trap on request port");
                return None;
            }
        };

        // GetResponse (and anything else that answers nothing) is silently
        // ignored; the loop continues.
        if !pdu.pdu_type.expects_response() {
            tracing::debug!(target: "snmpv1::agent", source = %source, pdu_type = %pdu.pdu_type, "ignoring unsupported PDU type");
            return None;
        }

        if !self.community_allowed(&message.community) {
            tracing::debug!(target: "snmpv1::agent", source = %source, "dropping request with unknown community");
            return None;
        }

        let ctx = RequestContext {
            source,
            community: message.community.clone(),
            version: message.version,
            pdu_type: pdu.pdu_type,
            request_id: pdu.request_id,
        };

        // Snapshot the registration list for this request
        let listeners: Vec<Arc<dyn RequestListener>> =
            self.inner.listeners.read().unwrap().clone();

        let response = match pdu.pdu_type {
            PduType::GetNextRequest => self.answer_get_next(&ctx, pdu, &listeners).await,
            _ => self.answer_request(&ctx, pdu, &listeners).await,
        };

        tracing::debug!(
            target: "snmpv1::agent",
            source = %source,
            request_id = pdu.request_id,
            error_status = response.error_status,
            error_index = response.error_index,
            "sending response"
        );

        // Same version and community the request carried
        let reply = Message::new(message.version, message.community, response);
        Some(reply.encode())
    }

    /// Answer a Get or Set request.
    async fn answer_request(
        &self,
        ctx: &RequestContext,
        pdu: &Pdu,
        listeners: &[Arc<dyn RequestListener>],
    ) -> Pdu {
        let mut answers: HashMap<Oid, VarBind> = HashMap::new();

        for listener in listeners {
            match listener.process_request(ctx, pdu).await {
                Ok(partial) => {
                    for vb in partial {
                        // first listener wins
                        answers.entry(vb.oid.clone()).or_insert(vb);
                    }
                }
                Err(failure) => {
                    tracing::warn!(target: "snmpv1::agent", source = %ctx.source, failure = %failure, "listener reported failure");
                    return pdu.to_error_response(failure.status, failure.index as i32);
                }
            }
        }

        let mut out = Vec::with_capacity(pdu.varbinds.len());
        for (index, vb) in pdu.varbinds.iter().enumerate() {
            match answers.get(&vb.oid) {
                Some(answer) => out.push(answer.clone()),
                None => {
                    return pdu
                        .to_error_response(ErrorStatus::ValueNotAvailable, (index + 1) as i32);
                }
            }
        }

        pdu.to_response(out)
    }

    /// Answer a GetNext request. Merged answers are keyed by the OID that
    /// was *asked about*, not the successor OID they name.
    async fn answer_get_next(
        &self,
        ctx: &RequestContext,
        pdu: &Pdu,
        listeners: &[Arc<dyn RequestListener>],
    ) -> Pdu {
        let mut answers: HashMap<Oid, VarBind> = HashMap::new();

        for listener in listeners {
            match listener.process_get_next_request(ctx, pdu).await {
                Ok(partial) => {
                    for nvb in partial {
                        answers.entry(nvb.requested).or_insert(nvb.next);
                    }
                }
                Err(failure) => {
                    tracing::warn!(target: "snmpv1::agent", source = %ctx.source, failure = %failure, "listener reported failure");
                    return pdu.to_error_response(failure.status, failure.index as i32);
                }
            }
        }

        let mut out = Vec::with_capacity(pdu.varbinds.len());
        for (index, vb) in pdu.varbinds.iter().enumerate() {
            match answers.get(&vb.oid) {
                Some(next) => out.push(next.clone()),
                None => {
                    return pdu
                        .to_error_response(ErrorStatus::ValueNotAvailable, (index + 1) as i32);
                }
            }
        }

        pdu.to_response(out)
    }

    /// Constant-time community check against the configured allow-list.
    fn community_allowed(&self, community: &[u8]) -> bool {
        if self.inner.communities.is_empty() {
            return true;
        }
        // Compare against every configured community regardless of early
        // matches to keep timing independent of the input.
        let mut allowed = false;
        for configured in &self.inner.communities {
            if configured.len() == community.len()
                && bool::from(configured.as_slice().ct_eq(community))
            {
                allowed = true;
            }
        }
        allowed
    }
}
