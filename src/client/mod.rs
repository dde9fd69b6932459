//! SNMP polling client.
//!
//! Synchronous request/response semantics over an unreliable transport: one
//! outstanding request at a time, correlated by request-id, with a read
//! timeout. Stray and late replies on the socket are discarded by the
//! correlation loop; a timeout surfaces as a transport error the caller must
//! treat as a communication failure, never as "value not available".

mod walk;

pub use walk::TableRow;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::error::{BadValueKind, Error, Result};
use crate::message::{Message, Version};
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::transport::{Transport, UdpTransport};
use crate::value::Value;
use crate::varbind::VarBind;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Community string sent with every request (default: `public`).
    pub community: Bytes,
    /// How long to wait for a correlated reply (default: 15 seconds).
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            community: Bytes::from_static(b"public"),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    target: String,
    config: ClientConfig,
}

impl ClientBuilder {
    fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            config: ClientConfig::default(),
        }
    }

    /// Set the community string.
    pub fn community(mut self, community: impl AsRef<[u8]>) -> Self {
        self.config.community = Bytes::copy_from_slice(community.as_ref());
        self
    }

    /// Set the reply timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Resolve the target and connect a UDP transport.
    pub async fn connect(self) -> Result<Client<UdpTransport>> {
        let peer = resolve(&self.target).await?;
        let transport = UdpTransport::connect(peer).await?;
        Ok(Client::new(transport, self.config))
    }
}

async fn resolve(target: &str) -> Result<SocketAddr> {
    if let Ok(addr) = target.parse() {
        return Ok(addr);
    }
    tokio::net::lookup_host(target)
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| Error::Config(format!("cannot resolve target: {}", target).into()))
}

/// SNMPv1 polling client.
///
/// Generic over [`Transport`], with [`UdpTransport`] as the default. Cloning
/// shares the underlying socket and request-id counter.
#[derive(Clone)]
pub struct Client<T: Transport = UdpTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    transport: T,
    config: ClientConfig,
    // Owned request-id state. Holding this lock across the whole exchange
    // is what makes requests one-at-a-time; the id increments only after a
    // completed request/response cycle.
    request_id: Mutex<i32>,
}

impl Client<UdpTransport> {
    /// Create a builder targeting `host:port`.
    ///
    /// ```rust,no_run
    /// # async fn example() -> snmpv1::Result<()> {
    /// let client = snmpv1::Client::builder("192.168.1.1:161")
    ///     .community("public")
    ///     .connect()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(target: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(target)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over an already-connected transport.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                config,
                request_id: Mutex::new(1),
            }),
        }
    }

    /// The peer this client polls.
    pub fn peer_addr(&self) -> SocketAddr {
        self.inner.transport.peer_addr()
    }

    /// Get a single variable.
    pub async fn get(&self, oid: &Oid) -> Result<VarBind> {
        let varbinds = self.get_many(std::slice::from_ref(oid)).await?;
        varbinds
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid(BadValueKind::EmptyResponse))
    }

    /// Get a batch of variables in one request.
    ///
    /// Results come back in request order; a failure on any variable fails
    /// the whole request with the offending 1-based index.
    pub async fn get_many(&self, oids: &[Oid]) -> Result<Vec<VarBind>> {
        let varbinds = oids.iter().cloned().map(VarBind::null).collect();
        self.transact(PduType::GetRequest, varbinds).await
    }

    /// Get the variable lexicographically following `oid`.
    pub async fn get_next(&self, oid: &Oid) -> Result<VarBind> {
        let varbinds = self.get_next_many(std::slice::from_ref(oid)).await?;
        varbinds
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid(BadValueKind::EmptyResponse))
    }

    /// GetNext for a batch of OIDs in one request.
    pub async fn get_next_many(&self, oids: &[Oid]) -> Result<Vec<VarBind>> {
        let varbinds = oids.iter().cloned().map(VarBind::null).collect();
        self.transact(PduType::GetNextRequest, varbinds).await
    }

    /// Set a single variable; returns the varbind the agent stored.
    pub async fn set(&self, oid: &Oid, value: Value) -> Result<VarBind> {
        let varbinds = self
            .set_many(std::slice::from_ref(&(oid.clone(), value)))
            .await?;
        varbinds
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid(BadValueKind::EmptyResponse))
    }

    /// Set a batch of variables in one request.
    pub async fn set_many(&self, values: &[(Oid, Value)]) -> Result<Vec<VarBind>> {
        let varbinds = values
            .iter()
            .map(|(oid, value)| VarBind::new(oid.clone(), value.clone()))
            .collect();
        self.transact(PduType::SetRequest, varbinds).await
    }

    /// One full request/response exchange.
    pub(crate) async fn transact(
        &self,
        pdu_type: PduType,
        varbinds: Vec<VarBind>,
    ) -> Result<Vec<VarBind>> {
        if varbinds.is_empty() {
            return Ok(Vec::new());
        }

        // Taking the lock for the whole exchange keeps a single request
        // outstanding per client.
        let mut id_slot = self.inner.request_id.lock().await;
        let request_id = *id_slot;

        let request = Pdu {
            pdu_type,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        };

        tracing::debug!(
            target: "snmpv1::client",
            peer = %self.peer_addr(),
            pdu_type = %pdu_type,
            request_id,
            varbind_count = request.varbinds.len(),
            "sending request"
        );

        let message = Message::new(
            Version::V1,
            self.inner.config.community.clone(),
            request.clone(),
        );
        self.inner.transport.send(&message.encode()).await?;

        let response = self.recv_correlated(request_id).await?;

        tracing::debug!(
            target: "snmpv1::client",
            peer = %self.peer_addr(),
            request_id,
            error_status = response.error_status,
            error_index = response.error_index,
            "received response"
        );

        if response.is_error() {
            let status = response.error_status_enum();
            let index = response.error_index.max(0) as u32;
            // error_index is 1-based; resolve it back to the request OID
            let oid = (index as usize)
                .checked_sub(1)
                .and_then(|i| request.varbinds.get(i))
                .map(|vb| vb.oid.clone());

            return Err(if pdu_type == PduType::SetRequest {
                Error::Set { status, index, oid }
            } else {
                Error::Get { status, index, oid }
            });
        }

        if response.varbinds.len() < request.varbinds.len() {
            return Err(Error::invalid(BadValueKind::EmptyResponse));
        }

        // Get and Set responses are positionally aligned with the request;
        // GetNext legitimately returns different (successor) OIDs.
        if matches!(pdu_type, PduType::GetRequest | PduType::SetRequest) {
            for (index, (got, want)) in response
                .varbinds
                .iter()
                .zip(request.varbinds.iter())
                .enumerate()
            {
                if got.oid != want.oid {
                    return Err(Error::invalid(BadValueKind::ResponseOidMismatch { index }));
                }
            }
        }

        // Completed cycle: only now does the id advance
        *id_slot = id_slot.wrapping_add(1);
        Ok(response.varbinds)
    }

    /// Receive until a GetResponse with the matching request-id arrives or
    /// the timeout elapses. Everything else on the socket (undecodable
    /// datagrams, traps, replies to earlier requests) is discarded.
    async fn recv_correlated(&self, request_id: i32) -> Result<Pdu> {
        let deadline = tokio::time::Instant::now() + self.inner.config.timeout;

        loop {
            let remaining = deadline
                .checked_duration_since(tokio::time::Instant::now())
                .filter(|d| !d.is_zero())
                .ok_or(Error::Timeout {
                    target: self.peer_addr(),
                    elapsed: self.inner.config.timeout,
                })?;

            let (datagram, _source) = self.inner.transport.recv(remaining).await?;

            let pdu = match Message::decode(datagram).and_then(Message::into_pdu) {
                Ok(pdu) => pdu,
                Err(e) => {
                    tracing::debug!(target: "snmpv1::client", peer = %self.peer_addr(), error = %e, "discarding undecodable datagram");
                    continue;
                }
            };

            if pdu.request_id != request_id {
                tracing::debug!(
                    target: "snmpv1::client",
                    peer = %self.peer_addr(),
                    expected = request_id,
                    actual = pdu.request_id,
                    "discarding reply with stale request-id"
                );
                continue;
            }

            return Ok(pdu);
        }
    }
}
