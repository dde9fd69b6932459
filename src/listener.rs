//! Request listener contract.
//!
//! An [`Agent`](crate::Agent) answers nothing by itself: registered
//! listeners each contribute the variables they know, and the agent merges
//! the partial answers. The failure path is part of the contract: a
//! listener reports a handled failure as a [`RequestFailure`] value carrying
//! the status and 1-based varbind index, and the agent encodes exactly those
//! into the response.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::ErrorStatus;
use crate::message::Version;
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::varbind::VarBind;

/// Boxed future type used by the listener traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a listener call.
pub type ListenerResult<T> = std::result::Result<T, RequestFailure>;

/// A handled, reportable failure from a listener.
///
/// Maps directly onto the `error-status`/`error-index` fields of the
/// GetResponse the agent will send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFailure {
    pub status: ErrorStatus,
    /// 1-based index of the varbind at fault; 0 when the request as a whole
    /// failed.
    pub index: u32,
}

impl RequestFailure {
    /// A failure pinned to a specific varbind.
    pub fn new(status: ErrorStatus, index: u32) -> Self {
        Self { status, index }
    }

    /// The generic failure: status `failed`, no specific varbind.
    pub fn general() -> Self {
        Self {
            status: ErrorStatus::Failed,
            index: 0,
        }
    }
}

impl std::fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at index {}", self.status, self.index)
    }
}

/// Facts about the incoming request, passed to every listener call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Address the datagram came from.
    pub source: SocketAddr,
    /// Community string as received; listeners may use it for their own
    /// access decisions.
    pub community: Bytes,
    pub version: Version,
    pub pdu_type: PduType,
    pub request_id: i32,
}

/// A GetNext answer: the OID that was asked about, and the variable that
/// lexicographically follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct NextVarBind {
    /// The OID from the request this answer belongs to.
    pub requested: Oid,
    /// The next variable after `requested`.
    pub next: VarBind,
}

impl NextVarBind {
    pub fn new(requested: Oid, next: VarBind) -> Self {
        Self { requested, next }
    }
}

/// A provider of MIB variables, registered with an [`Agent`](crate::Agent).
///
/// For each incoming request the agent calls every registered listener in
/// registration order and merges the partial answers, first listener wins.
/// A listener simply omits OIDs it does not know; returning `Err` aborts the
/// request with the carried status and index.
///
/// # Example
///
/// ```rust
/// use snmpv1::{
///     BoxFuture, ListenerResult, NextVarBind, Pdu, RequestContext,
///     RequestListener, Value, VarBind, oid,
/// };
///
/// struct SysDescr;
///
/// impl RequestListener for SysDescr {
///     fn process_request<'a>(
///         &'a self,
///         _ctx: &'a RequestContext,
///         pdu: &'a Pdu,
///     ) -> BoxFuture<'a, ListenerResult<Vec<VarBind>>> {
///         Box::pin(async move {
///             let target = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
///             Ok(pdu
///                 .varbinds
///                 .iter()
///                 .filter(|vb| vb.oid == target)
///                 .map(|vb| VarBind::new(vb.oid.clone(), Value::from("my device")))
///                 .collect())
///         })
///     }
///
///     fn process_get_next_request<'a>(
///         &'a self,
///         _ctx: &'a RequestContext,
///         _pdu: &'a Pdu,
///     ) -> BoxFuture<'a, ListenerResult<Vec<NextVarBind>>> {
///         Box::pin(async { Ok(Vec::new()) })
///     }
/// }
/// ```
pub trait RequestListener: Send + Sync {
    /// Answer a Get or Set request.
    ///
    /// Return a varbind for every requested OID this listener can answer
    /// (for Set, the value actually stored). OIDs this listener does not
    /// own are simply left out.
    fn process_request<'a>(
        &'a self,
        ctx: &'a RequestContext,
        pdu: &'a Pdu,
    ) -> BoxFuture<'a, ListenerResult<Vec<VarBind>>>;

    /// Answer a GetNext request.
    ///
    /// For every requested OID this listener can advance past, return the
    /// requested OID paired with its successor variable.
    fn process_get_next_request<'a>(
        &'a self,
        ctx: &'a RequestContext,
        pdu: &'a Pdu,
    ) -> BoxFuture<'a, ListenerResult<Vec<NextVarBind>>>;
}
