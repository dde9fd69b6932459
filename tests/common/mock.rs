//! Scripted transport for driving the client without sockets.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use snmpv1::{Error, Transport};

type Responder = dyn Fn(&Bytes) -> Vec<Bytes> + Send + Sync;

/// A [`Transport`] whose peer is a closure.
///
/// Every `send` hands the request bytes to the responder; whatever datagrams
/// it returns are queued for subsequent `recv` calls. An empty queue behaves
/// like a silent peer: `recv` sleeps out its timeout and fails.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

struct Inner {
    peer: SocketAddr,
    responder: Box<Responder>,
    queue: Mutex<VecDeque<Bytes>>,
    sent: Mutex<Vec<Bytes>>,
}

impl MockTransport {
    pub fn new(responder: impl Fn(&Bytes) -> Vec<Bytes> + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                peer: "192.0.2.1:161".parse().unwrap(),
                responder: Box::new(responder),
                queue: Mutex::new(VecDeque::new()),
                sent: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A peer that never answers.
    pub fn silent() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Every request datagram the client has sent, in order.
    pub fn sent(&self) -> Vec<Bytes> {
        self.inner.sent.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> snmpv1::Result<()> {
        let request = Bytes::copy_from_slice(data);
        self.inner.sent.lock().unwrap().push(request.clone());

        let replies = (self.inner.responder)(&request);
        self.inner.queue.lock().unwrap().extend(replies);
        Ok(())
    }

    async fn recv(&self, timeout: Duration) -> snmpv1::Result<(Bytes, SocketAddr)> {
        let next = self.inner.queue.lock().unwrap().pop_front();
        match next {
            Some(datagram) => Ok((datagram, self.inner.peer)),
            None => {
                tokio::time::sleep(timeout).await;
                Err(Error::Timeout {
                    target: self.inner.peer,
                    elapsed: timeout,
                })
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.peer
    }

    fn local_addr(&self) -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }
}
