//! Test listeners backed by in-memory maps.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use snmpv1::{
    BoxFuture, ListenerResult, NextVarBind, Oid, Pdu, PduType, RequestContext, RequestFailure,
    RequestListener, Value, VarBind,
};

/// A listener serving (and, for Set, storing) values from a BTreeMap.
///
/// GetNext walks the map in key order, which is exactly the lexicographic
/// OID order the protocol wants.
pub struct MapListener {
    map: RwLock<BTreeMap<Oid, Value>>,
}

impl MapListener {
    pub fn new(entries: impl IntoIterator<Item = (Oid, Value)>) -> Self {
        Self {
            map: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Current value for an OID, if present.
    pub fn value(&self, oid: &Oid) -> Option<Value> {
        self.map.read().unwrap().get(oid).cloned()
    }
}

impl RequestListener for MapListener {
    fn process_request<'a>(
        &'a self,
        ctx: &'a RequestContext,
        pdu: &'a Pdu,
    ) -> BoxFuture<'a, ListenerResult<Vec<VarBind>>> {
        Box::pin(async move {
            let mut out = Vec::new();
            let mut map = self.map.write().unwrap();

            for vb in &pdu.varbinds {
                if ctx.pdu_type == PduType::SetRequest {
                    if map.contains_key(&vb.oid) {
                        map.insert(vb.oid.clone(), vb.value.clone());
                        out.push(vb.clone());
                    }
                } else if let Some(value) = map.get(&vb.oid) {
                    out.push(VarBind::new(vb.oid.clone(), value.clone()));
                }
            }

            Ok(out)
        })
    }

    fn process_get_next_request<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        pdu: &'a Pdu,
    ) -> BoxFuture<'a, ListenerResult<Vec<NextVarBind>>> {
        Box::pin(async move {
            let map = self.map.read().unwrap();
            let mut out = Vec::new();

            for vb in &pdu.varbinds {
                let successor = map
                    .range((Bound::Excluded(vb.oid.clone()), Bound::Unbounded))
                    .next();
                if let Some((oid, value)) = successor {
                    out.push(NextVarBind::new(
                        vb.oid.clone(),
                        VarBind::new(oid.clone(), value.clone()),
                    ));
                }
            }

            Ok(out)
        })
    }
}

/// A listener that always reports the configured failure.
pub struct FailingListener(pub RequestFailure);

impl RequestListener for FailingListener {
    fn process_request<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        _pdu: &'a Pdu,
    ) -> BoxFuture<'a, ListenerResult<Vec<VarBind>>> {
        Box::pin(async move { Err(self.0) })
    }

    fn process_get_next_request<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        _pdu: &'a Pdu,
    ) -> BoxFuture<'a, ListenerResult<Vec<NextVarBind>>> {
        Box::pin(async move { Err(self.0) })
    }
}

/// Like [`MapListener`], but once the map runs out of successors GetNext
/// echoes the requested OID back, the shape of a device that stops
/// advancing instead of reporting an error.
pub struct StuckListener {
    map: BTreeMap<Oid, Value>,
}

impl StuckListener {
    pub fn new(entries: impl IntoIterator<Item = (Oid, Value)>) -> Self {
        Self {
            map: entries.into_iter().collect(),
        }
    }
}

impl RequestListener for StuckListener {
    fn process_request<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        pdu: &'a Pdu,
    ) -> BoxFuture<'a, ListenerResult<Vec<VarBind>>> {
        Box::pin(async move {
            Ok(pdu
                .varbinds
                .iter()
                .filter_map(|vb| {
                    self.map
                        .get(&vb.oid)
                        .map(|value| VarBind::new(vb.oid.clone(), value.clone()))
                })
                .collect())
        })
    }

    fn process_get_next_request<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        pdu: &'a Pdu,
    ) -> BoxFuture<'a, ListenerResult<Vec<NextVarBind>>> {
        Box::pin(async move {
            let mut out = Vec::new();
            for vb in &pdu.varbinds {
                let successor = self
                    .map
                    .range((Bound::Excluded(vb.oid.clone()), Bound::Unbounded))
                    .next();
                let next = match successor {
                    Some((oid, value)) => VarBind::new(oid.clone(), value.clone()),
                    // exhausted: repeat the requested OID instead of advancing
                    None => VarBind::new(vb.oid.clone(), Value::Null),
                };
                out.push(NextVarBind::new(vb.oid.clone(), next));
            }
            Ok(out)
        })
    }
}
