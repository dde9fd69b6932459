//! Client exchange behavior against a scripted transport: request-id
//! correlation, timeout handling, and typed protocol errors.

mod common;

use std::time::Duration;

use bytes::Bytes;
use common::MockTransport;
use snmpv1::{
    BadValueKind, Client, ClientConfig, Error, ErrorStatus, GenericTrap, Message, Pdu, TrapPdu,
    Value, VarBind, Version, oid,
};

fn test_config() -> ClientConfig {
    ClientConfig {
        community: Bytes::from_static(b"public"),
        timeout: Duration::from_millis(200),
    }
}

/// Decode a request datagram the client produced.
fn decode_request(data: &Bytes) -> Pdu {
    Message::decode(data.clone())
        .expect("client datagram decodes")
        .into_pdu()
        .expect("client sends request PDUs")
}

/// Answer a request with the given value for every requested OID.
fn answer(request: &Bytes, value: Value) -> Bytes {
    let pdu = decode_request(request);
    let varbinds = pdu
        .varbinds
        .iter()
        .map(|vb| VarBind::new(vb.oid.clone(), value.clone()))
        .collect();
    let response = pdu.to_response(varbinds);
    Message::new(Version::V1, "public", response).encode()
}

/// A reply with a stale request-id must be discarded; the client keeps
/// waiting for the matching one.
#[tokio::test]
async fn stale_request_id_is_discarded() {
    let transport = MockTransport::new(|request| {
        let pdu = decode_request(request);

        // First a reply carrying a wrong id, then the real one
        let mut stale = pdu.clone();
        stale.request_id = pdu.request_id.wrapping_add(1000);
        let stale_reply = Message::new(
            Version::V1,
            "public",
            stale.to_response(vec![VarBind::new(
                pdu.varbinds[0].oid.clone(),
                Value::from("stale"),
            )]),
        );

        let good_reply = Message::new(
            Version::V1,
            "public",
            pdu.to_response(vec![VarBind::new(
                pdu.varbinds[0].oid.clone(),
                Value::from("fresh"),
            )]),
        );

        vec![stale_reply.encode(), good_reply.encode()]
    });

    let client = Client::new(transport, test_config());
    let vb = client.get(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)).await.unwrap();
    assert_eq!(vb.value.as_str(), Some("fresh"));
}

/// Garbage and non-response datagrams ahead of the reply are skipped.
#[tokio::test]
async fn garbage_and_traps_are_skipped() {
    let transport = MockTransport::new(|request| {
        let trap = Message::trap(
            Version::V1,
            "public",
            TrapPdu::new(
                oid!(1, 3, 6, 1, 4, 1, 1),
                [10, 0, 0, 1],
                GenericTrap::ColdStart,
                0,
                1,
                vec![],
            ),
        );
        vec![
            Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]),
            trap.encode(),
            answer(request, Value::Integer(7)),
        ]
    });

    let client = Client::new(transport, test_config());
    let vb = client.get(&oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)).await.unwrap();
    assert_eq!(vb.value, Value::Integer(7));
}

/// A silent peer is a transport-level timeout, never a protocol error.
#[tokio::test]
async fn silent_peer_times_out() {
    let client = Client::new(MockTransport::silent(), test_config());

    let err = client.get(&oid!(1, 3, 6, 1)).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

/// A non-zero error-status becomes a typed Get error with the index and the
/// OID it points at.
#[tokio::test]
async fn error_status_becomes_typed_error() {
    let transport = MockTransport::new(|request| {
        let pdu = decode_request(request);
        let response = pdu.to_error_response(ErrorStatus::ValueNotAvailable, 1);
        vec![Message::new(Version::V1, "public", response).encode()]
    });

    let client = Client::new(transport, test_config());
    let target = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
    let err = client.get(&target).await.unwrap_err();

    match err {
        Error::Get { status, index, oid } => {
            assert_eq!(status, ErrorStatus::ValueNotAvailable);
            assert_eq!(index, 1);
            assert_eq!(oid, Some(target));
        }
        other => panic!("expected Get error, got {:?}", other),
    }
}

/// Set failures surface as Set errors, distinct from Get.
#[tokio::test]
async fn set_failure_is_a_set_error() {
    let transport = MockTransport::new(|request| {
        let pdu = decode_request(request);
        let response = pdu.to_error_response(ErrorStatus::ValueReadOnly, 1);
        vec![Message::new(Version::V1, "public", response).encode()]
    });

    let client = Client::new(transport, test_config());
    let err = client
        .set(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("x"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Set {
            status: ErrorStatus::ValueReadOnly,
            index: 1,
            ..
        }
    ));
}

/// A Get response whose OIDs are not positionally aligned with the request
/// is rejected.
#[tokio::test]
async fn misaligned_response_rejected() {
    let transport = MockTransport::new(|request| {
        let pdu = decode_request(request);
        let response = pdu.to_response(vec![VarBind::new(
            oid!(9, 9, 9),
            Value::Integer(0),
        )]);
        vec![Message::new(Version::V1, "public", response).encode()]
    });

    let client = Client::new(transport, test_config());
    let err = client.get(&oid!(1, 3, 6, 1)).await.unwrap_err();

    assert!(matches!(
        err,
        Error::BadValue {
            kind: BadValueKind::ResponseOidMismatch { index: 0 },
            ..
        }
    ));
}

/// The request-id advances only after a completed cycle: a timed-out id is
/// reused on the next call.
#[tokio::test]
async fn request_id_advances_per_completed_cycle() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let mute = Arc::new(AtomicBool::new(false));
    let mute_flag = mute.clone();
    let transport = MockTransport::new(move |request| {
        if mute_flag.load(Ordering::SeqCst) {
            Vec::new()
        } else {
            vec![answer(request, Value::Integer(1))]
        }
    });

    let client = Client::new(transport.clone(), test_config());
    let target = oid!(1, 3, 6, 1);

    client.get(&target).await.unwrap();
    client.get(&target).await.unwrap();

    // Third exchange times out; its id must be reused afterwards
    mute.store(true, Ordering::SeqCst);
    client.get(&target).await.unwrap_err();
    mute.store(false, Ordering::SeqCst);
    client.get(&target).await.unwrap();

    let ids: Vec<i32> = transport.sent().iter().map(|d| decode_request(d).request_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 3]);
}

/// An empty OID batch never touches the wire.
#[tokio::test]
async fn empty_batch_is_a_local_noop() {
    let transport = MockTransport::silent();
    let client = Client::new(transport.clone(), test_config());

    assert!(client.get_many(&[]).await.unwrap().is_empty());
    assert!(client.get_next_many(&[]).await.unwrap().is_empty());
    assert!(client.set_many(&[]).await.unwrap().is_empty());
    assert!(transport.sent().is_empty());
}

/// A response with fewer varbinds than requested is malformed.
#[tokio::test]
async fn short_response_rejected() {
    let transport = MockTransport::new(|request| {
        let pdu = decode_request(request);
        let response = pdu.to_response(Vec::new());
        vec![Message::new(Version::V1, "public", response).encode()]
    });

    let client = Client::new(transport, test_config());
    let err = client.get(&oid!(1, 3, 6, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        Error::BadValue {
            kind: BadValueKind::EmptyResponse,
            ..
        }
    ));
}
