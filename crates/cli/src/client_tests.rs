// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tokio::net::TcpListener;

use super::*;

type Handler = Arc<dyn Fn(&Message, &Address) -> Vec<Message> + Send + Sync>;

/// Serve `handler` on a local port; resolve and invoke share the listener.
async fn fake_cluster(
    handler: impl Fn(&Message, &Address) -> Vec<Message> + Send + Sync + 'static,
) -> Address {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = Address::new("127.0.0.1", listener.local_addr().unwrap().port());
    let handler: Handler = Arc::new(handler);
    let me = address.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            let me = me.clone();
            tokio::spawn(async move {
                let mut framed = Framed::new(stream, MessageCodec);
                while let Some(Ok(request)) = framed.next().await {
                    for reply in handler(&request, &me) {
                        if framed.send(reply).await.is_err() {
                            return;
                        }
                    }
                }
            });
        }
    });
    address
}

fn resolved(request: &Message, me: &Address, methods: &[&str]) -> Vec<Message> {
    let methods = methods.iter().map(|m| Value::from(*m)).collect();
    vec![
        Message::new(
            "chunk",
            request.id,
            vec![Value::from(me.host.as_str()), Value::from(me.port), Value::Array(methods)],
        ),
        Message::new("choke", request.id, vec![]),
    ]
}

fn node(request: &Message, me: &Address) -> Vec<Message> {
    match (request.kind.as_str(), request.str_at(0)) {
        ("resolve", Some("node")) => resolved(request, me, &["info", "start_app", "pause_app"]),
        ("resolve", Some(other)) => vec![Message::new(
            "error",
            request.id,
            vec![Value::from(2), Value::from(format!("service '{other}' is not available"))],
        )],
        ("invoke", Some("info")) => vec![
            Message::new("chunk", request.id, vec![Value::from("first")]),
            Message::new("chunk", request.id, vec![Value::from("second")]),
            Message::new("choke", request.id, vec![]),
        ],
        ("invoke", Some("start_app")) => vec![Message::new(
            "error",
            request.id,
            vec![Value::from(1), Value::from("object 'EchoProf' has not been found in 'profiles'")],
        )],
        _ => vec![],
    }
}

fn client(address: Address) -> ClusterClient {
    ClusterClient::new(address, Duration::from_secs(2))
}

#[tokio::test]
async fn resolve_returns_endpoint_and_methods() {
    let address = fake_cluster(node).await;
    let info = client(address.clone()).resolve("node").await.unwrap();

    assert_eq!(info.address, address);
    assert_eq!(info.methods, vec!["info", "start_app", "pause_app"]);
}

#[tokio::test]
async fn unknown_service_is_resolution_error() {
    let address = fake_cluster(node).await;
    let err = client(address).resolve("missing").await.unwrap_err();

    match err {
        ClientError::Resolution { service, reason, .. } => {
            assert_eq!(service, "missing");
            assert_eq!(reason, "service 'missing' is not available");
        }
        other => panic!("expected resolution error, got {other:?}"),
    }
}

#[tokio::test]
async fn invoke_collects_chunks_until_choke() {
    let address = fake_cluster(node).await;
    let replies = client(address).invoke("node", "info", vec![]).await.unwrap();

    assert_eq!(replies, vec![Value::from("first"), Value::from("second")]);
}

#[tokio::test]
async fn remote_error_is_passed_through_verbatim() {
    let address = fake_cluster(node).await;
    let err = client(address).invoke("node", "start_app", vec![]).await.unwrap_err();

    assert!(matches!(err, ClientError::Action(_)));
    assert_eq!(err.to_string(), "object 'EchoProf' has not been found in 'profiles'");
}

#[tokio::test]
async fn method_missing_from_api_is_rejected() {
    let address = fake_cluster(node).await;
    let err = client(address).invoke("node", "reboot", vec![]).await.unwrap_err();

    assert_eq!(err.to_string(), "service \"node\" has no method \"reboot\"");
}

#[tokio::test]
async fn invoke_sends_method_then_arguments() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let record = Arc::clone(&seen);
    let address = fake_cluster(move |request, me| {
        if request.kind == "resolve" {
            return resolved(request, me, &["read"]);
        }
        record.lock().unwrap().push(request.payload.clone());
        vec![Message::new("choke", request.id, vec![])]
    })
    .await;

    let replies = client(address)
        .invoke("storage", "read", vec![Value::from("apps"), Value::from("Echo")])
        .await
        .unwrap();

    assert!(replies.is_empty());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![vec![Value::from("read"), Value::from("apps"), Value::from("Echo")]]
    );
}

#[tokio::test]
async fn replies_for_other_sessions_are_ignored() {
    let address = fake_cluster(|request, me| {
        if request.kind == "resolve" {
            return resolved(request, me, &["info"]);
        }
        vec![
            Message::new("chunk", request.id + 100, vec![Value::from("stray")]),
            Message::new("chunk", request.id, vec![Value::from("mine")]),
            Message::new("choke", request.id, vec![]),
        ]
    })
    .await;

    let replies = client(address).invoke("node", "info", vec![]).await.unwrap();
    assert_eq!(replies, vec![Value::from("mine")]);
}

#[tokio::test]
async fn silent_locator_times_out() {
    let address = fake_cluster(|_, _| vec![]).await;
    let client = ClusterClient::new(address, Duration::from_millis(100));

    let err = client.resolve("node").await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { step: "reply", .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_locator_is_resolution_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = Address::new("127.0.0.1", listener.local_addr().unwrap().port());
    drop(listener);

    let err = client(address.clone()).resolve("node").await.unwrap_err();
    match err {
        ClientError::Resolution { locator, .. } => assert_eq!(locator, address),
        other => panic!("expected resolution error, got {other:?}"),
    }
}

#[tokio::test]
async fn early_close_is_protocol_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = Address::new("127.0.0.1", listener.local_addr().unwrap().port());
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            let mut framed = Framed::new(stream, MessageCodec);
            let _ = framed.next().await;
        }
    });

    let err = client(address).resolve("node").await.unwrap_err();
    assert!(matches!(err, ClientError::Protocol(ProtocolError::Io(_))), "got {err:?}");
}

#[tokio::test]
async fn malformed_locator_reply_is_protocol_error() {
    let address = fake_cluster(|request, _| {
        vec![
            Message::new("chunk", request.id, vec![Value::from("just a host")]),
            Message::new("choke", request.id, vec![]),
        ]
    })
    .await;

    let err = client(address).resolve("node").await.unwrap_err();
    assert!(matches!(err, ClientError::Protocol(ProtocolError::Shape(_))), "got {err:?}");
}

#[test]
fn single_value_chunks_are_unwrapped() {
    assert_eq!(chunk_value(vec![Value::from(1)]), Value::from(1));
    assert_eq!(
        chunk_value(vec![Value::from(1), Value::from(2)]),
        Value::Array(vec![Value::from(1), Value::from(2)])
    );
}

#[test]
fn error_reason_falls_back_to_display() {
    assert_eq!(error_reason(&[Value::from(1), Value::from("boom")]), "boom");
    assert_eq!(error_reason(&[Value::from(1), Value::from(7)]), "7");
    assert_eq!(error_reason(&[]), "remote error without a reason");
}
