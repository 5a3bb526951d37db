//! End-to-end session behaviour against a scripted remote end.

mod common;

use std::time::Duration;

use anyhow::Result;
use cdtp::domain::input::{DispatchKeyEventParams, KeyEventType, SetIgnoreInputEventsParams};
use cdtp::{Empty, Error, Event, Session, SessionOptions};
use futures_util::{FutureExt, SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};
use tokio_tungstenite::tungstenite::Message;

use common::pair;

#[derive(Debug, Deserialize, PartialEq)]
struct Tick {
    n: u32,
}

impl Event for Tick {
    const NAME: &'static str = "Test.tick";
}

// ============================================================================
// Correlation
// ============================================================================

#[tokio::test]
async fn concurrent_calls_resolve_out_of_order() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());

    let calls: Vec<_> = (0..3)
        .map(|i| {
            let session = session.clone();
            tokio::spawn(async move { session.invoke("Test.echo", &json!({ "n": i })).await })
        })
        .collect();

    let mut commands = Vec::new();
    for _ in 0..3 {
        commands.push(remote.recv().await);
    }

    let mut ids: Vec<u64> = commands.iter().map(|c| c["id"].as_u64().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3, "ids must be unique");

    for command in commands.iter().rev() {
        remote.reply(command, command["params"].clone()).await;
    }

    let mut seen = Vec::new();
    for call in calls {
        let result = call.await??;
        seen.push(result["n"].as_u64().unwrap());
    }
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(session.pending_count(), 0);
    assert_eq!(session.anomaly_count(), 0);
    Ok(())
}

#[tokio::test]
async fn typed_key_event_omits_unset_fields() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());

    let call = tokio::spawn({
        let session = session.clone();
        async move {
            let params = DispatchKeyEventParams::new(KeyEventType::KeyDown).with_code("KeyA");
            session.call(&params).await
        }
    });

    let command = remote.recv().await;
    assert_eq!(command["method"], "Input.dispatchKeyEvent");
    assert_eq!(command["params"], json!({"type": "keyDown", "code": "KeyA"}));
    remote.reply(&command, json!({})).await;

    let result: Empty = assert_ok!(call.await?);
    assert_eq!(result, Empty {});
    Ok(())
}

#[tokio::test]
async fn remote_error_is_returned_to_caller() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());

    let call = tokio::spawn({
        let session = session.clone();
        async move { session.invoke("Nope.nothing", &json!({})).await }
    });

    let command = remote.recv().await;
    remote
        .send(json!({
            "id": command["id"],
            "error": {"code": -32601, "message": "method not found"}
        }))
        .await;

    let err = assert_err!(call.await?);
    assert_eq!(err.remote_code(), Some(-32601));
    match err {
        Error::Remote { message, data, .. } => {
            assert_eq!(message, "method not found");
            assert!(data.is_none());
        }
        other => panic!("expected remote error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn timeout_then_late_response_counts_as_stale() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());

    let call = tokio::spawn({
        let session = session.clone();
        async move {
            session
                .invoke_with_timeout("Slow.op", &json!({}), Duration::from_millis(50))
                .await
        }
    });

    let slow = remote.recv().await;
    let err = assert_err!(call.await?);
    assert!(err.is_timeout());
    assert_eq!(session.pending_count(), 0);

    remote.reply(&slow, json!({"late": true})).await;

    // A later round trip proves the loop already handled the late frame.
    let call = tokio::spawn({
        let session = session.clone();
        async move { session.invoke("Fast.op", &json!({})).await }
    });
    let fast = remote.recv().await;
    remote.reply(&fast, json!({})).await;
    assert_ok!(call.await?);

    assert_eq!(session.stats().stale_responses, 1);
    Ok(())
}

#[tokio::test]
async fn default_timeout_applies_to_typed_calls() -> Result<()> {
    let options = SessionOptions::new().with_default_timeout(Duration::from_millis(30));
    let (session, mut remote) = pair(options);

    let call = tokio::spawn({
        let session = session.clone();
        async move { session.call(&SetIgnoreInputEventsParams::new(true)).await }
    });

    let command = remote.recv().await;
    assert_eq!(command["params"], json!({"ignore": true}));

    let err = assert_err!(call.await?);
    assert!(matches!(
        err,
        Error::Timeout { ref method, .. } if method == "Input.setIgnoreInputEvents"
    ));
    Ok(())
}

#[tokio::test]
async fn max_pending_rejects_excess_calls() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new().with_max_pending(1));

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.invoke("A.one", &json!({})).await }
    });
    let command = remote.recv().await;

    let err = assert_err!(session.invoke("A.two", &json!({})).await);
    assert!(matches!(err, Error::Protocol { .. }));

    remote.reply(&command, json!({})).await;
    assert_ok!(first.await?);
    Ok(())
}

// ============================================================================
// Closure
// ============================================================================

#[tokio::test]
async fn close_fails_every_pending_call() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());

    let calls: Vec<_> = (0..5)
        .map(|_| {
            let session = session.clone();
            tokio::spawn(async move { session.invoke("Hang.forever", &json!({})).await })
        })
        .collect();

    for _ in 0..5 {
        remote.recv().await;
    }
    assert_eq!(session.pending_count(), 5);

    session.close().await;

    for call in calls {
        let err = assert_err!(call.await?);
        assert!(matches!(err, Error::ConnectionClosed));
    }
    assert_eq!(session.pending_count(), 0);
    assert!(session.is_closed());

    let err = assert_err!(session.invoke("After.close", &json!({})).await);
    assert!(matches!(err, Error::ConnectionClosed));

    assert!(remote.recv_eof().await.is_none());
    Ok(())
}

#[tokio::test]
async fn remote_hang_up_ends_calls_and_streams() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());
    let mut events = session.events::<Tick>();

    let call = tokio::spawn({
        let session = session.clone();
        async move { session.invoke("Hang.forever", &json!({})).await }
    });
    remote.recv().await;
    remote.hang_up().await;

    let err = assert_err!(call.await?);
    assert!(err.is_connection_error());

    assert!(matches!(events.next_event().await, Some(Err(Error::ConnectionClosed))));
    assert!(events.next_event().await.is_none());

    let mut late = session.events::<Tick>();
    assert!(matches!(late.next_event().await, Some(Err(Error::ConnectionClosed))));
    assert!(late.next_event().await.is_none());
    Ok(())
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn events_fan_out_in_arrival_order() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());

    // Published before anyone listens: dropped.
    remote.send(json!({"method": "Test.tick", "params": {"n": 0}})).await;
    let sync = tokio::spawn({
        let session = session.clone();
        async move { session.invoke("Sync.point", &json!({})).await }
    });
    let command = remote.recv().await;
    remote.reply(&command, json!({})).await;
    sync.await??;

    let mut first = session.events::<Tick>();
    let mut second = session.events_raw("Test.tick");

    for n in 1..=3 {
        remote.send(json!({"method": "Test.tick", "params": {"n": n}})).await;
    }

    for n in 1..=3 {
        assert_eq!(first.next_event().await.expect("item")?, Tick { n });
        assert_eq!(second.next_event().await.expect("item")?, json!({"n": n}));
    }
    Ok(())
}

#[tokio::test]
async fn event_before_result_is_delivered_first() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());
    let mut events = session.events::<Tick>();

    let call = tokio::spawn({
        let session = session.clone();
        async move { session.invoke("Page.reload", &json!({})).await }
    });
    let command = remote.recv().await;

    remote.send(json!({"method": "Test.tick", "params": {"n": 7}})).await;
    remote.reply(&command, json!({})).await;
    call.await??;

    let queued = events.next_event().now_or_never().flatten().expect("queued before result");
    assert_eq!(queued?, Tick { n: 7 });
    Ok(())
}

#[tokio::test]
async fn undecodable_event_does_not_end_stream() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());
    let mut events = session.events::<Tick>();

    remote.send(json!({"method": "Test.tick", "params": {"n": "not a number"}})).await;
    remote.send(json!({"method": "Test.tick", "params": {"n": 2}})).await;

    assert!(matches!(events.next_event().await, Some(Err(Error::Json(_)))));
    assert_eq!(events.next_event().await.expect("item")?, Tick { n: 2 });
    Ok(())
}

#[tokio::test]
async fn dropping_stream_unsubscribes() -> Result<()> {
    let (session, _remote) = pair(SessionOptions::new());

    let events = session.events_raw("Network.requestWillBeSent");
    let kept = session.events_raw("Network.requestWillBeSent");
    assert_eq!(session.stats().subscriptions, 2);

    drop(events);
    assert_eq!(session.stats().subscriptions, 1);

    assert!(session.unsubscribe(kept.id()));
    assert!(!session.unsubscribe(kept.id()));
    assert_eq!(session.stats().subscriptions, 0);
    Ok(())
}

// ============================================================================
// Anomalies
// ============================================================================

#[tokio::test]
async fn anomalies_are_counted_and_connection_survives() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());

    remote.send_raw("{ not json").await;
    remote.send(json!({"id": 999, "result": {}})).await;
    remote.send(json!({"id": 5, "method": "Runtime.evaluate", "params": {}})).await;

    let call = tokio::spawn({
        let session = session.clone();
        async move { session.invoke("Still.alive", &json!({})).await }
    });
    let command = remote.recv().await;
    remote.reply(&command, json!({"ok": true})).await;
    assert_eq!(call.await??, json!({"ok": true}));

    let stats = session.stats();
    assert_eq!(stats.malformed_frames, 1);
    assert_eq!(stats.stale_responses, 1);
    assert_eq!(stats.unserved_commands, 1);
    assert_eq!(session.anomaly_count(), 3);
    Ok(())
}

#[tokio::test]
async fn invalid_utf8_line_is_counted_and_connection_survives() -> Result<()> {
    let (session, mut remote) = pair(SessionOptions::new());

    remote.send_bytes(b"{\"method\":\"A.b\",\"params\":\"\xff\xfe\"}").await;

    let call = tokio::spawn({
        let session = session.clone();
        async move { session.invoke("Still.alive", &json!({})).await }
    });
    let command = remote.recv().await;
    remote.reply(&command, json!({"ok": true})).await;
    assert_eq!(call.await??, json!({"ok": true}));

    assert_eq!(session.stats().malformed_frames, 1);
    assert!(!session.is_closed());
    Ok(())
}

// ============================================================================
// WebSocket
// ============================================================================

#[tokio::test]
async fn websocket_session_round_trip() -> Result<()> {
    common::init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream).await.expect("handshake");

        let Some(Ok(Message::Text(text))) = ws.next().await else {
            panic!("expected a text frame");
        };
        let command: Value = serde_json::from_str(text.as_str()).expect("json");

        let event = json!({"method": "Test.tick", "params": {"n": 1}});
        ws.send(Message::Text(event.to_string().into())).await.expect("send");

        let reply = json!({"id": command["id"], "result": {"echo": command["params"]}});
        ws.send(Message::Text(reply.to_string().into())).await.expect("send");

        // Drain until the client closes.
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
    });

    let session = Session::builder()
        .default_timeout(Duration::from_secs(5))
        .connect(&format!("ws://{addr}/devtools/page/1"))
        .await?;
    let mut events = session.events::<Tick>();

    let result = session.invoke("Test.echo", &json!({"v": 42})).await?;
    assert_eq!(result, json!({"echo": {"v": 42}}));
    assert_eq!(events.next_event().await.expect("item")?, Tick { n: 1 });

    session.close().await;
    server.await?;
    Ok(())
}

#[tokio::test]
async fn connect_rejects_non_websocket_urls() {
    let err = assert_err!(Session::connect("http://127.0.0.1:9222", SessionOptions::new()).await);
    assert!(matches!(err, Error::Config { .. }));
}
