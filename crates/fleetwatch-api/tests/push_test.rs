#![allow(clippy::unwrap_used)]
// Integration tests for `PushClient` against a local WebSocket server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use url::Url;

use fleetwatch_api::{PushClient, PushEvent, PushMessage};

// ── Helpers ─────────────────────────────────────────────────────────

/// Accept one WebSocket connection, send `frames`, then wait for `release`
/// before closing (or for the client to close first).
async fn serve(frames: Vec<String>, release: oneshot::Receiver<()>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        for frame in frames {
            ws.send(Message::Text(frame.into())).await.unwrap();
        }
        tokio::select! {
            _ = release => {
                let _ = ws.close(None).await;
            }
            _ = async {
                while let Some(Ok(msg)) = ws.next().await {
                    if msg.is_close() {
                        break;
                    }
                }
            } => {}
        }
    });

    Url::parse(&format!("ws://{addr}")).unwrap()
}

async fn next_event(rx: &mut mpsc::Receiver<PushEvent>) -> PushEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for push event")
        .expect("event channel closed")
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_frames_are_classified_in_order() {
    let (release_tx, release_rx) = oneshot::channel();
    let frames = vec![
        json!([{ "id": "v1", "vehicleNumber": "A" }, { "id": "v2", "vehicleNumber": "B" }])
            .to_string(),
        "this is not json".to_string(),
        json!({ "id": "v1", "vehicleNumber": "X1", "status": "idle" }).to_string(),
        json!({ "total": 10, "idle": 3, "en_route": 4, "delivered": 3, "average_speed": 42 })
            .to_string(),
    ];
    let url = serve(frames, release_rx).await;

    let (_client, mut rx) = PushClient::connect(url, CancellationToken::new());

    assert_eq!(next_event(&mut rx).await, PushEvent::Status(true));

    let PushEvent::Message(PushMessage::Vehicles(list)) = next_event(&mut rx).await else {
        panic!("expected vehicle list");
    };
    assert_eq!(list.len(), 2);

    let PushEvent::Message(PushMessage::Vehicle(vehicle)) = next_event(&mut rx).await else {
        panic!("expected single vehicle");
    };
    assert_eq!(vehicle.vehicle_number, "X1");

    let PushEvent::Message(PushMessage::Statistics(stats)) = next_event(&mut rx).await else {
        panic!("expected statistics");
    };
    assert_eq!(stats.total, 10);

    release_tx.send(()).unwrap();
    assert_eq!(next_event(&mut rx).await, PushEvent::Status(false));
    assert!(rx.recv().await.is_none(), "no reconnection after close");
}

#[tokio::test]
async fn test_disconnect_reports_status_false() {
    let (_release_tx, release_rx) = oneshot::channel();
    let url = serve(Vec::new(), release_rx).await;

    let (mut client, mut rx) = PushClient::connect(url, CancellationToken::new());
    assert_eq!(next_event(&mut rx).await, PushEvent::Status(true));

    client.disconnect().await;
    assert!(client.is_finished());
    assert_eq!(next_event(&mut rx).await, PushEvent::Status(false));

    // Second disconnect is a no-op.
    client.disconnect().await;
}

#[tokio::test]
async fn test_failed_handshake_reports_status_false() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("ws://{addr}")).unwrap();
    let (_client, mut rx) = PushClient::connect(url, CancellationToken::new());

    assert_eq!(next_event(&mut rx).await, PushEvent::Status(false));
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_parent_cancel_stops_reader() {
    let (_release_tx, release_rx) = oneshot::channel();
    let url = serve(Vec::new(), release_rx).await;

    let parent = CancellationToken::new();
    let (_client, mut rx) = PushClient::connect(url, parent.clone());
    assert_eq!(next_event(&mut rx).await, PushEvent::Status(true));

    parent.cancel();
    assert_eq!(next_event(&mut rx).await, PushEvent::Status(false));
}
