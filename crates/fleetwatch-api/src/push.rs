//! WebSocket push channel.
//!
//! Opens one connection to the fleet service's push endpoint and forwards
//! classified frames plus connectivity changes through an
//! [`mpsc`](tokio::sync::mpsc) channel. There is no reconnection: once the
//! channel reports `Status(false)` the reader task has ended and the caller
//! decides whether to connect again.
//!
//! # Example
//!
//! ```rust,ignore
//! use fleetwatch_api::push::{PushClient, PushEvent};
//! use tokio_util::sync::CancellationToken;
//!
//! let (mut client, mut events) = PushClient::connect(ws_url, CancellationToken::new());
//! while let Some(event) = events.recv().await {
//!     match event {
//!         PushEvent::Status(up) => println!("connected: {up}"),
//!         PushEvent::Message(msg) => println!("{msg:?}"),
//!     }
//! }
//! client.disconnect().await;
//! ```

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::models::{StatisticsRecord, VehicleRecord};

// ── Channel capacity ─────────────────────────────────────────────────

const EVENT_CHANNEL_CAPACITY: usize = 256;

// ── Events ───────────────────────────────────────────────────────────

/// Something the push channel has to report.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// Connectivity changed: `true` once the handshake completes,
    /// `false` when the channel closes or fails.
    Status(bool),
    /// A classified frame.
    Message(PushMessage),
}

/// A push frame, classified by its tag or, failing that, by its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    /// Full replacement of the vehicle list.
    Vehicles(Vec<VehicleRecord>),
    /// Upsert of a single vehicle.
    Vehicle(Box<VehicleRecord>),
    /// Replacement of the fleet statistics.
    Statistics(StatisticsRecord),
}

impl PushMessage {
    /// Classify a decoded JSON frame.
    ///
    /// Frames carrying `"type": "vehicles" | "vehicle" | "statistics"` are
    /// classified by that tag, with the payload under `data` or inline.
    /// Untagged frames fall back to shape sniffing:
    ///
    /// 1. an array is a vehicle list;
    /// 2. an object with a `vehicles` array is a vehicle list;
    /// 3. an object with a truthy `vehicleNumber` or `id` is one vehicle;
    /// 4. an object with a `total` field is statistics.
    ///
    /// Returns `Ok(None)` for frames matching none of these, and an error when
    /// the chosen variant does not deserialize.
    pub fn classify(value: Value) -> Result<Option<Self>, serde_json::Error> {
        if let Some(tag) = value.get("type").and_then(Value::as_str) {
            let tagged = match tag {
                "vehicles" => Some(Kind::Vehicles),
                "vehicle" => Some(Kind::Vehicle),
                "statistics" => Some(Kind::Statistics),
                _ => None,
            };
            if let Some(kind) = tagged {
                let payload = match value {
                    Value::Object(mut map) => match map.remove("data") {
                        Some(data) => data,
                        None => Value::Object(map),
                    },
                    other => other,
                };
                return kind.decode(payload).map(Some);
            }
        }

        match sniff(&value) {
            Some(kind) => kind.decode(value).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Vehicles,
    Vehicle,
    Statistics,
}

impl Kind {
    fn decode(self, payload: Value) -> Result<PushMessage, serde_json::Error> {
        match self {
            Self::Vehicles => {
                let list = match payload {
                    Value::Object(mut map) if map.contains_key("vehicles") => {
                        map.remove("vehicles").unwrap_or(Value::Null)
                    }
                    other => other,
                };
                serde_json::from_value(list).map(PushMessage::Vehicles)
            }
            Self::Vehicle => serde_json::from_value(payload)
                .map(|v: VehicleRecord| PushMessage::Vehicle(Box::new(v))),
            Self::Statistics => serde_json::from_value(payload).map(PushMessage::Statistics),
        }
    }
}

fn sniff(value: &Value) -> Option<Kind> {
    match value {
        Value::Array(_) => Some(Kind::Vehicles),
        Value::Object(map) => {
            if map.get("vehicles").is_some_and(Value::is_array) {
                Some(Kind::Vehicles)
            } else if map.get("vehicleNumber").is_some_and(is_truthy)
                || map.get("id").is_some_and(is_truthy)
            {
                Some(Kind::Vehicle)
            } else if map.contains_key("total") {
                Some(Kind::Statistics)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decode and classify one text frame. Anything unusable is logged and dropped.
pub(crate) fn parse_frame(text: &str) -> Option<PushMessage> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "dropping malformed push frame");
            return None;
        }
    };

    match PushMessage::classify(value) {
        Ok(Some(msg)) => Some(msg),
        Ok(None) => {
            tracing::debug!("ignoring unrecognized push frame");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "dropping push frame with unexpected shape");
            None
        }
    }
}

// ── PushClient ───────────────────────────────────────────────────────

/// Handle to a running push connection.
///
/// Dropping the handle leaves the reader running until its token is
/// cancelled; call [`disconnect`](Self::disconnect) to release the socket.
pub struct PushClient {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PushClient {
    /// Spawn the reader task and return the handle plus its event stream.
    ///
    /// The connection attempt happens in the background; a failed handshake
    /// shows up as a single `Status(false)` event. Cancelling `parent` has
    /// the same effect as [`disconnect`](Self::disconnect).
    pub fn connect(url: Url, parent: CancellationToken) -> (Self, mpsc::Receiver<PushEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = parent.child_token();

        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            push_loop(url, event_tx, task_cancel).await;
        });

        (
            Self {
                cancel,
                task: Some(task),
            },
            event_rx,
        )
    }

    /// Close the connection and wait for the reader task to finish.
    ///
    /// Calling this more than once is a no-op.
    pub async fn disconnect(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "push reader task ended abnormally");
            }
        }
    }

    /// Whether the reader task has already ended.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

// ── Connection lifecycle ─────────────────────────────────────────────

async fn push_loop(url: Url, event_tx: mpsc::Sender<PushEvent>, cancel: CancellationToken) {
    if let Err(e) = connect_and_read(&url, &event_tx, &cancel).await {
        tracing::warn!(error = %e, "push channel closed with error");
    }

    // Receiver gone just means nobody is listening any more.
    let _ = event_tx.send(PushEvent::Status(false)).await;
    tracing::debug!("push reader exiting");
}

/// Establish the WebSocket connection and read frames until it drops.
async fn connect_and_read(
    url: &Url,
    event_tx: &mpsc::Sender<PushEvent>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "connecting to push channel");

    let (ws_stream, _response) = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ok(()),
        result = tokio_tungstenite::connect_async(url.as_str()) => {
            result.map_err(|e| Error::WebSocketConnect(e.to_string()))?
        }
    };

    tracing::info!("push channel connected");
    let _ = event_tx.send(PushEvent::Status(true)).await;

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                if let Err(e) = write.send(tungstenite::Message::Close(None)).await {
                    tracing::debug!(error = %e, "close frame not delivered");
                }
                return Ok(());
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        if let Some(msg) = parse_frame(text.as_str()) {
                            if event_tx.send(PushEvent::Message(msg)).await.is_err() {
                                return Ok(());
                            }
                        }
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite handles pong replies automatically
                        tracing::trace!("push ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        if let Some(ref cf) = frame {
                            tracing::info!(
                                code = %cf.code,
                                reason = %cf.reason,
                                "push close frame received"
                            );
                        } else {
                            tracing::info!("push close frame received (no payload)");
                        }
                        return Ok(());
                    }
                    Some(Err(e)) => {
                        return Err(Error::WebSocketConnect(e.to_string()));
                    }
                    None => {
                        tracing::info!("push stream ended");
                        return Ok(());
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicle(id: &str) -> Value {
        json!({
            "id": id,
            "vehicleNumber": format!("TRK-{id}"),
            "driverName": "Sam",
            "status": "idle",
            "destination": "Depot",
            "currentLocation": { "lat": 1.0, "lng": 2.0 },
            "speed": 0,
            "lastUpdated": "2024-01-01T00:00:00Z"
        })
    }

    fn classify(value: Value) -> Option<PushMessage> {
        PushMessage::classify(value).unwrap()
    }

    #[test]
    fn array_is_vehicle_list() {
        let msg = classify(json!([vehicle("v1"), vehicle("v2")]));
        let Some(PushMessage::Vehicles(list)) = msg else {
            panic!("expected vehicle list, got {msg:?}");
        };
        let ids: Vec<_> = list.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v1", "v2"]);
    }

    #[test]
    fn vehicles_field_is_vehicle_list() {
        let msg = classify(json!({ "vehicles": [vehicle("v3")], "timestamp": "x" }));
        assert!(matches!(msg, Some(PushMessage::Vehicles(ref l)) if l.len() == 1));
    }

    #[test]
    fn object_with_id_is_single_vehicle() {
        let msg = classify(json!({ "id": "v1", "vehicleNumber": "X1", "status": "idle" }));
        let Some(PushMessage::Vehicle(v)) = msg else {
            panic!("expected vehicle, got {msg:?}");
        };
        assert_eq!(v.id, "v1");
        assert_eq!(v.vehicle_number, "X1");
    }

    #[test]
    fn object_with_total_is_statistics() {
        let msg = classify(json!({
            "total": 10, "idle": 3, "en_route": 4, "delivered": 3,
            "average_speed": 42, "timestamp": "2024-01-01T00:00:00Z"
        }));
        let Some(PushMessage::Statistics(stats)) = msg else {
            panic!("expected statistics, got {msg:?}");
        };
        assert_eq!(stats.total, 10);
        assert_eq!(stats.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn id_wins_over_total_without_tag() {
        let msg = classify(json!({ "id": "stats-1", "total": 5 }));
        assert!(matches!(msg, Some(PushMessage::Vehicle(_))));
    }

    #[test]
    fn explicit_tag_overrides_shape() {
        let msg = classify(json!({
            "type": "statistics",
            "data": { "id": "stats-1", "total": 5, "idle": 5 }
        }));
        assert!(matches!(msg, Some(PushMessage::Statistics(ref s)) if s.total == 5));
    }

    #[test]
    fn tagged_payload_may_be_inline() {
        let mut frame = vehicle("v9");
        frame["type"] = json!("vehicle");
        let msg = classify(frame);
        assert!(matches!(msg, Some(PushMessage::Vehicle(ref v)) if v.id == "v9"));
    }

    #[test]
    fn unknown_tag_falls_back_to_shape() {
        let msg = classify(json!({ "type": "heartbeat", "total": 1 }));
        assert!(matches!(msg, Some(PushMessage::Statistics(_))));
    }

    #[test]
    fn falsy_id_is_not_a_vehicle() {
        assert_eq!(classify(json!({ "id": "", "vehicleNumber": null })), None);
        assert_eq!(classify(json!({ "hello": "world" })), None);
        assert_eq!(classify(json!("text")), None);
    }

    #[test]
    fn wrong_shape_is_an_error() {
        assert!(PushMessage::classify(json!([{ "vehicleNumber": "no id" }])).is_err());
    }

    #[test]
    fn malformed_frames_are_dropped() {
        assert_eq!(parse_frame("{not json"), None);
        assert_eq!(parse_frame("[1, 2]"), None);
        assert!(parse_frame(r#"{"total": 1}"#).is_some());
    }
}
