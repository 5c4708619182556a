// Fleet API wire types
//
// Every REST response is wrapped in the `Envelope<T>` shape. Fields use
// `#[serde(default)]` liberally: the service is not consistent about which
// optional fields it sends, and push frames reuse the same records.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard fleet API response envelope.
///
/// ```json
/// { "success": true, "data": [...], "total": 3, "timestamp": "2024-01-01T00:00:00Z" }
/// ```
///
/// Error responses reuse the same shape with `success: false` plus
/// `error` and `message`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<OneOrMany<T>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body as sent with non-2xx statuses. Every field is optional
/// because proxies in front of the service answer with their own bodies.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` payload that is either a single object or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Normalize into a list; a lone object becomes a one-element list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    /// Take the single object, or the first element of a list.
    pub fn into_first(self) -> Option<T> {
        match self {
            Self::Many(items) => items.into_iter().next(),
            Self::One(item) => Some(item),
        }
    }
}

// ── Vehicle ──────────────────────────────────────────────────────────

/// Vehicle as served by `/api/vehicles*` and pushed over the WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub id: String,
    #[serde(default)]
    pub vehicle_number: String,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub driver_phone: Option<String>,
    /// `idle`, `en_route` or `delivered`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub current_location: LocationRecord,
    /// km/h.
    #[serde(default)]
    pub speed: f64,
    /// ISO-8601.
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub estimated_arrival: Option<String>,
    #[serde(default)]
    pub battery_level: Option<f64>,
    #[serde(default)]
    pub fuel_level: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub lat: f64,
    pub lng: f64,
}

// ── Statistics ───────────────────────────────────────────────────────

/// Fleet-wide counters from `/api/statistics` and statistics push frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub total: u32,
    #[serde(default)]
    pub idle: u32,
    #[serde(default)]
    pub en_route: u32,
    #[serde(default)]
    pub delivered: u32,
    #[serde(default)]
    pub average_speed: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vehicle_record_reads_camel_case() {
        let record: VehicleRecord = serde_json::from_value(json!({
            "id": "v1",
            "vehicleNumber": "TRK-001",
            "driverName": "Ada",
            "status": "en_route",
            "destination": "Depot",
            "currentLocation": { "lat": 51.5, "lng": -0.12 },
            "speed": 80,
            "lastUpdated": "2024-01-01T00:00:00Z",
            "estimatedArrival": null,
            "batteryLevel": 64
        }))
        .unwrap();

        assert_eq!(record.vehicle_number, "TRK-001");
        assert_eq!(record.current_location.lng, -0.12);
        assert!(record.estimated_arrival.is_none());
        assert_eq!(record.battery_level, Some(64.0));
        assert!(record.fuel_level.is_none());
    }

    #[test]
    fn vehicle_record_requires_id() {
        let result = serde_json::from_value::<VehicleRecord>(json!({ "vehicleNumber": "X1" }));
        assert!(result.is_err());
    }

    #[test]
    fn one_or_many_normalizes() {
        let one: OneOrMany<u32> = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(one.clone().into_vec(), vec![7]);
        assert_eq!(one.into_first(), Some(7));

        let many: OneOrMany<u32> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(many.into_first(), Some(1));

        let empty: OneOrMany<u32> = serde_json::from_value(json!([])).unwrap();
        assert_eq!(empty.into_first(), None);
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let env: Envelope<StatisticsRecord> =
            serde_json::from_value(json!({ "success": false, "error": "E", "message": "boom" }))
                .unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("boom"));
    }
}
