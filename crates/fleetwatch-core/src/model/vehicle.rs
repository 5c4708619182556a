// ── Vehicle domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Where a vehicle is in its delivery cycle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VehicleStatus {
    Idle,
    EnRoute,
    Delivered,
    /// Anything the service sends that is none of the above.
    Unknown,
}

impl VehicleStatus {
    /// The statuses a vehicle can be filtered by, in dashboard order.
    pub const KNOWN: [Self; 3] = [Self::Idle, Self::EnRoute, Self::Delivered];

    /// Parse a wire value; unrecognized strings become [`Unknown`](Self::Unknown).
    pub fn from_wire(raw: &str) -> Self {
        match raw.parse() {
            Ok(Self::Unknown) | Err(_) => Self::Unknown,
            Ok(status) => status,
        }
    }

    /// Human label, e.g. `"En Route"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::EnRoute => "En Route",
            Self::Delivered => "Delivered",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_moving(self) -> bool {
        matches!(self, Self::EnRoute)
    }
}

/// GPS position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// A tracked vehicle. `id` is the only identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub vehicle_number: String,
    pub driver_name: String,
    pub driver_phone: Option<String>,
    pub status: VehicleStatus,
    pub destination: String,
    pub current_location: Location,
    /// km/h as reported by the service.
    pub speed: f64,
    pub last_updated: DateTime<Utc>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    /// Percent, 0-100.
    pub battery_level: Option<u8>,
    /// Percent, 0-100.
    pub fuel_level: Option<u8>,
}
