// ── Wire → domain conversion ──
//
// `fleetwatch-api` records keep every field as the service sends it;
// these impls normalize timestamps, statuses and levels once, on the way
// into the store.

use chrono::{DateTime, NaiveDateTime, Utc};

use fleetwatch_api::{LocationRecord, StatisticsRecord, VehicleRecord};

use crate::model::{Location, Statistics, Vehicle, VehicleStatus};

/// Parse an ISO-8601 timestamp. Offsets are normalized to UTC, and naive
/// timestamps are taken to be UTC already.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Clamp a percentage into `0..=100`; non-finite values are dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn percent(raw: Option<f64>) -> Option<u8> {
    raw.filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
}

impl From<LocationRecord> for Location {
    fn from(r: LocationRecord) -> Self {
        Self {
            lat: r.lat,
            lng: r.lng,
        }
    }
}

impl From<VehicleRecord> for Vehicle {
    fn from(r: VehicleRecord) -> Self {
        Self {
            status: VehicleStatus::from_wire(&r.status),
            current_location: r.current_location.into(),
            speed: if r.speed.is_finite() { r.speed.max(0.0) } else { 0.0 },
            last_updated: parse_timestamp(&r.last_updated).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            estimated_arrival: r.estimated_arrival.as_deref().and_then(parse_timestamp),
            battery_level: percent(r.battery_level),
            fuel_level: percent(r.fuel_level),
            id: r.id,
            vehicle_number: r.vehicle_number,
            driver_name: r.driver_name,
            driver_phone: r.driver_phone.filter(|p| !p.is_empty()),
            destination: r.destination,
        }
    }
}

impl From<StatisticsRecord> for Statistics {
    fn from(r: StatisticsRecord) -> Self {
        Self {
            total: r.total,
            idle: r.idle,
            en_route: r.en_route,
            delivered: r.delivered,
            average_speed: r.average_speed,
            timestamp: r.timestamp.as_deref().and_then(parse_timestamp),
        }
    }
}
