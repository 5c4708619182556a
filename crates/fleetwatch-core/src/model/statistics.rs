// ── Fleet statistics ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filter::FilterStatus;
use super::vehicle::VehicleStatus;

/// Fleet-wide counters. `total == idle + en_route + delivered` is expected
/// from the service but not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: u32,
    pub idle: u32,
    pub en_route: u32,
    pub delivered: u32,
    /// km/h.
    pub average_speed: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Statistics {
    /// Vehicles currently moving (en route).
    pub fn moving(&self) -> u32 {
        self.en_route
    }

    /// Count shown next to a status filter.
    pub fn count_for(&self, filter: FilterStatus) -> u32 {
        match filter {
            FilterStatus::All => self.total,
            FilterStatus::Status(VehicleStatus::Idle) => self.idle,
            FilterStatus::Status(VehicleStatus::EnRoute) => self.en_route,
            FilterStatus::Status(VehicleStatus::Delivered) => self.delivered,
            FilterStatus::Status(VehicleStatus::Unknown) => 0,
        }
    }
}
