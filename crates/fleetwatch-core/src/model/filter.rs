// ── Status filter ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::vehicle::{Vehicle, VehicleStatus};
use crate::error::CoreError;

/// Which vehicles the list shows: everything, or one status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterStatus {
    #[default]
    All,
    Status(VehicleStatus),
}

impl FilterStatus {
    /// Every selectable filter, in dashboard order.
    pub const ALL: [Self; 4] = [
        Self::All,
        Self::Status(VehicleStatus::Idle),
        Self::Status(VehicleStatus::EnRoute),
        Self::Status(VehicleStatus::Delivered),
    ];

    /// `true` if the vehicle belongs in a list filtered by `self`.
    pub fn matches(self, vehicle: &Vehicle) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => vehicle.status == status,
        }
    }

    /// Wire/CLI name: `all`, `idle`, `en_route`, `delivered`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Status(status) => status.into(),
        }
    }

    /// Button label, e.g. `"En Route"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Status(status) => status.label(),
        }
    }

    /// Position in [`FilterStatus::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// The next filter, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The previous filter, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        if normalized == "all" {
            return Ok(Self::All);
        }
        match VehicleStatus::from_wire(&normalized) {
            VehicleStatus::Unknown => Err(CoreError::InvalidFilter {
                value: s.to_owned(),
            }),
            status => Ok(Self::Status(status)),
        }
    }
}

impl From<VehicleStatus> for FilterStatus {
    fn from(status: VehicleStatus) -> Self {
        Self::Status(status)
    }
}

impl Serialize for FilterStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
