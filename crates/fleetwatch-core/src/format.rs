// ── Display formatting ──
//
// Derived, presentation-only helpers shared by the CLI and the TUI.
// Speeds arrive in km/h and are always shown in mph.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::model::Location;

pub const MPH_PER_KMH: f64 = 0.621_371;

/// Battery and fuel levels below this percentage are flagged.
pub const LOW_LEVEL_THRESHOLD: u8 = 30;

/// Period of the "next update" countdown, in seconds.
pub const COUNTDOWN_PERIOD_SECS: u32 = 180;

/// Convert km/h to whole mph, rounded. Negative and NaN speeds read as 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
pub fn kmh_to_mph(kmh: f64) -> u32 {
    (kmh.max(0.0) * MPH_PER_KMH).round() as u32
}

/// `"62 mph"` for 100 km/h.
pub fn format_speed(kmh: f64) -> String {
    format!("{} mph", kmh_to_mph(kmh))
}

/// `"40.7128, -74.0060"`.
pub fn format_location(location: Location) -> String {
    format!("{:.4}, {:.4}", location.lat, location.lng)
}

/// `DD/MM/YYYY, HH:mm:ss` in the timestamp's own zone.
pub fn format_date_time<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// `HH:MM` in the timestamp's own zone.
pub fn format_clock<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format("%H:%M").to_string()
}

/// `M:SS`, e.g. `"3:00"` or `"0:07"`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Whole seconds elapsed between `then` and `now` (negative if `then` is ahead).
pub fn seconds_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_seconds()
}

/// `"64%"`, or `"N/A"` when the vehicle does not report the level.
pub fn format_level(level: Option<u8>) -> String {
    level.map_or_else(|| "N/A".to_owned(), |l| format!("{l}%"))
}

pub fn is_low_level(level: Option<u8>) -> bool {
    level.is_some_and(|l| l < LOW_LEVEL_THRESHOLD)
}

/// "Next update in" countdown: ticks down once per second and starts over
/// after reaching zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    period: u32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(COUNTDOWN_PERIOD_SECS)
    }
}

impl Countdown {
    pub fn new(period: u32) -> Self {
        Self {
            remaining: period,
            period,
        }
    }

    pub fn remaining(self) -> u32 {
        self.remaining
    }

    /// Advance one second and return the new value.
    pub fn tick(&mut self) -> u32 {
        self.remaining = if self.remaining == 0 {
            self.period
        } else {
            self.remaining - 1
        };
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = self.period;
    }
}
