// ── Domain model ──

pub mod filter;
pub mod statistics;
pub mod vehicle;

pub use filter::FilterStatus;
pub use statistics::Statistics;
pub use vehicle::{Location, Vehicle, VehicleStatus};
