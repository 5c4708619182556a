// fleetwatch-api: Async Rust client for the fleet tracking REST and WebSocket API

pub mod client;
pub mod error;
pub mod models;
pub mod push;
pub mod transport;

pub use client::FleetClient;
pub use error::Error;
pub use models::{Envelope, LocationRecord, OneOrMany, StatisticsRecord, VehicleRecord};
pub use push::{PushClient, PushEvent, PushMessage};
pub use transport::TransportConfig;
