// fleetwatch-core: State store and synchronization layer between fleetwatch-api and the front ends.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod format;
pub mod model;
pub mod source;
pub mod store;
pub mod stream;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::FleetConfig;
pub use controller::Controller;
pub use error::CoreError;
pub use source::FleetSource;
pub use store::{FleetState, FleetStore, Mutation, StoreHandle};
pub use stream::{FleetStream, FleetWatchStream};
pub use sync::FetchOutcome;

// Re-export model types at the crate root for ergonomics.
pub use model::{FilterStatus, Location, Statistics, Vehicle, VehicleStatus};
