// ── State store ──
//
// One `FleetState`, owned by one actor task. Everything else holds a
// `StoreHandle`: it submits `Mutation`s over a channel and reads
// immutable snapshots published through a `watch` channel.

mod fleet_store;
mod mutation;
mod state;

pub use fleet_store::{FleetStore, StoreHandle};
pub use mutation::Mutation;
pub use state::FleetState;
