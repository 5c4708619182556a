// ── Mutation contract ──

use chrono::{DateTime, Utc};
use strum::IntoStaticStr;
use tokio::sync::oneshot;

use crate::model::{FilterStatus, Statistics, Vehicle};

/// The closed set of changes a [`FleetState`](super::FleetState) accepts.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Mutation {
    // ── Data ─────────────────────────────────────────────────────────
    /// Replace the vehicle list wholesale.
    SetVehicles(Vec<Vehicle>),
    /// Insert or replace one vehicle by id; keeps an open selection in lockstep.
    UpsertVehicle(Vehicle),
    /// Replace the statistics wholesale.
    SetStatistics(Statistics),

    // ── View state ───────────────────────────────────────────────────
    SetSelectedVehicle(Option<Vehicle>),
    SetActiveFilter(FilterStatus),
    SetLoading(bool),
    SetError(Option<String>),
    SetLastUpdate(DateTime<Utc>),
    /// Push channel connectivity.
    SetConnected(bool),
}

impl Mutation {
    /// Variant name, for logs.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// A mutation sent through the store channel, with a oneshot that fires
/// once it has been applied.
pub(crate) struct MutationEnvelope {
    pub mutation: Mutation,
    pub applied_tx: oneshot::Sender<()>,
}
