//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use fleetwatch_core::{FilterStatus, FleetState};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data Events (from the controller's state stream) ──────────
    StateUpdated(Arc<FleetState>),

    // ── Intents (forwarded to the controller) ─────────────────────
    SelectFilter(FilterStatus),
    OpenVehicle(String),
    CloseVehicle,
    RefreshVehicles,
    RefreshStatistics,

    // ── Overlays ──────────────────────────────────────────────────
    ToggleHelp,

    /// An intent could not be delivered (controller stopped).
    Notify(String),
}

impl Action {
    /// Whether this action is handed to the controller.
    pub fn is_intent(&self) -> bool {
        matches!(
            self,
            Self::SelectFilter(_)
                | Self::OpenVehicle(_)
                | Self::CloseVehicle
                | Self::RefreshVehicles
                | Self::RefreshStatistics
        )
    }
}
