// ── Fleet state ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::mutation::Mutation;
use crate::format::COUNTDOWN_PERIOD_SECS;
use crate::model::{FilterStatus, Statistics, Vehicle};

/// The single root of dashboard state.
///
/// Fields are read-only from outside: the only way to a different state is
/// [`apply`](Self::apply), which is a pure `old → new` transform.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetState {
    vehicles: IndexMap<String, Arc<Vehicle>>,
    statistics: Option<Arc<Statistics>>,
    selected_vehicle: Option<Arc<Vehicle>>,
    active_filter: FilterStatus,
    is_loading: bool,
    error: Option<String>,
    last_update: Option<DateTime<Utc>>,
    next_update_countdown: u32,
    is_connected: bool,
}

impl Default for FleetState {
    fn default() -> Self {
        Self {
            vehicles: IndexMap::new(),
            statistics: None,
            selected_vehicle: None,
            active_filter: FilterStatus::All,
            is_loading: false,
            error: None,
            last_update: None,
            next_update_countdown: COUNTDOWN_PERIOD_SECS,
            is_connected: false,
        }
    }
}

impl FleetState {
    /// Apply one mutation, returning the next state.
    #[must_use]
    pub fn apply(mut self, mutation: Mutation) -> Self {
        match mutation {
            Mutation::SetVehicles(list) => {
                self.vehicles = list
                    .into_iter()
                    .map(|v| (v.id.clone(), Arc::new(v)))
                    .collect();
            }
            Mutation::UpsertVehicle(vehicle) => {
                let vehicle = Arc::new(vehicle);
                if self
                    .selected_vehicle
                    .as_ref()
                    .is_some_and(|selected| selected.id == vehicle.id)
                {
                    self.selected_vehicle = Some(Arc::clone(&vehicle));
                }
                self.vehicles.insert(vehicle.id.clone(), vehicle);
            }
            Mutation::SetStatistics(stats) => self.statistics = Some(Arc::new(stats)),
            Mutation::SetSelectedVehicle(vehicle) => {
                self.selected_vehicle = vehicle.map(Arc::new);
            }
            Mutation::SetActiveFilter(filter) => self.active_filter = filter,
            Mutation::SetLoading(loading) => self.is_loading = loading,
            Mutation::SetError(error) => self.error = error,
            Mutation::SetLastUpdate(at) => self.last_update = Some(at),
            Mutation::SetConnected(connected) => self.is_connected = connected,
        }
        self
    }

    // ── Derived reads ────────────────────────────────────────────────

    /// Vehicles matching the active filter, in list order.
    pub fn filtered_vehicles(&self) -> Vec<Arc<Vehicle>> {
        self.vehicles
            .values()
            .filter(|v| self.active_filter.matches(v))
            .cloned()
            .collect()
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// All vehicles, in insertion/fetch order.
    pub fn vehicles(&self) -> impl ExactSizeIterator<Item = &Arc<Vehicle>> {
        self.vehicles.values()
    }

    pub fn vehicle(&self, id: &str) -> Option<&Arc<Vehicle>> {
        self.vehicles.get(id)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn statistics(&self) -> Option<&Arc<Statistics>> {
        self.statistics.as_ref()
    }

    pub fn selected_vehicle(&self) -> Option<&Arc<Vehicle>> {
        self.selected_vehicle.as_ref()
    }

    pub fn active_filter(&self) -> FilterStatus {
        self.active_filter
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn next_update_countdown(&self) -> u32 {
        self.next_update_countdown
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }
}
