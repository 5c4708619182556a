// Test doubles shared by the hook tests.
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::model::{Location, Statistics, Vehicle, VehicleStatus};
use crate::source::FleetSource;
use crate::store::{FleetStore, StoreHandle};

/// Canned reply for one source operation.
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    Api(&'static str),
    Unreachable,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T, CoreError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Api(message) => Err(CoreError::Api {
                message: (*message).to_owned(),
                status: Some(500),
            }),
            Self::Unreachable => Err(CoreError::Unreachable),
        }
    }
}

/// A `FleetSource` with scripted replies and an optional gate that holds
/// every call until the test releases it.
pub(crate) struct ScriptedSource {
    pub vehicles: Mutex<Reply<Vec<Vehicle>>>,
    pub by_status: Mutex<Reply<Vec<Vehicle>>>,
    pub vehicle: Mutex<Reply<Vehicle>>,
    pub statistics: Mutex<Reply<Statistics>>,
    pub calls: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            vehicles: Mutex::new(Reply::Ok(Vec::new())),
            by_status: Mutex::new(Reply::Ok(Vec::new())),
            vehicle: Mutex::new(Reply::Unreachable),
            statistics: Mutex::new(Reply::Unreachable),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Calls block until [`release`](Self::release) hands out a permit.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let source = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::new()
        };
        (source, gate)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl FleetSource for ScriptedSource {
    async fn vehicles(&self) -> Result<Vec<Vehicle>, CoreError> {
        self.enter("vehicles".into()).await;
        self.vehicles.lock().unwrap().get()
    }

    async fn vehicles_by_status(&self, status: VehicleStatus) -> Result<Vec<Vehicle>, CoreError> {
        self.enter(format!("vehicles/status/{status}")).await;
        self.by_status.lock().unwrap().get()
    }

    async fn vehicle(&self, id: &str) -> Result<Vehicle, CoreError> {
        self.enter(format!("vehicles/{id}")).await;
        self.vehicle.lock().unwrap().get()
    }

    async fn statistics(&self) -> Result<Statistics, CoreError> {
        self.enter("statistics".into()).await;
        self.statistics.lock().unwrap().get()
    }
}

/// Start a store actor for the duration of a test.
pub(crate) fn spawn_store() -> (StoreHandle, CancellationToken) {
    let (store, handle) = FleetStore::new();
    let cancel = CancellationToken::new();
    tokio::spawn(store.run(cancel.clone()));
    (handle, cancel)
}

pub(crate) fn vehicle(id: &str, status: VehicleStatus) -> Vehicle {
    Vehicle {
        id: id.into(),
        vehicle_number: format!("TRK-{id}"),
        driver_name: "Robin".into(),
        driver_phone: Some("+1-555-0100".into()),
        status,
        destination: "Harbor".into(),
        current_location: Location {
            lat: 40.0,
            lng: -74.0,
        },
        speed: 60.0,
        last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        estimated_arrival: None,
        battery_level: Some(80),
        fuel_level: Some(25),
    }
}

pub(crate) fn statistics(total: u32) -> Statistics {
    Statistics {
        total,
        idle: total,
        en_route: 0,
        delivered: 0,
        average_speed: 0.0,
        timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    }
}
