// ── Push sync ──

use chrono::Utc;
use tracing::debug;

use fleetwatch_api::{PushEvent, PushMessage};

use crate::error::CoreError;
use crate::model::{Statistics, Vehicle};
use crate::store::{Mutation, StoreHandle};

/// Writes classified push events into the store.
///
/// Push writes are unguarded: a push update and a REST result can
/// interleave, and the later write wins.
#[derive(Clone)]
pub struct PushSync {
    store: StoreHandle,
}

impl PushSync {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub async fn handle(&self, event: PushEvent) -> Result<(), CoreError> {
        match event {
            PushEvent::Status(connected) => {
                debug!(connected, "push channel status");
                self.store.dispatch(Mutation::SetConnected(connected)).await
            }
            PushEvent::Message(message) => self.apply(message).await,
        }
    }

    async fn apply(&self, message: PushMessage) -> Result<(), CoreError> {
        let stamp = match message {
            PushMessage::Vehicles(records) => {
                let vehicles = records.into_iter().map(Vehicle::from).collect();
                self.store.dispatch(Mutation::SetVehicles(vehicles)).await?;
                Utc::now()
            }
            PushMessage::Vehicle(record) => {
                let vehicle = Vehicle::from(*record);
                self.store.dispatch(Mutation::UpsertVehicle(vehicle)).await?;
                Utc::now()
            }
            PushMessage::Statistics(record) => {
                let stats = Statistics::from(record);
                let stamp = stats.timestamp.unwrap_or_else(Utc::now);
                self.store.dispatch(Mutation::SetStatistics(stats)).await?;
                stamp
            }
        };
        self.store.dispatch(Mutation::SetLastUpdate(stamp)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fleetwatch_api::{StatisticsRecord, VehicleRecord};

    use crate::model::VehicleStatus;
    use crate::sync::testing::{spawn_store, vehicle};

    fn record(id: &str, number: &str, status: &str) -> VehicleRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "vehicleNumber": number,
            "status": status,
            "lastUpdated": "2024-01-01T00:00:00Z",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn status_sets_connected_flag() {
        let (store, _cancel) = spawn_store();
        let sync = PushSync::new(store.clone());

        sync.handle(PushEvent::Status(true)).await.unwrap();
        assert!(store.snapshot().is_connected());
        sync.handle(PushEvent::Status(false)).await.unwrap();
        assert!(!store.snapshot().is_connected());
        assert!(store.snapshot().last_update().is_none());
    }

    #[tokio::test]
    async fn vehicle_list_replaces_and_stamps_now() {
        let (store, _cancel) = spawn_store();
        let sync = PushSync::new(store.clone());

        let before = Utc::now();
        sync.handle(PushEvent::Message(PushMessage::Vehicles(vec![
            record("v1", "A", "idle"),
            record("v2", "B", "delivered"),
        ])))
        .await
        .unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.vehicle_count(), 2);
        assert_eq!(snap.vehicle("v2").unwrap().status, VehicleStatus::Delivered);
        assert!(snap.last_update().unwrap() >= before);
    }

    #[tokio::test]
    async fn single_vehicle_updates_open_selection() {
        let (store, _cancel) = spawn_store();
        let v1 = vehicle("v1", VehicleStatus::Idle);
        store
            .dispatch(Mutation::SetVehicles(vec![v1.clone()]))
            .await
            .unwrap();
        store
            .dispatch(Mutation::SetSelectedVehicle(Some(v1)))
            .await
            .unwrap();
        let sync = PushSync::new(store.clone());

        sync.handle(PushEvent::Message(PushMessage::Vehicle(Box::new(record(
            "v1", "X1", "en_route",
        )))))
        .await
        .unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.vehicle("v1").unwrap().vehicle_number, "X1");
        assert_eq!(snap.selected_vehicle().unwrap().vehicle_number, "X1");
        assert_eq!(
            snap.selected_vehicle().unwrap().status,
            VehicleStatus::EnRoute
        );
    }

    #[tokio::test]
    async fn statistics_prefer_message_timestamp() {
        let (store, _cancel) = spawn_store();
        let sync = PushSync::new(store.clone());
        let stats: StatisticsRecord = serde_json::from_value(serde_json::json!({
            "total": 10, "idle": 3, "en_route": 4, "delivered": 3,
            "average_speed": 42.0, "timestamp": "2024-03-01T08:30:00Z"
        }))
        .unwrap();

        sync.handle(PushEvent::Message(PushMessage::Statistics(stats)))
            .await
            .unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.statistics().unwrap().en_route, 4);
        assert_eq!(
            snap.last_update(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
        );
    }
}
