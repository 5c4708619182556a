// ── Data source seam ──
//
// The synchronization hooks only need four reads. Abstracting them keeps
// the hooks independent of HTTP; `FleetClient` is the production source.

use async_trait::async_trait;

use fleetwatch_api::FleetClient;

use crate::error::CoreError;
use crate::model::{Statistics, Vehicle, VehicleStatus};

/// Read access to the fleet service, already converted to domain types.
#[async_trait]
pub trait FleetSource: Send + Sync {
    async fn vehicles(&self) -> Result<Vec<Vehicle>, CoreError>;

    async fn vehicles_by_status(&self, status: VehicleStatus) -> Result<Vec<Vehicle>, CoreError>;

    async fn vehicle(&self, id: &str) -> Result<Vehicle, CoreError>;

    async fn statistics(&self) -> Result<Statistics, CoreError>;
}

#[async_trait]
impl FleetSource for FleetClient {
    async fn vehicles(&self) -> Result<Vec<Vehicle>, CoreError> {
        let records = self.fetch_vehicles().await?;
        Ok(records.into_iter().map(Vehicle::from).collect())
    }

    async fn vehicles_by_status(&self, status: VehicleStatus) -> Result<Vec<Vehicle>, CoreError> {
        let records = self.fetch_vehicles_by_status(status.as_ref()).await?;
        Ok(records.into_iter().map(Vehicle::from).collect())
    }

    async fn vehicle(&self, id: &str) -> Result<Vehicle, CoreError> {
        Ok(self.fetch_vehicle_by_id(id).await?.into())
    }

    async fn statistics(&self) -> Result<Statistics, CoreError> {
        Ok(self.fetch_statistics().await?.into())
    }
}
