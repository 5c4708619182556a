// ── Vehicle-list sync ──

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, warn};

use super::{FetchGuard, FetchOutcome};
use crate::error::CoreError;
use crate::model::FilterStatus;
use crate::source::FleetSource;
use crate::store::{Mutation, StoreHandle};

/// Fetches the vehicle list for the active filter.
///
/// A filter that matches the last successful fetch is skipped; a failed
/// fetch forgets the marker so the next trigger retries.
pub struct VehicleSync {
    store: StoreHandle,
    source: Arc<dyn FleetSource>,
    guard: FetchGuard,
    last_fetched: Mutex<Option<FilterStatus>>,
}

impl VehicleSync {
    pub fn new(store: StoreHandle, source: Arc<dyn FleetSource>) -> Self {
        Self {
            store,
            source,
            guard: FetchGuard::new(),
            last_fetched: Mutex::new(None),
        }
    }

    /// Fetch for `filter` unless it is the filter last fetched successfully.
    /// Called on mount and on every filter change.
    pub async fn on_filter(&self, filter: FilterStatus) -> Result<FetchOutcome, CoreError> {
        let Some(_token) = self.guard.try_begin() else {
            debug!(%filter, "vehicle fetch already in flight");
            return Ok(FetchOutcome::SkippedInFlight);
        };
        if self.last_fetched() == Some(filter) {
            return Ok(FetchOutcome::SkippedUnchanged);
        }
        self.fetch(filter).await
    }

    /// [`on_filter`](Self::on_filter) that waits out a fetch already in
    /// flight instead of skipping, so a filter change made during a manual
    /// refresh is still fetched.
    pub async fn follow(&self, filter: FilterStatus) -> Result<FetchOutcome, CoreError> {
        loop {
            match self.on_filter(filter).await? {
                FetchOutcome::SkippedInFlight => self.guard.idle().await,
                outcome => return Ok(outcome),
            }
        }
    }

    /// Re-fetch for the store's active filter, even if nothing changed.
    pub async fn refresh(&self) -> Result<FetchOutcome, CoreError> {
        let Some(_token) = self.guard.try_begin() else {
            return Ok(FetchOutcome::SkippedInFlight);
        };
        let filter = self.store.snapshot().active_filter();
        self.fetch(filter).await
    }

    /// The filter of the last successful fetch, if the last fetch succeeded.
    pub fn last_fetched(&self) -> Option<FilterStatus> {
        *self
            .last_fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_last_fetched(&self, filter: Option<FilterStatus>) {
        *self
            .last_fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = filter;
    }

    async fn fetch(&self, filter: FilterStatus) -> Result<FetchOutcome, CoreError> {
        self.store.dispatch(Mutation::SetLoading(true)).await?;
        self.store.dispatch(Mutation::SetError(None)).await?;

        let result = match filter {
            FilterStatus::All => self.source.vehicles().await,
            FilterStatus::Status(status) => self.source.vehicles_by_status(status).await,
        };

        let outcome = match result {
            Ok(vehicles) => {
                debug!(%filter, count = vehicles.len(), "vehicle list fetched");
                let stamp = !vehicles.is_empty();
                self.store.dispatch(Mutation::SetVehicles(vehicles)).await?;
                self.set_last_fetched(Some(filter));
                if stamp {
                    self.store
                        .dispatch(Mutation::SetLastUpdate(Utc::now()))
                        .await?;
                }
                FetchOutcome::Fetched
            }
            Err(e) => {
                warn!(%filter, error = %e, "vehicle list fetch failed");
                self.set_last_fetched(None);
                self.store
                    .dispatch(Mutation::SetError(Some(e.to_string())))
                    .await?;
                FetchOutcome::Failed
            }
        };

        self.store.dispatch(Mutation::SetLoading(false)).await?;
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::VehicleStatus;
    use crate::sync::testing::{Reply, ScriptedSource, spawn_store, vehicle};

    fn setup(source: ScriptedSource) -> (VehicleSync, Arc<ScriptedSource>, StoreHandle) {
        let (store, _cancel) = spawn_store();
        let source = Arc::new(source);
        let sync = VehicleSync::new(store.clone(), source.clone());
        (sync, source, store)
    }

    #[tokio::test]
    async fn mount_fetches_all_and_stamps_last_update() {
        let source = ScriptedSource::new();
        *source.vehicles.lock().unwrap() = Reply::Ok(vec![
            vehicle("v1", VehicleStatus::Idle),
            vehicle("v2", VehicleStatus::EnRoute),
        ]);
        let (sync, source, store) = setup(source);

        let issued = Utc::now();
        let outcome = sync.on_filter(FilterStatus::All).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Fetched);

        let snap = store.snapshot();
        assert_eq!(snap.vehicle_count(), 2);
        assert!(snap.last_update().unwrap() >= issued);
        assert!(!snap.is_loading());
        assert!(snap.error().is_none());
        assert_eq!(source.calls(), ["vehicles"]);
    }

    #[tokio::test]
    async fn same_filter_is_not_fetched_twice() {
        let (sync, source, _store) = setup(ScriptedSource::new());

        sync.on_filter(FilterStatus::All).await.unwrap();
        let outcome = sync.on_filter(FilterStatus::All).await.unwrap();

        assert_eq!(outcome, FetchOutcome::SkippedUnchanged);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn status_filter_uses_status_endpoint() {
        let (sync, source, _store) = setup(ScriptedSource::new());

        sync.on_filter(FilterStatus::All).await.unwrap();
        sync.on_filter(VehicleStatus::Delivered.into()).await.unwrap();

        assert_eq!(source.calls(), ["vehicles", "vehicles/status/delivered"]);
        assert_eq!(
            sync.last_fetched(),
            Some(FilterStatus::Status(VehicleStatus::Delivered))
        );
    }

    #[tokio::test]
    async fn empty_result_leaves_last_update_unset() {
        let (sync, _source, store) = setup(ScriptedSource::new());

        sync.on_filter(FilterStatus::All).await.unwrap();

        assert_eq!(store.snapshot().vehicle_count(), 0);
        assert!(store.snapshot().last_update().is_none());
    }

    #[tokio::test]
    async fn failure_records_error_and_allows_retry() {
        let source = ScriptedSource::new();
        *source.vehicles.lock().unwrap() = Reply::Unreachable;
        let (sync, source, store) = setup(source);

        let outcome = sync.on_filter(FilterStatus::All).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(
            store.snapshot().error(),
            Some("Network error. Please check your connection.")
        );
        assert!(!store.snapshot().is_loading());
        assert_eq!(sync.last_fetched(), None);

        *source.vehicles.lock().unwrap() = Reply::Ok(vec![vehicle("v1", VehicleStatus::Idle)]);
        let outcome = sync.on_filter(FilterStatus::All).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Fetched);
        assert!(store.snapshot().error().is_none());
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn overlapping_trigger_is_skipped() {
        let (source, gate) = ScriptedSource::gated();
        let (sync, source, _store) = setup(source);
        let sync = Arc::new(sync);

        let first = tokio::spawn({
            let sync = Arc::clone(&sync);
            async move { sync.on_filter(FilterStatus::All).await }
        });
        while source.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        let second = sync.on_filter(VehicleStatus::Idle.into()).await.unwrap();
        assert_eq!(second, FetchOutcome::SkippedInFlight);
        assert_eq!(sync.refresh().await.unwrap(), FetchOutcome::SkippedInFlight);

        gate.add_permits(1);
        assert_eq!(first.await.unwrap().unwrap(), FetchOutcome::Fetched);
        assert_eq!(source.calls(), ["vehicles"]);
    }

    #[tokio::test]
    async fn refresh_refetches_active_filter() {
        let (sync, source, store) = setup(ScriptedSource::new());
        store
            .dispatch(Mutation::SetActiveFilter(VehicleStatus::Idle.into()))
            .await
            .unwrap();

        sync.on_filter(VehicleStatus::Idle.into()).await.unwrap();
        sync.refresh().await.unwrap();

        assert_eq!(
            source.calls(),
            ["vehicles/status/idle", "vehicles/status/idle"]
        );
    }

    #[tokio::test]
    async fn filter_change_during_refresh_is_fetched_after_it() {
        let (source, gate) = ScriptedSource::gated();
        let (sync, source, store) = setup(source);
        let sync = Arc::new(sync);

        let refresh = tokio::spawn({
            let sync = Arc::clone(&sync);
            async move { sync.refresh().await }
        });
        while source.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        let idle = FilterStatus::Status(VehicleStatus::Idle);
        store.dispatch(Mutation::SetActiveFilter(idle)).await.unwrap();
        assert_eq!(
            sync.on_filter(idle).await.unwrap(),
            FetchOutcome::SkippedInFlight
        );
        let follow = tokio::spawn({
            let sync = Arc::clone(&sync);
            async move { sync.follow(idle).await }
        });

        gate.add_permits(2);
        assert_eq!(refresh.await.unwrap().unwrap(), FetchOutcome::Fetched);
        assert_eq!(follow.await.unwrap().unwrap(), FetchOutcome::Fetched);
        assert_eq!(source.calls(), ["vehicles", "vehicles/status/idle"]);
        assert_eq!(sync.last_fetched(), Some(idle));
    }
}
