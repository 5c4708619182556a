// ── Statistics sync ──

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::{FetchGuard, FetchOutcome};
use crate::error::CoreError;
use crate::source::FleetSource;
use crate::store::{Mutation, StoreHandle};

/// Fetches fleet statistics once on mount and again on demand.
pub struct StatisticsSync {
    store: StoreHandle,
    source: Arc<dyn FleetSource>,
    guard: FetchGuard,
}

impl StatisticsSync {
    pub fn new(store: StoreHandle, source: Arc<dyn FleetSource>) -> Self {
        Self {
            store,
            source,
            guard: FetchGuard::new(),
        }
    }

    /// Clear the error, then replace statistics or record the failure.
    ///
    /// `lastUpdate` takes the statistics' own timestamp when the server
    /// sent one.
    pub async fn fetch(&self) -> Result<FetchOutcome, CoreError> {
        let Some(_token) = self.guard.try_begin() else {
            debug!("statistics fetch already in flight");
            return Ok(FetchOutcome::SkippedInFlight);
        };

        self.store.dispatch(Mutation::SetError(None)).await?;

        match self.source.statistics().await {
            Ok(stats) => {
                let stamp = stats.timestamp.unwrap_or_else(Utc::now);
                self.store.dispatch(Mutation::SetStatistics(stats)).await?;
                self.store.dispatch(Mutation::SetLastUpdate(stamp)).await?;
                Ok(FetchOutcome::Fetched)
            }
            Err(e) => {
                warn!(error = %e, "statistics fetch failed");
                self.store
                    .dispatch(Mutation::SetError(Some(e.to_string())))
                    .await?;
                Ok(FetchOutcome::Failed)
            }
        }
    }
}
