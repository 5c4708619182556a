// ── Selection sync ──

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::FetchOutcome;
use crate::error::CoreError;
use crate::source::FleetSource;
use crate::store::{Mutation, StoreHandle};

/// Ownership of the detail view between opens and closes.
#[derive(Debug, Default)]
struct Ticket {
    generation: u64,
    /// The current generation's detail fetch has not finished yet.
    loading: bool,
}

/// Opens and closes the vehicle detail view.
///
/// A cached vehicle is selected immediately and then refreshed from the
/// service. Each open or close takes a new generation under one lock, and
/// every selection write happens while that lock is held, so a detail
/// response that returns after a newer open or a close is dropped.
/// Only the newest open clears the loading flag; a close clears it for
/// the open it supersedes.
pub struct SelectionSync {
    store: StoreHandle,
    source: Arc<dyn FleetSource>,
    ticket: Mutex<Ticket>,
}

impl SelectionSync {
    pub fn new(store: StoreHandle, source: Arc<dyn FleetSource>) -> Self {
        Self {
            store,
            source,
            ticket: Mutex::new(Ticket::default()),
        }
    }

    pub async fn open(&self, id: &str) -> Result<FetchOutcome, CoreError> {
        let generation = {
            let mut ticket = self.ticket.lock().await;
            ticket.generation += 1;
            ticket.loading = true;

            let cached = self.store.snapshot().vehicle(id).map(|v| v.as_ref().clone());
            if let Some(vehicle) = cached {
                debug!(id, "selecting cached vehicle");
                self.store
                    .dispatch(Mutation::SetSelectedVehicle(Some(vehicle)))
                    .await?;
            }
            self.store.dispatch(Mutation::SetLoading(true)).await?;
            self.store.dispatch(Mutation::SetError(None)).await?;
            ticket.generation
        };

        let result = self.source.vehicle(id).await;

        let mut ticket = self.ticket.lock().await;
        if ticket.generation != generation {
            debug!(id, "dropping superseded vehicle detail");
            return Ok(FetchOutcome::Discarded);
        }

        let outcome = match result {
            Ok(vehicle) => {
                self.store
                    .dispatch(Mutation::SetSelectedVehicle(Some(vehicle)))
                    .await?;
                FetchOutcome::Fetched
            }
            Err(e) => {
                warn!(id, error = %e, "vehicle detail fetch failed");
                self.store
                    .dispatch(Mutation::SetError(Some(e.to_string())))
                    .await?;
                self.store.dispatch(Mutation::SetSelectedVehicle(None)).await?;
                FetchOutcome::Failed
            }
        };
        ticket.loading = false;
        self.store.dispatch(Mutation::SetLoading(false)).await?;
        Ok(outcome)
    }

    /// Clear the selection unconditionally.
    pub async fn close(&self) -> Result<(), CoreError> {
        let mut ticket = self.ticket.lock().await;
        ticket.generation += 1;
        self.store.dispatch(Mutation::SetSelectedVehicle(None)).await?;
        if std::mem::take(&mut ticket.loading) {
            self.store.dispatch(Mutation::SetLoading(false)).await?;
        }
        Ok(())
    }
}
