// ── Store actor ──

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::mutation::{Mutation, MutationEnvelope};
use super::state::FleetState;
use crate::error::CoreError;
use crate::stream::FleetStream;

const MUTATION_CHANNEL_SIZE: usize = 64;
const MUTATION_LOG_SIZE: usize = 256;

/// Owner of the [`FleetState`]. Created together with its [`StoreHandle`];
/// nothing is applied until [`run`](Self::run) is polled.
pub struct FleetStore {
    state: watch::Sender<Arc<FleetState>>,
    log: broadcast::Sender<Arc<Mutation>>,
    mutation_rx: mpsc::Receiver<MutationEnvelope>,
}

/// Cheaply cloneable access to a running [`FleetStore`].
#[derive(Clone)]
pub struct StoreHandle {
    mutation_tx: mpsc::Sender<MutationEnvelope>,
    state_rx: watch::Receiver<Arc<FleetState>>,
    log: broadcast::Sender<Arc<Mutation>>,
}

impl FleetStore {
    /// Create a store holding the default state.
    pub fn new() -> (Self, StoreHandle) {
        Self::with_state(FleetState::default())
    }

    /// Create a store seeded with `initial`.
    pub fn with_state(initial: FleetState) -> (Self, StoreHandle) {
        let (state, state_rx) = watch::channel(Arc::new(initial));
        let (log, _) = broadcast::channel(MUTATION_LOG_SIZE);
        let (mutation_tx, mutation_rx) = mpsc::channel(MUTATION_CHANNEL_SIZE);

        let handle = StoreHandle {
            mutation_tx,
            state_rx,
            log: log.clone(),
        };
        let store = Self {
            state,
            log,
            mutation_rx,
        };
        (store, handle)
    }

    /// Apply mutations in arrival order until cancelled or every handle is gone.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                envelope = self.mutation_rx.recv() => {
                    let Some(envelope) = envelope else { break };
                    self.apply(envelope.mutation);
                    // The dispatcher may have stopped waiting; the mutation stands.
                    let _ = envelope.applied_tx.send(());
                }
            }
        }
        debug!("fleet store stopped");
    }

    fn apply(&self, mutation: Mutation) {
        trace!(mutation = mutation.kind(), "applying mutation");

        if self.log.receiver_count() > 0 {
            let _ = self.log.send(Arc::new(mutation.clone()));
        }

        self.state.send_modify(|state| {
            let next = FleetState::clone(state).apply(mutation);
            *state = Arc::new(next);
        });
    }
}

impl StoreHandle {
    /// Submit a mutation and wait until it has been applied.
    pub async fn dispatch(&self, mutation: Mutation) -> Result<(), CoreError> {
        let (applied_tx, applied_rx) = oneshot::channel();

        self.mutation_tx
            .send(MutationEnvelope {
                mutation,
                applied_tx,
            })
            .await
            .map_err(|_| CoreError::StoreClosed)?;

        applied_rx.await.map_err(|_| CoreError::StoreClosed)
    }

    /// The latest published state.
    pub fn snapshot(&self) -> Arc<FleetState> {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to state changes from now on.
    pub fn subscribe(&self) -> FleetStream {
        FleetStream::new(self.state_rx.clone())
    }

    /// Every mutation applied from now on, in order.
    pub fn mutation_log(&self) -> broadcast::Receiver<Arc<Mutation>> {
        self.log.subscribe()
    }
}
