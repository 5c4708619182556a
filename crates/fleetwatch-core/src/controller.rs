// ── Controller abstraction ──
//
// Lifecycle management for one dashboard session: owns the store actor,
// wires every synchronization hook to its trigger, and exposes the
// intents the view layer sends back.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fleetwatch_api::{FleetClient, PushClient, PushEvent, TransportConfig};

use crate::config::FleetConfig;
use crate::error::CoreError;
use crate::model::FilterStatus;
use crate::source::FleetSource;
use crate::store::{FleetState, FleetStore, Mutation, StoreHandle};
use crate::stream::FleetStream;
use crate::sync::{FetchOutcome, PushSync, SelectionSync, StatisticsSync, VehicleSync};

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for front ends.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. A controller is started
/// once with [`connect`](Self::connect) and stopped once with
/// [`disconnect`](Self::disconnect).
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: FleetConfig,
    store: StoreHandle,
    store_runner: Mutex<Option<FleetStore>>,
    vehicles: VehicleSync,
    statistics: StatisticsSync,
    selection: SelectionSync,
    push_sync: PushSync,
    cancel: CancellationToken,
    push: Mutex<Option<(PushClient, JoinHandle<()>)>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
    running: AtomicBool,
}

impl Controller {
    /// Create a controller talking to the REST service in `config`.
    /// Does NOT connect.
    pub fn new(config: FleetConfig) -> Result<Self, CoreError> {
        let source = build_source(&config)?;
        Ok(Self::with_source(config, source))
    }

    /// Create a controller over an arbitrary data source.
    pub fn with_source(config: FleetConfig, source: Arc<dyn FleetSource>) -> Self {
        let (store_runner, store) = FleetStore::new();

        Self {
            inner: Arc::new(ControllerInner {
                vehicles: VehicleSync::new(store.clone(), Arc::clone(&source)),
                statistics: StatisticsSync::new(store.clone(), Arc::clone(&source)),
                selection: SelectionSync::new(store.clone(), source),
                push_sync: PushSync::new(store.clone()),
                config,
                store,
                store_runner: Mutex::new(Some(store_runner)),
                cancel: CancellationToken::new(),
                push: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &FleetConfig {
        &self.inner.config
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start the store and every synchronization task.
    ///
    /// The vehicle list is fetched for the active filter, statistics are
    /// fetched once, and the push channel is opened when enabled. Fetch
    /// failures land in the store's error field, not here.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let Some(store_runner) = self.inner.store_runner.lock().await.take() else {
            return Err(CoreError::AlreadyConnected);
        };

        let cancel = self.inner.cancel.clone();
        let mut handles = self.inner.task_handles.lock().await;

        handles.push(tokio::spawn(store_runner.run(cancel.clone())));
        self.inner.running.store(true, Ordering::Release);

        handles.push(tokio::spawn(vehicle_sync_task(self.clone(), cancel.clone())));

        let ctrl = self.clone();
        let stats_cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            tokio::select! {
                biased;
                () = stats_cancel.cancelled() => {}
                result = ctrl.inner.statistics.fetch() => report("statistics", result),
            }
        }));

        if self.inner.config.push_enabled {
            let (client, rx) = PushClient::connect(self.inner.config.ws_url.clone(), cancel);
            let task = tokio::spawn(push_task(self.inner.push_sync.clone(), rx));
            *self.inner.push.lock().await = Some((client, task));
        }

        info!(
            api = %self.inner.config.api_url,
            push = self.inner.config.push_enabled,
            "fleet controller started"
        );
        Ok(())
    }

    /// Release the push channel, cancel every task and wait for them.
    ///
    /// The push channel is closed first so its final status change still
    /// reaches the store.
    pub async fn disconnect(&self) {
        if let Some((mut client, task)) = self.inner.push.lock().await.take() {
            client.disconnect().await;
            let _ = task.await;
        }

        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.running.store(false, Ordering::Release);
        debug!("fleet controller stopped");
    }

    // ── Intents ──────────────────────────────────────────────────

    /// Change the status filter. Re-selecting the active filter retries
    /// its fetch if the last one failed.
    pub async fn set_filter(&self, filter: FilterStatus) -> Result<(), CoreError> {
        self.ensure_running()?;

        if self.inner.store.snapshot().active_filter() == filter {
            let outcome = self.inner.vehicles.on_filter(filter).await?;
            debug!(%filter, ?outcome, "active filter re-selected");
            return Ok(());
        }
        self.inner
            .store
            .dispatch(Mutation::SetActiveFilter(filter))
            .await
    }

    /// Open the detail view for a vehicle.
    pub async fn open_vehicle(&self, id: &str) -> Result<FetchOutcome, CoreError> {
        self.ensure_running()?;
        self.inner.selection.open(id).await
    }

    /// Close the detail view.
    pub async fn close_vehicle(&self) -> Result<(), CoreError> {
        self.ensure_running()?;
        self.inner.selection.close().await
    }

    /// Re-fetch the vehicle list for the active filter.
    pub async fn refresh_vehicles(&self) -> Result<FetchOutcome, CoreError> {
        self.ensure_running()?;
        self.inner.vehicles.refresh().await
    }

    /// Re-fetch the statistics.
    pub async fn refresh_statistics(&self) -> Result<FetchOutcome, CoreError> {
        self.ensure_running()?;
        self.inner.statistics.fetch().await
    }

    fn ensure_running(&self) -> Result<(), CoreError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(CoreError::NotConnected)
        }
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Run a closure against a fresh data source, without a store or any
    /// background task. Used by the CLI for single fetches.
    pub async fn oneshot<F, Fut, T>(config: FleetConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Arc<dyn FleetSource>) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let source = build_source(&config)?;
        f(source).await
    }

    // ── State observation ────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<FleetState> {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> FleetStream {
        self.inner.store.subscribe()
    }

    pub fn mutation_log(&self) -> broadcast::Receiver<Arc<Mutation>> {
        self.inner.store.mutation_log()
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Fetch on mount, on every filter change, and on each refresh tick. A
/// filter change waits for an in-flight refresh instead of being dropped.
async fn vehicle_sync_task(controller: Controller, cancel: CancellationToken) {
    let inner = &controller.inner;
    let mut stream = inner.store.subscribe();
    let mut filter = stream.current().active_filter();

    tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        result = inner.vehicles.follow(filter) => report("vehicles", result),
    }

    let mut ticker = refresh_interval(inner.config.refresh_interval_secs);
    if let Some(ticker) = ticker.as_mut() {
        ticker.tick().await; // consume the immediate first tick
    }

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            snapshot = stream.changed() => {
                let Some(snapshot) = snapshot else { break };
                if snapshot.active_filter() == filter {
                    continue;
                }
                filter = snapshot.active_filter();
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = inner.vehicles.follow(filter) => report("vehicles", result),
                }
            }
            () = next_tick(ticker.as_mut()) => {
                debug!("periodic vehicle refresh");
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = inner.vehicles.refresh() => report("vehicles", result),
                }
            }
        }
    }
}

/// Forward push events into the store until the channel closes.
async fn push_task(sync: PushSync, mut events: mpsc::Receiver<PushEvent>) {
    while let Some(event) = events.recv().await {
        if let Err(e) = sync.handle(event).await {
            debug!(error = %e, "push sync stopped");
            break;
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_source(config: &FleetConfig) -> Result<Arc<dyn FleetSource>, CoreError> {
    let transport = TransportConfig::default().with_timeout(config.timeout);
    let client = FleetClient::new(config.api_url.clone(), &transport)?;
    Ok(Arc::new(client))
}

fn refresh_interval(secs: u64) -> Option<Interval> {
    (secs > 0).then(|| {
        let mut interval = tokio::time::interval(Duration::from_secs(secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    })
}

/// Resolves on the next tick, or never when refresh is disabled.
async fn next_tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn report(what: &'static str, result: Result<FetchOutcome, CoreError>) {
    match result {
        Ok(outcome) => debug!(what, ?outcome, "sync finished"),
        Err(e) => warn!(what, error = %e, "sync aborted"),
    }
}
