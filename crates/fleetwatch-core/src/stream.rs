// ── Reactive state stream ──
//
// Subscription type for consuming `FleetState` snapshots from the store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::watch;
use tokio_stream::Stream;
use tokio_stream::wrappers::WatchStream;

use crate::store::FleetState;

/// A subscription to the fleet state.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed`](Self::changed) or by converting to a `Stream`.
pub struct FleetStream {
    current: Arc<FleetState>,
    receiver: watch::Receiver<Arc<FleetState>>,
}

impl FleetStream {
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<FleetState>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot seen most recently through this subscription.
    pub fn current(&self) -> &Arc<FleetState> {
        &self.current
    }

    /// The latest snapshot (may have changed since the last `changed()`).
    pub fn latest(&self) -> Arc<FleetState> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the store has shut down.
    pub async fn changed(&mut self) -> Option<Arc<FleetState>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` that yields the current snapshot, then one per change.
    pub fn into_stream(self) -> FleetWatchStream {
        FleetWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct FleetWatchStream {
    inner: WatchStream<Arc<FleetState>>,
}

impl Stream for FleetWatchStream {
    type Item = Arc<FleetState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
