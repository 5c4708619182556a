// ── Reentrancy guard ──

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Whether a logical source has a fetch outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    InFlight,
}

/// One per logical source. [`try_begin`](Self::try_begin) checks and sets
/// atomically; the returned token flips the state back when dropped, on
/// success, failure, or unwinding alike.
#[derive(Debug, Default)]
pub struct FetchGuard {
    in_flight: AtomicBool,
    released: Notify,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the source, or `None` if a fetch is already outstanding.
    pub fn try_begin(&self) -> Option<FetchToken<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FetchToken { guard: self })
    }

    /// Resolve once no fetch is outstanding. Does not claim the source.
    pub async fn idle(&self) {
        loop {
            let released = self.released.notified();
            tokio::pin!(released);
            released.as_mut().enable();
            if !self.in_flight.load(Ordering::Acquire) {
                return;
            }
            released.await;
        }
    }

    pub fn state(&self) -> SyncState {
        if self.in_flight.load(Ordering::Acquire) {
            SyncState::InFlight
        } else {
            SyncState::Idle
        }
    }
}

/// Proof that the holder owns the in-flight slot of a [`FetchGuard`].
#[derive(Debug)]
pub struct FetchToken<'a> {
    guard: &'a FetchGuard,
}

impl Drop for FetchToken<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.store(false, Ordering::Release);
        self.guard.released.notify_waiters();
    }
}
