// ── Synchronization hooks ──
//
// Each hook decides when one data source writes into the store. Hooks
// never touch state directly: they dispatch mutations through a
// `StoreHandle` and read snapshots back.

mod guard;
mod push;
mod selection;
mod statistics;
mod vehicles;

pub use guard::{FetchGuard, FetchToken, SyncState};
pub use push::PushSync;
pub use selection::SelectionSync;
pub use statistics::StatisticsSync;
pub use vehicles::VehicleSync;

/// What a guarded fetch routine ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fetch ran and its result was written to the store.
    Fetched,
    /// The fetch ran, failed, and the error was written to the store.
    Failed,
    /// Another fetch for the same source was still outstanding.
    SkippedInFlight,
    /// The requested data was already the last successful fetch.
    SkippedUnchanged,
    /// The result arrived after the request was superseded and was dropped.
    Discarded,
}

#[cfg(test)]
pub(crate) mod testing;
