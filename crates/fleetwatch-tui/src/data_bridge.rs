//! Data bridge: connects the [`Controller`] state stream to TUI actions.
//!
//! Runs as a background task. Starts the controller, pushes the initial
//! snapshot, then forwards every state change as an [`Action`] until
//! cancelled, and finally stops the controller.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use fleetwatch_core::Controller;

use crate::action::Action;

pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut stream = controller.subscribe();

    if let Err(e) = controller.connect().await {
        warn!(error = %e, "failed to start fleet controller");
        let _ = action_tx.send(Action::Notify(e.to_string()));
        return;
    }

    // Initial snapshot so the dashboard has something to draw immediately
    let _ = action_tx.send(Action::StateUpdated(stream.latest()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = stream.changed() => {
                let Some(snapshot) = changed else {
                    debug!("state stream closed");
                    break;
                };
                if action_tx.send(Action::StateUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    controller.disconnect().await;
    debug!("data bridge shut down");
}
