//! Passive subscriber that writes every platform event to the log.

use dockyard_core::{EventBroadcaster, PlatformEvent};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Subscribes to `broadcaster` and logs events on a background task.
///
/// The task ends when the broadcaster is dropped.
pub fn spawn_event_log(broadcaster: &EventBroadcaster) -> JoinHandle<()> {
    tokio::spawn(run(broadcaster.subscribe()))
}

async fn run(mut receiver: broadcast::Receiver<PlatformEvent>) {
    debug!("Starting event log");

    loop {
        match receiver.recv().await {
            Ok(event) => {
                info!(
                    event = %event.kind(),
                    subject_id = %event.subject_id(),
                    "platform event"
                );
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "Event log lagged, missed events");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Event channel closed, stopping event log");
                break;
            }
        }
    }
}
