//! Per-run stage status and interaction log.
//!
//! This module provides:
//! - The append-only interaction log of a run
//! - `AgentStatusTracker`, the stage status board driven by the orchestrator

pub mod log;
pub mod tracker;

use sk_protocol::ipc::Event;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tracing::debug;

/// Forward `event` to the host without waiting for channel capacity.
///
/// Events are dropped while the receiver is full or gone; a run never blocks
/// on its observers.
pub(crate) fn publish(events_tx: &Sender<Event>, event: Event) {
    match events_tx.try_send(event) {
        Ok(()) | Err(TrySendError::Closed(_)) => {}
        Err(TrySendError::Full(event)) => {
            debug!(run_id = ?event.run_id(), "Event channel full, dropping event");
        }
    }
}
