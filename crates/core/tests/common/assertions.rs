//! Assertion helpers over event sequences.

#![allow(dead_code)]

use sk_protocol::ipc::Event;
use sk_protocol::stage_models::{Stage, StageStatus};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Drain events until the run's terminal event or until `timeout` passes.
pub async fn collect_run_events(
    rx: &mut mpsc::Receiver<Event>,
    run_id: Uuid,
    timeout: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + timeout;

    while let Ok(Some(event)) = tokio::time::timeout_at(deadline, rx.recv()).await {
        let is_terminal = event.run_id() == Some(run_id)
            && matches!(
                event,
                Event::RunCompleted { .. } | Event::RunFailed { .. } | Event::RunCancelled { .. }
            );
        events.push(event);
        if is_terminal {
            break;
        }
    }

    events
}

/// Statuses reported for `stage`, in order.
pub fn status_sequence(events: &[Event], stage: Stage) -> Vec<StageStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::StageStatusUpdate { stage: s, status, .. } if *s == stage => Some(*status),
            _ => None,
        })
        .collect()
}

/// Assert a run starts with `RunStarted` and ends with `RunCompleted`.
pub fn assert_completed_sequence(events: &[Event]) {
    assert!(
        matches!(events.first(), Some(Event::RunStarted { .. })),
        "First event should be RunStarted, got: {:?}",
        events.first()
    );
    assert!(
        matches!(events.last(), Some(Event::RunCompleted { .. })),
        "Last event should be RunCompleted, got: {:?}",
        events.last()
    );
}

/// No stage is ever reported as going back to an earlier status.
pub fn assert_monotonic_statuses(events: &[Event]) {
    for stage in Stage::ALL {
        let statuses = status_sequence(events, stage);
        for pair in statuses.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{stage} regressed from {} to {}",
                pair[0],
                pair[1]
            );
        }
    }
}
