//! Waiting for the UI thread's event queue to drain.

use marionette_core::{ActionDispatcher, ActionFailedError, RobotResult};
use marionette_toolkit::UiEvent;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use web_time::Instant;

/// What one sentinel round trip observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pass {
    /// Events dispatched between registering the listener and the sentinel.
    intervening: usize,
    /// Events still queued when the sentinel ran.
    queued: usize,
}

impl Pass {
    fn is_idle(self) -> bool {
        self.intervening == 0 && self.queued == 0
    }
}

fn sentinel_pass(dispatcher: &ActionDispatcher) -> RobotResult<Pass> {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let listener = dispatcher.query(move |ui| {
        ui.add_event_listener(move |_: &UiEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    })?;
    let queued = dispatcher.query(move |ui| {
        ui.remove_event_listener(listener);
        ui.pending_events()
    })?;
    Ok(Pass {
        intervening: seen.load(Ordering::SeqCst),
        queued,
    })
}

/// Blocks until a sentinel pass sees no intervening work and an empty queue.
///
/// Passes keep running until `timeout` has elapsed; at least one pass always
/// runs. Giving up logs a warning and returns `Ok`: draining is best-effort.
pub fn wait_for_idle(dispatcher: &ActionDispatcher, timeout: Duration) -> RobotResult<()> {
    if dispatcher.handle().is_ui_thread() {
        return Err(ActionFailedError::new(
            "cannot wait for the event queue to drain from the UI thread",
        )
        .into());
    }

    let start = Instant::now();
    let mut passes = 0usize;
    loop {
        passes += 1;
        let observed = sentinel_pass(dispatcher)?;
        if observed.is_idle() {
            log::trace!("UI idle after {} pass(es)", passes);
            return Ok(());
        }
        if start.elapsed() >= timeout {
            log::warn!(
                "UI thread '{}' still busy after {:?} ({} passes, last saw {} dispatched, {} queued)",
                dispatcher.handle().name(),
                start.elapsed(),
                passes,
                observed.intervening,
                observed.queued
            );
            return Ok(());
        }
    }
}

#[cfg(test)]
#[path = "tests/idle_tests.rs"]
mod tests;
