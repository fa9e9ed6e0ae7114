//! Drives a [`CountdownEngine`] on a tokio interval.
//!
//! The spawned task owns the engine. The returned [`CountdownHandle`] owns
//! the cancellation side: stopping, or simply dropping the handle, ends the
//! task on its next poll, so the scheduled timer is released on every exit
//! path (completion, explicit stop, owner teardown).

use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::clock::Clock;
use super::countdown::{CountdownEngine, CountdownStatus};

/// Default recomputation cadence.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Shortest period the tick loop accepts; `tokio::time::interval` rejects zero.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owner of a running countdown task.
#[derive(Debug)]
pub struct CountdownHandle {
    cancel: Option<oneshot::Sender<()>>,
    status: watch::Receiver<CountdownStatus>,
    task: Option<JoinHandle<CountdownStatus>>,
}

/// Spawn the tick loop for an already-started engine.
///
/// The engine performed its first evaluation in [`CountdownEngine::start`],
/// so the first scheduled tick fires one `period` from now. An engine that
/// already completed produces a handle whose task exits immediately.
/// A zero `period` is raised to [`MIN_PERIOD`].
///
/// Must be called from within a tokio runtime.
pub fn spawn_countdown<C>(engine: CountdownEngine<C>, period: Duration) -> CountdownHandle
where
    C: Clock + 'static,
{
    let period = period.max(MIN_PERIOD);
    let (cancel_tx, cancel_rx) = oneshot::channel();
    let (status_tx, status_rx) = watch::channel(engine.status());
    let task = tokio::spawn(run(engine, period, cancel_rx, status_tx));
    CountdownHandle {
        cancel: Some(cancel_tx),
        status: status_rx,
        task: Some(task),
    }
}

async fn run<C: Clock>(
    mut engine: CountdownEngine<C>,
    period: Duration,
    mut cancel: oneshot::Receiver<()>,
    status: watch::Sender<CountdownStatus>,
) -> CountdownStatus {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !engine.status().is_terminal() {
        tokio::select! {
            // Fires on an explicit stop and when the handle is dropped.
            _ = &mut cancel => {
                engine.stop();
            }
            _ = interval.tick() => {
                engine.tick();
            }
        }
    }

    let last = engine.status();
    status.send_replace(last);
    last
}

impl CountdownHandle {
    /// Halt scheduled recomputation. Safe to call repeatedly and after the
    /// countdown completed on its own.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            // Err means the task already finished, which is fine.
            let _ = cancel.send(());
        }
    }

    /// Latest status. Updated when the task reaches a terminal state.
    pub fn status(&self) -> watch::Receiver<CountdownStatus> {
        self.status.clone()
    }

    /// Wait for the task to end and return its terminal status.
    pub async fn finished(mut self) -> CountdownStatus {
        let Some(task) = self.task.take() else {
            return *self.status.borrow();
        };
        match task.await {
            Ok(status) => status,
            // Only reachable if a listener panicked.
            Err(_) => CountdownStatus::Stopped,
        }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
