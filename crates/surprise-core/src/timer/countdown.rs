//! Countdown engine.
//!
//! Counts down to a fixed target instant and notifies a listener exactly once
//! when the target is reached. Like the rest of the timer module it has no
//! internal thread: the caller (or [`super::runner`]) invokes `tick()` about
//! once per second, and each tick recomputes from the clock, so late or
//! skipped ticks never accumulate drift.
//!
//! ## State Transitions
//!
//! ```text
//! Counting -> Completed
//! Counting -> Stopped
//! ```
//!
//! Both `Completed` and `Stopped` are terminal.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::start(
//!     target,
//!     SystemClock,
//!     |remaining| println!("{remaining}"),
//!     || println!("Happy Birthday!"),
//! );
//! // Once per second:
//! engine.tick();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::remaining::TimeRemaining;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownStatus {
    Counting,
    Completed,
    Stopped,
}

impl CountdownStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CountdownStatus::Counting)
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining: TimeRemaining,
    pub remaining_ms: i64,
    /// True only on the evaluation that moved the state to `Completed`.
    pub completed_now: bool,
}

/// Countdown bookkeeping without callbacks or a clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownState {
    target: DateTime<Utc>,
    remaining: TimeRemaining,
    remaining_ms: i64,
    completed: bool,
    status: CountdownStatus,
}

impl CountdownState {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            remaining: TimeRemaining::ZERO,
            remaining_ms: 0,
            completed: false,
            status: CountdownStatus::Counting,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    pub fn remaining(&self) -> TimeRemaining {
        self.remaining
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn snapshot(&self, at: DateTime<Utc>) -> Event {
        Event::CountdownSnapshot {
            status: self.status,
            target: self.target,
            remaining: self.remaining,
            remaining_ms: self.remaining_ms,
            completed: self.completed,
            at,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Recompute the remaining time against `now`.
    ///
    /// Returns `None` once stopped. After completion every evaluation reports
    /// zero and `completed_now` stays false.
    pub fn evaluate(&mut self, now: DateTime<Utc>) -> Option<Tick> {
        match self.status {
            CountdownStatus::Stopped => None,
            CountdownStatus::Completed => Some(Tick {
                remaining: TimeRemaining::ZERO,
                remaining_ms: 0,
                completed_now: false,
            }),
            CountdownStatus::Counting => {
                let ms = (self.target - now).num_milliseconds();
                if ms <= 0 {
                    self.remaining = TimeRemaining::ZERO;
                    self.remaining_ms = 0;
                    self.completed = true;
                    self.status = CountdownStatus::Completed;
                    return Some(Tick {
                        remaining: TimeRemaining::ZERO,
                        remaining_ms: 0,
                        completed_now: true,
                    });
                }
                self.remaining = TimeRemaining::from_millis(ms);
                self.remaining_ms = ms;
                Some(Tick {
                    remaining: self.remaining,
                    remaining_ms: ms,
                    completed_now: false,
                })
            }
        }
    }

    /// Cancel. Returns false if the countdown had already ended.
    pub fn stop(&mut self) -> bool {
        if self.status != CountdownStatus::Counting {
            return false;
        }
        self.status = CountdownStatus::Stopped;
        true
    }
}

type TickFn = Box<dyn FnMut(TimeRemaining) + Send>;
type CompleteFn = Box<dyn FnOnce() + Send>;

/// Countdown wired to a clock and its two listeners.
pub struct CountdownEngine<C: Clock = SystemClock> {
    clock: C,
    state: CountdownState,
    on_tick: TickFn,
    /// Taken on completion; `FnOnce` keeps the single-call guarantee.
    on_complete: Option<CompleteFn>,
}

impl<C: Clock> CountdownEngine<C> {
    /// Create the engine and run the first evaluation immediately.
    ///
    /// A target at or before `now` completes right here: `on_tick` receives
    /// zero and `on_complete` fires before this returns.
    pub fn start<T, F>(target: DateTime<Utc>, clock: C, on_tick: T, on_complete: F) -> Self
    where
        T: FnMut(TimeRemaining) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let mut engine = Self {
            clock,
            state: CountdownState::new(target),
            on_tick: Box::new(on_tick),
            on_complete: Some(Box::new(on_complete)),
        };
        tracing::debug!(deadline = %target, "countdown started");
        engine.tick();
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &CountdownState {
        &self.state
    }

    pub fn status(&self) -> CountdownStatus {
        self.state.status()
    }

    pub fn remaining(&self) -> TimeRemaining {
        self.state.remaining()
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    pub fn snapshot(&self) -> Event {
        self.state.snapshot(self.clock.now())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// One recomputation. Returns `Some(Event::CountdownCompleted)` on the
    /// tick that reaches the target; a no-op once completed or stopped.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state.status().is_terminal() {
            return None;
        }
        let now = self.clock.now();
        let tick = self.state.evaluate(now)?;
        (self.on_tick)(tick.remaining);

        if !tick.completed_now {
            tracing::trace!(remaining = %tick.remaining, "countdown tick");
            return None;
        }

        tracing::info!(deadline = %self.state.target(), "countdown completed");
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
        Some(Event::CountdownCompleted {
            target: self.state.target(),
            at: now,
        })
    }

    /// Cancel scheduled recomputation. Only the first call on a counting
    /// engine produces an event.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.state.stop() {
            return None;
        }
        self.on_complete = None;
        tracing::debug!(deadline = %self.state.target(), "countdown stopped");
        Some(Event::CountdownStopped {
            remaining: self.state.remaining(),
            at: self.clock.now(),
        })
    }
}

impl<C: Clock> std::fmt::Debug for CountdownEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
