//! Forward-only stage sequencer.
//!
//! An ordered list of stages, each shown for a fixed dwell time before the
//! next one takes over. A stage without a dwell waits for [`StageSequencer::advance`].
//! Like the countdown engine it is wall-clock based and has no thread of its
//! own; `tick()` catches up on however many dwell times have elapsed.
//!
//! ```text
//! Idle -> Running -> Finished
//!           ^  |
//!           +--+ restart()
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// How long the stage stays before auto-advancing.
    /// `None` holds the stage until an explicit `advance()`.
    #[serde(default)]
    pub dwell_ms: Option<u64>,
}

impl Stage {
    pub fn timed(id: &str, title: &str, description: &str, dwell_ms: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            dwell_ms: Some(dwell_ms),
        }
    }

    pub fn gated(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            dwell_ms: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceStatus {
    Idle,
    Running,
    Finished,
}

/// Stage sequencer state. Serializable so the CLI can persist it between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSequencer {
    stages: Vec<Stage>,
    status: SequenceStatus,
    index: usize,
    /// When the current stage became visible.
    #[serde(default)]
    entered_at: Option<DateTime<Utc>>,
}

impl StageSequencer {
    /// # Errors
    /// Returns an error if `stages` is empty.
    pub fn new(stages: Vec<Stage>) -> Result<Self, ValidationError> {
        if stages.is_empty() {
            return Err(ValidationError::EmptyCollection(
                "sequence needs at least one stage".into(),
            ));
        }
        Ok(Self {
            stages,
            status: SequenceStatus::Idle,
            index: 0,
            entered_at: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SequenceStatus {
        self.status
    }

    pub fn stage_index(&self) -> usize {
        self.index
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn current_stage(&self) -> &Stage {
        // `new` rejects empty lists and `index` never leaves the range.
        &self.stages[self.index]
    }

    pub fn is_last_stage(&self) -> bool {
        self.index + 1 == self.stages.len()
    }

    /// Milliseconds until the current stage auto-advances.
    pub fn next_advance_ms(&self, now: DateTime<Utc>) -> Option<u64> {
        if self.status != SequenceStatus::Running {
            return None;
        }
        let due = self.due_at()?;
        Some((due - now).num_milliseconds().max(0) as u64)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        let stage = self.current_stage();
        Event::SequenceSnapshot {
            status: self.status,
            stage_index: self.index,
            stage_id: stage.id.clone(),
            title: stage.title.clone(),
            description: stage.description.clone(),
            next_advance_ms: self.next_advance_ms(now),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Show the first stage. No-op unless idle.
    pub fn start(&mut self) -> Option<Event> {
        self.start_at(SystemClock.now())
    }

    pub fn start_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.status != SequenceStatus::Idle {
            return None;
        }
        self.status = SequenceStatus::Running;
        Some(self.enter(0, now))
    }

    /// Advance past every stage whose dwell time has elapsed.
    pub fn tick(&mut self) -> Vec<Event> {
        self.tick_at(SystemClock.now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        while self.status == SequenceStatus::Running {
            let Some(due) = self.due_at() else {
                break;
            };
            if now < due {
                break;
            }
            // Next stage is entered when this one was due, not when we noticed.
            events.push(self.step_forward(due));
        }
        events
    }

    /// Move on because the user asked to. Finishes the sequence from the
    /// last stage.
    pub fn advance(&mut self) -> Option<Event> {
        self.advance_at(SystemClock.now())
    }

    pub fn advance_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.status != SequenceStatus::Running {
            return None;
        }
        Some(self.step_forward(now))
    }

    /// Back to the first stage, running.
    pub fn restart(&mut self) -> Vec<Event> {
        self.restart_at(SystemClock.now())
    }

    pub fn restart_at(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.status = SequenceStatus::Running;
        tracing::debug!("sequence restarted");
        vec![Event::SequenceRestarted { at: now }, self.enter(0, now)]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn due_at(&self) -> Option<DateTime<Utc>> {
        let dwell = self.current_stage().dwell_ms?;
        let entered = self.entered_at?;
        let dwell = i64::try_from(dwell).unwrap_or(i64::MAX);
        entered.checked_add_signed(Duration::milliseconds(dwell))
    }

    fn step_forward(&mut self, at: DateTime<Utc>) -> Event {
        if self.is_last_stage() {
            self.status = SequenceStatus::Finished;
            tracing::debug!("sequence finished");
            return Event::SequenceFinished { at };
        }
        self.enter(self.index + 1, at)
    }

    fn enter(&mut self, index: usize, at: DateTime<Utc>) -> Event {
        self.index = index;
        self.entered_at = Some(at);
        let stage = &self.stages[index];
        tracing::debug!(stage = %stage.id, index, "stage entered");
        Event::StageEntered {
            stage_index: index,
            stage_id: stage.id.clone(),
            title: stage.title.clone(),
            at,
        }
    }
}
