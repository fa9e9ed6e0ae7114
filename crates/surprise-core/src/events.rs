use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{CountdownStatus, SequenceStatus, TimeRemaining};

/// Every state change in the system produces an Event.
/// The presentation layer renders from them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Target instant reached. Produced once per countdown.
    CountdownCompleted {
        target: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// Countdown cancelled before reaching its target.
    CountdownStopped {
        remaining: TimeRemaining,
        at: DateTime<Utc>,
    },
    CountdownSnapshot {
        status: CountdownStatus,
        target: DateTime<Utc>,
        remaining: TimeRemaining,
        remaining_ms: i64,
        completed: bool,
        at: DateTime<Utc>,
    },
    StageEntered {
        stage_index: usize,
        stage_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    SequenceFinished {
        at: DateTime<Utc>,
    },
    SequenceRestarted {
        at: DateTime<Utc>,
    },
    SequenceSnapshot {
        status: SequenceStatus,
        stage_index: usize,
        stage_id: String,
        title: String,
        description: String,
        /// Milliseconds until the next automatic advance, if the stage has a dwell.
        next_advance_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    CelebrationStarted {
        message: String,
        confetti_until: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    ConfettiEnded {
        at: DateTime<Utc>,
    },
    PlaybackChanged {
        playing: bool,
        at: DateTime<Utc>,
    },
    SectionChanged {
        index: usize,
        name: String,
        at: DateTime<Utc>,
    },
    GuestbookSigned {
        id: String,
        name: String,
        at: DateTime<Utc>,
    },
}
