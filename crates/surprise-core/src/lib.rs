//! # Birthday Surprise Core Library
//!
//! State and timing behind the birthday-surprise experience. Rendering lives
//! elsewhere; this crate decides *what* is on screen and *when*. The CLI in
//! `surprise-cli` is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: wall-clock state machine counting down to a target
//!   instant, with a tokio runner that owns the tick timer
//! - **Stage Sequencer**: forward-only teaser screens with fixed dwell times
//! - **Celebration**: confetti window and music started on completion
//! - **Playback**: single owner of the "music playing" flag
//! - **Guestbook**: append-only message log in the kv store
//! - **Storage**: SQLite kv store and TOML configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: core countdown state machine
//! - [`StageSequencer`]: teaser stage sequencing
//! - [`Celebration`]: completion side effects
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration management

pub mod celebration;
pub mod error;
pub mod events;
pub mod guestbook;
pub mod playback;
pub mod sections;
pub mod storage;
pub mod teaser;
pub mod timer;

pub use celebration::{Celebration, Shortcut};
pub use error::{ConfigError, CoreError, DatabaseError, PlaybackError, ValidationError};
pub use events::Event;
pub use guestbook::{Guestbook, GuestbookEntry};
pub use playback::{AudioSink, PlaybackController, PlaybackState, SilentSink};
pub use sections::{SectionLayout, SectionTracker};
pub use storage::{Config, Database};
pub use timer::{
    spawn_countdown, Clock, CountdownEngine, CountdownHandle, CountdownState, CountdownStatus,
    MonotonicClock, SequenceStatus, Stage, StageSequencer, SystemClock, TimeRemaining,
};
