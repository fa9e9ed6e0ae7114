mod clock;
mod countdown;
mod remaining;
pub mod runner;
mod sequence;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use countdown::{CountdownEngine, CountdownState, CountdownStatus, Tick};
pub use remaining::TimeRemaining;
pub use runner::{spawn_countdown, CountdownHandle, TICK_INTERVAL};
pub use sequence::{SequenceStatus, Stage, StageSequencer};
