//! The teaser screens shown before the celebration view.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::timer::Stage;

/// Dwell of each auto-advancing teaser screen.
pub const TEASER_DWELL_MS: u64 = 4_000;

/// How far the "No, thanks" button may jump on each axis, in pixels.
pub const DODGE_RANGE_PX: f64 = 100.0;

/// The built-in three-screen teaser for `recipient`. The last screen waits
/// for the "Yes" choice.
pub fn default_stages(recipient: &str) -> Vec<Stage> {
    vec![
        Stage::timed(
            "greeting",
            &format!("It's Your Birthday {recipient}!"),
            "Get ready for something amazing!",
            TEASER_DWELL_MS,
        ),
        Stage::timed(
            "gift",
            &format!("Made something special for {recipient}"),
            "Because you're special to me!",
            TEASER_DWELL_MS,
        ),
        Stage::gated("ready", "Ready to See?", "Do you want to see what I made?"),
    ]
}

/// Position offset of the dodging button, relative to where it was laid out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DodgeOffset {
    pub x: f64,
    pub y: f64,
}

/// New spot for the "No, thanks" button, each axis in `[-100, 100)`.
pub fn dodge_offset<R: Rng + ?Sized>(rng: &mut R) -> DodgeOffset {
    DodgeOffset {
        x: rng.gen_range(-DODGE_RANGE_PX..DODGE_RANGE_PX),
        y: rng.gen_range(-DODGE_RANGE_PX..DODGE_RANGE_PX),
    }
}

/// [`dodge_offset`] with the thread-local generator.
pub fn random_dodge() -> DodgeOffset {
    dodge_offset(&mut rand::thread_rng())
}
