//! What happens when the countdown reaches zero.
//!
//! The countdown engine only signals completion. [`Celebration`] is the
//! collaborator that turns that signal into the visible effects: the birthday
//! message, a confetti window of fixed length, and background music. It is
//! also the single owner of the playback controller for the celebration view,
//! so the music widget and the keyboard shortcut both go through it.

use chrono::{DateTime, Duration, Utc};

use crate::events::Event;
use crate::playback::{AudioSink, PlaybackController};
use crate::sections::SectionTracker;
use crate::storage::config::{CelebrationConfig, MusicConfig};

/// Keyboard shortcuts understood by the celebration view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ToggleMusic,
}

impl Shortcut {
    /// Map a key press. Only presses aimed at the page itself count, so
    /// typing a space into a form field never toggles the music.
    pub fn from_key(code: &str, target_is_page: bool) -> Option<Self> {
        match code {
            "Space" if target_is_page => Some(Shortcut::ToggleMusic),
            _ => None,
        }
    }
}

pub struct Celebration<S: AudioSink> {
    message: String,
    confetti_duration: Duration,
    message_shown: bool,
    confetti_until: Option<DateTime<Utc>>,
    playback: PlaybackController<S>,
    sections: SectionTracker,
}

impl<S: AudioSink> Celebration<S> {
    pub fn new(config: &CelebrationConfig, music: &MusicConfig, sink: S) -> Self {
        let confetti_secs = i64::try_from(config.confetti_secs).unwrap_or(i64::MAX);
        Self {
            message: config.message.clone(),
            confetti_duration: Duration::try_seconds(confetti_secs).unwrap_or(Duration::MAX),
            message_shown: false,
            confetti_until: None,
            playback: PlaybackController::new(sink, music.volume),
            sections: SectionTracker::new(config.sections.iter().cloned()),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn message(&self) -> Option<&str> {
        self.message_shown.then_some(self.message.as_str())
    }

    pub fn is_celebrating(&self) -> bool {
        self.message_shown
    }

    pub fn confetti_active(&self, now: DateTime<Utc>) -> bool {
        self.confetti_until.is_some_and(|until| now < until)
    }

    pub fn playback(&self) -> &PlaybackController<S> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<S> {
        &mut self.playback
    }

    pub fn sections(&self) -> &SectionTracker {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut SectionTracker {
        &mut self.sections
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// React to countdown completion. Only the first call has an effect.
    pub fn on_countdown_complete(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.message_shown {
            return Vec::new();
        }
        self.message_shown = true;
        let until = now
            .checked_add_signed(self.confetti_duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.confetti_until = Some(until);
        tracing::info!(confetti_until = %until, "celebration started");

        let mut events = vec![Event::CelebrationStarted {
            message: self.message.clone(),
            confetti_until: until,
            at: now,
        }];
        events.extend(self.playback.play());
        events
    }

    /// Close the confetti window once it has run its course.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let until = self.confetti_until?;
        if now < until {
            return None;
        }
        self.confetti_until = None;
        Some(Event::ConfettiEnded { at: now })
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> Option<Event> {
        match shortcut {
            Shortcut::ToggleMusic => self.playback.toggle(),
        }
    }
}
