//! Background music playback state.
//!
//! [`PlaybackController`] is the single owner of the "is music playing" flag.
//! Every other consumer (the music widget, the keyboard shortcut, the
//! celebration trigger) holds a `watch::Receiver` and never keeps a copy of
//! its own. All mutation goes through the controller, which also talks to the
//! host's audio output via [`AudioSink`].
//!
//! A rejected `play()` (autoplay policy, missing asset) is not an error for
//! the caller: the optimistic `playing = true` is reverted and the failure is
//! logged.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::PlaybackError;
use crate::events::Event;

pub const DEFAULT_VOLUME: f32 = 0.5;

/// Host audio output.
pub trait AudioSink: Send {
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// Sink for hosts without audio output. Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub playing: bool,
    /// 0.0 ..= 1.0
    pub volume: f32,
    /// Asset is buffered and can start without stalling.
    pub loaded: bool,
}

pub struct PlaybackController<S: AudioSink> {
    sink: S,
    state: watch::Sender<PlaybackState>,
    /// Play was requested before the asset finished loading.
    pending_play: bool,
}

impl<S: AudioSink> PlaybackController<S> {
    pub fn new(mut sink: S, volume: f32) -> Self {
        let volume = clamp_volume(volume);
        sink.set_volume(volume);
        let (state, _) = watch::channel(PlaybackState {
            playing: false,
            volume,
            loaded: false,
        });
        Self {
            sink,
            state,
            pending_play: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Observe every change to the playback state.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// The asset can play. Honours a play request made while loading.
    pub fn mark_loaded(&mut self) -> Option<Event> {
        self.state.send_modify(|s| s.loaded = true);
        if std::mem::take(&mut self.pending_play) {
            return self.play();
        }
        None
    }

    /// Start playback. Before the asset is loaded the request is remembered.
    pub fn play(&mut self) -> Option<Event> {
        let current = self.state();
        if current.playing {
            return None;
        }
        if !current.loaded {
            self.pending_play = true;
            return None;
        }

        self.state.send_modify(|s| s.playing = true);
        match self.sink.play() {
            Ok(()) => Some(changed(true)),
            Err(err) => {
                tracing::warn!(error = %err, "playback rejected, staying silent");
                self.state.send_modify(|s| s.playing = false);
                None
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pending_play = false;
        if !self.is_playing() {
            return None;
        }
        self.sink.pause();
        self.state.send_modify(|s| s.playing = false);
        Some(changed(false))
    }

    /// Flip playback. While loading this flips the deferred play request.
    pub fn toggle(&mut self) -> Option<Event> {
        let current = self.state();
        if !current.loaded {
            self.pending_play = !self.pending_play;
            return None;
        }
        if current.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    pub fn set_playing(&mut self, playing: bool) -> Option<Event> {
        if playing {
            self.play()
        } else {
            self.pause()
        }
    }

    /// Track reached its end.
    pub fn on_ended(&mut self) -> Option<Event> {
        self.reset_playing()
    }

    /// Host reported a media error mid-playback.
    pub fn on_error(&mut self, err: PlaybackError) -> Option<Event> {
        tracing::warn!(error = %err, "playback error");
        self.reset_playing()
    }

    /// Set the output volume, clamped to `0.0 ..= 1.0`.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = clamp_volume(volume);
        self.sink.set_volume(volume);
        self.state.send_modify(|s| s.volume = volume);
        volume
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset_playing(&mut self) -> Option<Event> {
        self.pending_play = false;
        if !self.is_playing() {
            return None;
        }
        self.state.send_modify(|s| s.playing = false);
        Some(changed(false))
    }
}

impl<S: AudioSink> std::fmt::Debug for PlaybackController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state())
            .field("pending_play", &self.pending_play)
            .finish_non_exhaustive()
    }
}

fn changed(playing: bool) -> Event {
    Event::PlaybackChanged {
        playing,
        at: Utc::now(),
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return DEFAULT_VOLUME;
    }
    volume.clamp(0.0, 1.0)
}
