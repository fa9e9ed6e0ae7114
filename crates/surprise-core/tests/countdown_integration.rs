//! Countdown end-to-end: engine, runner and the celebration collaborator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use surprise_core::storage::config::{CelebrationConfig, MusicConfig};
use surprise_core::timer::TICK_INTERVAL;
use surprise_core::{
    spawn_countdown, Celebration, Clock, CountdownEngine, CountdownStatus, Event, MonotonicClock,
    SilentSink, TimeRemaining,
};
use tokio::sync::mpsc;

fn recording_engine(
    offset_ms: i64,
    clock: MonotonicClock,
) -> (
    CountdownEngine<MonotonicClock>,
    Arc<Mutex<Vec<TimeRemaining>>>,
    Arc<AtomicUsize>,
) {
    let ticks = Arc::new(Mutex::new(Vec::new()));
    let completions = Arc::new(AtomicUsize::new(0));
    let t = Arc::clone(&ticks);
    let c = Arc::clone(&completions);
    let target = clock.now() + ChronoDuration::milliseconds(offset_ms);
    let engine = CountdownEngine::start(
        target,
        clock,
        move |r| t.lock().unwrap().push(r),
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
    );
    (engine, ticks, completions)
}

#[tokio::test(start_paused = true)]
async fn one_day_one_hour_one_minute_one_second() {
    let (engine, ticks, completions) = recording_engine(90_061_000, MonotonicClock::new());
    assert_eq!(
        ticks.lock().unwrap()[0],
        TimeRemaining {
            days: 1,
            hours: 1,
            minutes: 1,
            seconds: 1
        }
    );

    let mut handle = spawn_countdown(engine, TICK_INTERVAL);
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    handle.stop();
    handle.stop();
    assert_eq!(handle.finished().await, CountdownStatus::Stopped);

    let ticks = ticks.lock().unwrap();
    assert_eq!(ticks.len(), 3);
    assert_eq!(ticks[2].seconds, 59);
    assert_eq!(ticks[2].minutes, 0);
    assert_eq!(completions.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn five_seconds_in_the_past_completes_immediately() {
    let (engine, ticks, completions) = recording_engine(-5_000, MonotonicClock::new());
    assert_eq!(engine.status(), CountdownStatus::Completed);
    assert_eq!(ticks.lock().unwrap().as_slice(), &[TimeRemaining::ZERO]);
    assert_eq!(completions.load(Ordering::SeqCst), 1);

    // Runner on a completed engine exits without ticking again.
    let handle = spawn_countdown(engine, TICK_INTERVAL);
    assert_eq!(handle.finished().await, CountdownStatus::Completed);
    assert_eq!(ticks.lock().unwrap().len(), 1);
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn completion_survives_long_idle_after_target() {
    let (engine, ticks, completions) = recording_engine(2_200, MonotonicClock::new());
    let handle = spawn_countdown(engine, TICK_INTERVAL);
    let status = handle.status();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(*status.borrow(), CountdownStatus::Completed);
    assert_eq!(completions.load(Ordering::SeqCst), 1);

    let ticks = ticks.lock().unwrap();
    // Start, 1 s, 2 s, then zero at 3 s; nothing after completion.
    assert_eq!(ticks.len(), 4);
    assert_eq!(*ticks.last().unwrap(), TimeRemaining::ZERO);
    drop(handle);
}

#[tokio::test(start_paused = true)]
async fn completion_triggers_celebration() {
    let clock = MonotonicClock::new();
    let target = clock.now() + ChronoDuration::milliseconds(1_500);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    let engine = CountdownEngine::start(
        target,
        clock,
        |_| {},
        move || {
            let _ = done_tx.send(());
        },
    );
    let _handle = spawn_countdown(engine, TICK_INTERVAL);

    let mut celebration = Celebration::new(
        &CelebrationConfig::default(),
        &MusicConfig::default(),
        SilentSink,
    );
    celebration.playback_mut().mark_loaded();
    let music = celebration.playback().subscribe();

    done_rx.recv().await.unwrap();
    let now = clock.now();
    let events = celebration.on_countdown_complete(now);
    assert!(matches!(events[0], Event::CelebrationStarted { .. }));
    assert!(music.borrow().playing);
    assert!(celebration.confetti_active(now));
    assert_eq!(celebration.message(), Some("Happy Birthday!"));

    // Channel closes once the engine (and its FnOnce) is gone.
    assert!(done_rx.recv().await.is_none());
}
