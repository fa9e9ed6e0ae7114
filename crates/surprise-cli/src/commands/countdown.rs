use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use surprise_core::timer::CountdownState;
use surprise_core::{
    spawn_countdown, Celebration, Config, CountdownEngine, MonotonicClock, SilentSink,
    TimeRemaining,
};
use tokio::sync::mpsc;

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Print the remaining time once as JSON
    Status,
    /// Live countdown, one line per tick, until the target is reached
    Watch {
        /// Tick interval in milliseconds (defaults to the configured one)
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

enum Update {
    Tick(TimeRemaining),
    Completed,
}

pub fn run(action: CountdownAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        CountdownAction::Status => {
            let mut state = CountdownState::new(config.countdown.target);
            let now = Utc::now();
            state.evaluate(now);
            println!("{}", serde_json::to_string_pretty(&state.snapshot(now))?);
        }
        CountdownAction::Watch { interval_ms } => {
            let period = interval_ms
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or_else(|| config.tick_interval());
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(watch(&config, period))?;
        }
    }
    Ok(())
}

async fn watch(config: &Config, period: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let done = tx.clone();
    let engine = CountdownEngine::start(
        config.countdown.target,
        MonotonicClock::new(),
        move |remaining| {
            let _ = tx.send(Update::Tick(remaining));
        },
        move || {
            let _ = done.send(Update::Completed);
        },
    );
    let mut handle = spawn_countdown(engine, period);

    let mut celebration = Celebration::new(&config.celebration, &config.music, SilentSink);
    celebration.playback_mut().mark_loaded();

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Some(Update::Tick(remaining)) => println!("{remaining}"),
                Some(Update::Completed) => {
                    for event in celebration.on_countdown_complete(Utc::now()) {
                        println!("{}", serde_json::to_string_pretty(&event)?);
                    }
                    if let Some(message) = celebration.message() {
                        println!("{message}");
                    }
                    break;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                handle.stop();
                eprintln!("countdown stopped");
                break;
            }
        }
    }

    let status = handle.finished().await;
    tracing::debug!(?status, "countdown finished");
    Ok(())
}
