use clap::Subcommand;
use surprise_core::storage::Database;
use surprise_core::teaser::random_dodge;
use surprise_core::timer::StageSequencer;
use surprise_core::{Config, Event};

const SEQUENCER_KEY: &str = "teaser_sequencer";

#[derive(Subcommand)]
pub enum TeaserAction {
    /// Show the first teaser screen
    Start,
    /// Catch up on elapsed screens and print the current one as JSON
    Status,
    /// Move to the next screen ("Yes! Show me" on the last one)
    Advance,
    /// Go back to the first screen
    Restart,
    /// Where the "No, thanks" button jumps to
    Dodge,
}

/// Saved progress, unless the configured screens changed since it was saved.
fn load_sequencer(
    db: &Database,
    config: &Config,
) -> Result<StageSequencer, Box<dyn std::error::Error>> {
    let stages = config.teaser_stages();
    if let Some(json) = db.kv_get(SEQUENCER_KEY)? {
        match serde_json::from_str::<StageSequencer>(&json) {
            Ok(seq) if seq.stages() == stages.as_slice() => return Ok(seq),
            Ok(_) => tracing::debug!("teaser screens changed, starting over"),
            Err(err) => {
                tracing::warn!(error = %err, "saved teaser state is corrupt, starting over");
            }
        }
    }
    Ok(StageSequencer::new(stages)?)
}

fn save_sequencer(db: &Database, seq: &StageSequencer) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(seq)?;
    db.kv_set(SEQUENCER_KEY, &json)?;
    Ok(())
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

pub fn run(action: TeaserAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut seq = load_sequencer(&db, &config)?;

    match action {
        TeaserAction::Start => {
            let mut events: Vec<Event> = seq.start().into_iter().collect();
            events.extend(seq.tick());
            if events.is_empty() {
                events.push(seq.snapshot(chrono::Utc::now()));
            }
            print_events(&events)?;
        }
        TeaserAction::Status => {
            let advanced = seq.tick();
            print_events(&advanced)?;
            print_events(&[seq.snapshot(chrono::Utc::now())])?;
        }
        TeaserAction::Advance => {
            let mut events = seq.tick();
            events.extend(seq.advance());
            if events.is_empty() {
                events.push(seq.snapshot(chrono::Utc::now()));
            }
            print_events(&events)?;
        }
        TeaserAction::Restart => {
            seq = StageSequencer::new(config.teaser_stages())?;
            print_events(&seq.restart())?;
        }
        TeaserAction::Dodge => {
            println!("{}", serde_json::to_string(&random_dodge())?);
        }
    }

    save_sequencer(&db, &seq)?;
    Ok(())
}
