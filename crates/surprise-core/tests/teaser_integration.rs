//! Teaser sequencer persisted through the kv store, the way the CLI drives it.

use chrono::{Duration, TimeZone, Utc};
use surprise_core::{Config, Database, Event, SequenceStatus, StageSequencer};

const KEY: &str = "teaser_sequencer";

fn save(db: &Database, seq: &StageSequencer) {
    db.kv_set(KEY, &serde_json::to_string(seq).unwrap()).unwrap();
}

fn load(db: &Database) -> StageSequencer {
    let raw = db.kv_get(KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn sequence_resumes_across_invocations() {
    let t0 = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
    let db = Database::open_memory().unwrap();
    let config = Config::default();

    let mut seq = StageSequencer::new(config.teaser_stages()).unwrap();
    seq.start_at(t0);
    save(&db, &seq);

    // Next invocation, five seconds later.
    let mut seq = load(&db);
    let events = seq.tick_at(t0 + Duration::seconds(5));
    assert!(matches!(
        events.as_slice(),
        [Event::StageEntered { stage_index: 1, .. }]
    ));
    save(&db, &seq);

    // Long after: parked on the "Ready to See?" screen.
    let mut seq = load(&db);
    seq.tick_at(t0 + Duration::minutes(5));
    assert_eq!(seq.current_stage().id, "ready");
    assert_eq!(seq.status(), SequenceStatus::Running);

    // "Yes! Show me" finishes the teaser.
    assert!(matches!(
        seq.advance_at(t0 + Duration::minutes(5)),
        Some(Event::SequenceFinished { .. })
    ));
    save(&db, &seq);
    assert_eq!(load(&db).status(), SequenceStatus::Finished);
}

#[test]
fn snapshot_reports_time_to_next_screen() {
    let t0 = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
    let mut seq = StageSequencer::new(Config::default().teaser_stages()).unwrap();
    seq.start_at(t0);
    match seq.snapshot(t0 + Duration::milliseconds(1_250)) {
        Event::SequenceSnapshot {
            stage_index,
            next_advance_ms,
            status,
            ..
        } => {
            assert_eq!(stage_index, 0);
            assert_eq!(next_advance_ms, Some(2_750));
            assert_eq!(status, SequenceStatus::Running);
        }
        other => panic!("Expected SequenceSnapshot, got {other:?}"),
    }
}
