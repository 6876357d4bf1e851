//! Reading store tests — persistence, single-assignment, cascade.

use arcana_core::{
    error::ReadingError,
    reading::{Mode, Position},
    store::ReadingStore,
};

fn store() -> ReadingStore {
    let store = ReadingStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn pos(slot: &str, card: &str, reversed: bool) -> Position {
    Position {
        slot: slot.to_string(),
        card_id: card.to_string(),
        reversed,
    }
}

#[test]
fn create_and_get_round_trip() {
    let store = store();
    let created = store
        .create_reading(
            Mode::Digital,
            "three-card",
            Some("test_seed_123".to_string()),
            serde_json::json!({}),
        )
        .unwrap();

    assert_eq!(created.mode, Mode::Digital);
    assert_eq!(created.spread_id, "three-card");
    assert_eq!(created.seed, "test_seed_123");

    let fetched = store
        .get_reading(&created.reading_id)
        .unwrap()
        .expect("reading should exist");
    assert_eq!(fetched.reading_id, created.reading_id);
    assert_eq!(fetched.mode, Mode::Digital);
    assert_eq!(fetched.seed, "test_seed_123");
    assert_eq!(fetched.created_at, created.created_at);
    assert!(fetched.positions.is_empty(), "No positions yet");
}

#[test]
fn get_missing_reading_returns_none() {
    let store = store();
    assert!(store.get_reading("no-such-id").unwrap().is_none());
}

#[test]
fn omitted_seed_is_generated_and_unpredictable() {
    let store = store();
    let a = store
        .create_reading(Mode::Digital, "single", None, serde_json::json!({}))
        .unwrap();
    let b = store
        .create_reading(Mode::Digital, "single", None, serde_json::json!({}))
        .unwrap();

    assert_eq!(a.seed.len(), 32, "16 OS-random bytes, hex encoded");
    assert!(a.seed.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a.seed, b.seed, "Generated seeds must not repeat");

    // The stored seed is what was generated — immutable from here on.
    let fetched = store.get_reading(&a.reading_id).unwrap().unwrap();
    assert_eq!(fetched.seed, a.seed);
}

#[test]
fn positions_come_back_in_insertion_order() {
    let store = store();
    let reading = store
        .create_reading(Mode::Digital, "three-card", None, serde_json::json!({}))
        .unwrap();

    let positions = vec![
        pos("Past", "AU07", false),
        pos("Present", "AU21", true),
        pos("Future", "AU03", false),
    ];
    store
        .save_positions(&reading.reading_id, &positions, false)
        .unwrap();

    let fetched = store.get_reading(&reading.reading_id).unwrap().unwrap();
    assert_eq!(fetched.positions, positions, "Insertion order is draw order");
}

#[test]
fn second_save_without_force_is_rejected_and_preserves_first() {
    let store = store();
    let reading = store
        .create_reading(Mode::Digital, "single", None, serde_json::json!({}))
        .unwrap();

    let p1 = vec![pos("card_1", "AU01", false)];
    let p2 = vec![pos("card_1", "AU02", true)];

    store.save_positions(&reading.reading_id, &p1, false).unwrap();
    let err = store
        .save_positions(&reading.reading_id, &p2, false)
        .unwrap_err();

    assert!(
        matches!(err, ReadingError::AlreadyAssigned(_)),
        "Expected AlreadyAssigned, got {err:?}"
    );

    let fetched = store.get_reading(&reading.reading_id).unwrap().unwrap();
    assert_eq!(fetched.positions, p1, "Rejected write must leave P1 untouched");
}

#[test]
fn forced_save_replaces_the_full_set() {
    let store = store();
    let reading = store
        .create_reading(Mode::Digital, "three-card", None, serde_json::json!({}))
        .unwrap();

    let p1 = vec![
        pos("card_1", "AU01", false),
        pos("card_2", "AU02", false),
        pos("card_3", "AU03", false),
    ];
    let p2 = vec![pos("card_1", "AU40", true), pos("card_2", "AU41", false)];

    store.save_positions(&reading.reading_id, &p1, false).unwrap();
    store.save_positions(&reading.reading_id, &p2, true).unwrap();

    let fetched = store.get_reading(&reading.reading_id).unwrap().unwrap();
    assert_eq!(
        fetched.positions, p2,
        "Force overwrite must leave exactly P2 — no merge, no residue"
    );
}

#[test]
fn save_to_unknown_reading_fails_atomically() {
    let store = store();
    let err = store
        .save_positions("ghost-reading", &[pos("card_1", "AU01", false)], false)
        .unwrap_err();
    assert!(
        matches!(err, ReadingError::Database(_)),
        "FK violation should surface as a database error, got {err:?}"
    );
    assert_eq!(store.position_count("ghost-reading").unwrap(), 0);
}

#[test]
fn deleting_a_reading_cascades_to_positions() {
    let store = store();
    let reading = store
        .create_reading(Mode::Digital, "single", None, serde_json::json!({}))
        .unwrap();
    store
        .save_positions(&reading.reading_id, &[pos("card_1", "AU05", false)], false)
        .unwrap();

    assert!(store.delete_reading(&reading.reading_id).unwrap());
    assert!(store.get_reading(&reading.reading_id).unwrap().is_none());
    assert_eq!(
        store.position_count(&reading.reading_id).unwrap(),
        0,
        "Cascade must remove the reading's positions"
    );

    // Deleting again reports nothing to delete.
    assert!(!store.delete_reading(&reading.reading_id).unwrap());
}

#[test]
fn readings_survive_a_reopen() {
    let path = std::env::temp_dir().join(format!("arcana-store-{}.db", std::process::id()));
    let path_str = path.to_string_lossy().into_owned();
    let _ = std::fs::remove_file(&path);

    let store = ReadingStore::open(&path_str).expect("file-backed store");
    store.migrate().expect("migration");
    let reading = store
        .create_reading(Mode::Digital, "single", None, serde_json::json!({}))
        .unwrap();
    store
        .save_positions(&reading.reading_id, &[pos("card_1", "AU09", true)], false)
        .unwrap();

    let reopened = store.reopen().expect("second connection to the same file");
    let fetched = reopened
        .get_reading(&reading.reading_id)
        .unwrap()
        .expect("reading must survive the reopen");
    assert_eq!(fetched.seed, reading.seed, "Seed persists across connections");
    assert_eq!(fetched.positions.len(), 1);
    assert!(fetched.positions[0].reversed);

    drop(reopened);
    drop(store);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path_str}{suffix}"));
    }
}

#[test]
fn metadata_round_trips_opaquely() {
    let store = store();
    let metadata = serde_json::json!({"querent": "R.", "question": "what next"});
    let reading = store
        .create_reading(Mode::Physical, "celtic-cross", None, metadata.clone())
        .unwrap();

    let fetched = store.get_reading(&reading.reading_id).unwrap().unwrap();
    assert_eq!(fetched.metadata, metadata);
    assert_eq!(fetched.mode, Mode::Physical);
}

#[test]
fn recent_readings_lists_newest_first() {
    let store = store();
    for i in 0..3 {
        store
            .create_reading(
                Mode::Digital,
                &format!("spread-{i}"),
                None,
                serde_json::json!({}),
            )
            .unwrap();
    }

    let all = store.recent_readings(10).unwrap();
    assert_eq!(all.len(), 3);
    let limited = store.recent_readings(2).unwrap();
    assert_eq!(limited.len(), 2, "Limit must apply");
}
