//! Integration tests for the Idea Flow snapshot store

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;

use idea_flow_backup::store::naming::is_snapshot_name;
use idea_flow_backup::{SnapshotStore, StoreConfig, StoreError};
use serde_json::{json, Value};
use tempfile::TempDir;

fn setup_store(keep_count: usize) -> (SnapshotStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::new(temp_dir.path().join("backups")).with_keep_count(keep_count);
    let store = SnapshotStore::open(config).unwrap();
    (store, temp_dir)
}

fn files_on_disk(store: &SnapshotStore) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(store.config().dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .filter(|name| is_snapshot_name(name))
        .collect();
    names.sort();
    names
}

#[test]
fn test_round_trip_arbitrary_payloads() {
    let (store, _temp_dir) = setup_store(20);

    let payloads = vec![
        json!({"ideas": [{"id": "n1", "text": "Ship it", "tags": ["a", "b"]}], "version": 3}),
        json!([1, 2.5, "three", null, true]),
        json!("just a string"),
        json!(null),
        json!({"unicode": "想法流 ✨", "nested": {"deep": {"deeper": [[], {}]}}}),
    ];

    for payload in payloads {
        let saved = store.save(&payload).unwrap();
        let loaded = store.get(&saved.filename).unwrap();
        assert_eq!(loaded, payload);
    }
}

#[test]
fn test_round_trip_preserves_float_bits() {
    let (store, _temp_dir) = setup_store(20);

    let mut values: Vec<f64> = (1..=500).map(|x| x as f64 / 7.0).collect();
    values.extend((1..=500).map(|x| x as f64 * 1999.3 / 3.0));
    values.extend([
        1.947700395895162e-169,
        0.1,
        1e-300,
        2.2250738585072014e-308,
        1.7976931348623157e308,
    ]);
    let payload = json!({ "coordinates": &values });

    let saved = store.save(&payload).unwrap();
    let loaded = store.get(&saved.filename).unwrap();

    let loaded_values: Vec<f64> = loaded["coordinates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    for (expected, actual) in values.iter().zip(&loaded_values) {
        assert_eq!(expected.to_bits(), actual.to_bits(), "{} != {}", expected, actual);
    }
    assert_eq!(loaded, payload);
}

#[test]
fn test_latest_is_last_written() {
    let (store, _temp_dir) = setup_store(20);

    for n in 1..=10 {
        store.save(&json!({"n": n})).unwrap();
    }

    let latest = store.latest().unwrap().unwrap();
    assert_eq!(latest.data, json!({"n": 10}));
    assert_eq!(latest.info.filename, store.list().unwrap()[0].filename);
}

#[test]
fn test_retention_invariant_holds_after_every_write() {
    let (store, _temp_dir) = setup_store(3);
    let mut written = Vec::new();

    for n in 0..8 {
        let saved = store.save(&json!({"n": n})).unwrap();
        written.push(saved.filename);

        let on_disk = files_on_disk(&store);
        assert!(on_disk.len() <= 3, "after write {}: {:?}", n, on_disk);
    }

    // Survivors are exactly the three most recent writes
    let expected: HashSet<String> = written[written.len() - 3..].iter().cloned().collect();
    let actual: HashSet<String> = files_on_disk(&store).into_iter().collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_scenario_keep_two_of_three() {
    let (store, _temp_dir) = setup_store(2);

    store.save(&json!({"a": 1})).unwrap();
    store.save(&json!({"a": 2})).unwrap();
    let third = store.save(&json!({"a": 3})).unwrap();

    assert_eq!(third.evicted.len(), 1);
    assert_eq!(files_on_disk(&store).len(), 2);
    assert_eq!(store.latest().unwrap().unwrap().data, json!({"a": 3}));
}

#[test]
fn test_fresh_store_has_no_data() {
    let (store, _temp_dir) = setup_store(20);

    assert!(store.latest().unwrap().is_none());
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_get_nonexistent_is_not_found() {
    let (store, _temp_dir) = setup_store(20);

    let err = store.get("nonexistent.json").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn test_list_is_newest_first() {
    let (store, _temp_dir) = setup_store(20);

    for n in 0..5 {
        store.save(&json!(n)).unwrap();
    }

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 5);
    for pair in listed.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }

    let contents: Vec<Value> = listed
        .iter()
        .map(|info| store.get(&info.filename).unwrap())
        .collect();
    assert_eq!(contents, vec![json!(4), json!(3), json!(2), json!(1), json!(0)]);
}

#[test]
fn test_read_after_concurrent_delete_is_not_found() {
    let (store, _temp_dir) = setup_store(20);

    let saved = store.save(&json!({"gone": true})).unwrap();
    fs::remove_file(store.config().snapshot_path(&saved.filename)).unwrap();

    let err = store.get(&saved.filename).unwrap_err();
    assert!(err.is_not_found());
    assert!(store.latest().unwrap().is_none());
}

#[test]
fn test_corrupt_file_is_reported() {
    let (store, _temp_dir) = setup_store(20);
    let filename = "backup-2026-01-01T00-00-00-000Z.json";
    fs::write(store.config().snapshot_path(filename), "{\"truncated\": [").unwrap();

    let err = store.get(filename).unwrap_err();
    assert!(matches!(err, StoreError::CorruptData { .. }));
}

#[test]
fn test_concurrent_saves_never_overwrite() {
    let (store, _temp_dir) = setup_store(100);
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..5)
                    .map(|n| store.save(&json!({"worker": worker, "n": n})).unwrap().filename)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut names = HashSet::new();
    for handle in handles {
        for name in handle.join().unwrap() {
            assert!(names.insert(name), "duplicate backup name");
        }
    }

    assert_eq!(names.len(), 40);
    assert_eq!(store.list().unwrap().len(), 40);
}

#[test]
fn test_reopen_sees_existing_backups() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("backups");

    let saved = {
        let store = SnapshotStore::open(StoreConfig::new(&dir)).unwrap();
        store.save(&json!({"session": 1})).unwrap()
    };

    let reopened = SnapshotStore::open(StoreConfig::new(&dir)).unwrap();
    let latest = reopened.latest().unwrap().unwrap();
    assert_eq!(latest.info.filename, saved.filename);
    assert_eq!(latest.data, json!({"session": 1}));
}
