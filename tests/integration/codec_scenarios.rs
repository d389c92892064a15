//! End-to-end codec scenarios through the store

use super::test_utils::{strict, Sample};
use serde_json::{json, Value};
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use tempfile::TempDir;
use treestore::codec::{decode, encode, encode_into};
use treestore::{Diagnostics, Encoded, SaveOutcome, Store, StoreOptions};

#[derive(Debug, Clone, PartialEq)]
struct Small {
    b: bool,
    s: String,
    i: i32,
}

impl Default for Small {
    fn default() -> Self {
        Self {
            b: true,
            s: "string".to_string(),
            i: 99,
        }
    }
}

treestore::record!(Small { b, s, i });

/// Absent fields come back as defaults after a load
#[test]
fn test_scenario_defaults_restored_on_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("small.json");
    fs::write(&path, r#"{ "b": true }"#).unwrap();

    let store: Store<Small> = Store::open(&path, StoreOptions::default().with_diagnostics(strict()));
    assert!(store.b);
    assert_eq!(store.s, "string");
    assert_eq!(store.i, 99);
}

/// A sequence of records persists only the overridden element fields
#[test]
fn test_scenario_sequence_of_records() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("list.json");

    let mut store: Store<Vec<Small>> = Store::open(&path, StoreOptions::default());
    store.extend([Small::default(), Small::default(), Small::default()]);
    store.push(Small {
        i: 9876,
        ..Small::default()
    });
    assert_eq!(store.save().unwrap(), SaveOutcome::Written);

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, json!([{}, {}, {}, { "i": 9876 }]));

    let reopened: Store<Vec<Small>> = Store::open(&path, StoreOptions::default());
    assert_eq!(reopened.len(), 4);
    assert_eq!(reopened[3].i, 9876);
    assert_eq!(reopened[0], Small::default());
}

/// Emptying a root sequence deletes its file
#[test]
fn test_scenario_empty_root_sequence_removes_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("queue.json");
    fs::write(&path, "[1,2,3]").unwrap();

    let mut store: Store<VecDeque<u16>> = Store::open(&path, StoreOptions::default());
    assert_eq!(store.len(), 3);

    store.clear();
    assert_eq!(store.save().unwrap(), SaveOutcome::Removed);
    assert!(!path.exists());
}

/// The all-defaults record encodes to `{}` and `{}` restores any instance
#[test]
fn test_default_set_round_trip() {
    let diag = strict();
    let document = encode(&Sample::default(), true, &diag);
    assert_eq!(document, json!({}));

    let mut mutated = Sample {
        b: false,
        s: "other".to_string(),
        i: -1,
        j: Value::Null,
        m: BTreeMap::new(),
        m2: [(1, BTreeMap::new())].into_iter().collect(),
    };
    decode(&document, &mut mutated, &diag).unwrap();
    assert_eq!(mutated, Sample::default());
}

/// An emptied non-default container is persisted as empty, not dropped
#[test]
fn test_cleared_default_map_is_kept() {
    let mut sample = Sample::default();
    sample.m.clear();

    let mut document = Value::Null;
    assert_eq!(
        encode_into(&sample, &mut document, true, &Diagnostics::silent()),
        Encoded::Content
    );
    assert_eq!(document, json!({ "m": {} }));

    let mut back = Sample::default();
    decode(&document, &mut back, &strict()).unwrap();
    assert!(back.m.is_empty());
}

/// Foreign-keyed maps are encoded as key/value pairs
#[test]
fn test_foreign_keyed_pairs() {
    let mut sample = Sample::default();
    sample
        .m2
        .entry(3)
        .or_default()
        .insert("c".to_string(), 999);
    sample.m2.entry(1).or_default();

    let document = encode(&sample, true, &strict());
    assert_eq!(document, json!({ "m2": [[1, {}], [3, { "c": 999 }]] }));

    let mut back = Sample::default();
    decode(&document, &mut back, &strict()).unwrap();
    assert_eq!(back, sample);
}
