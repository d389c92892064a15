//! Integration tests for the file-backed durable store

use super::test_utils::{strict, Sample};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;
use treestore::{Diagnostics, SaveOutcome, Store, StoreError, StoreOptions, StoreState};

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// A fresh store has no file and saving defaults creates none
#[test]
fn test_defaults_never_create_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");

    let mut store: Store<Sample> = Store::open(&path, StoreOptions::default());
    assert_eq!(store.state(), StoreState::Unloaded);
    assert_eq!(store.save().unwrap(), SaveOutcome::Absent);
    assert!(!path.exists());
}

/// Only overridden fields are written, and a reopened store sees them
#[test]
fn test_save_and_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("sample.json");

    {
        let mut store: Store<Sample> =
            Store::open(&path, StoreOptions::default().with_diagnostics(strict()));
        store.i = 42;
        store.m.remove("x");
        store.m.insert("z".to_string(), 33);
        assert_eq!(store.save().unwrap(), SaveOutcome::Written);
    }

    assert_eq!(read_json(&path), json!({ "i": 42, "m": { "y": 22, "z": 33 } }));
    assert!(!temp_dir.path().join("state").join("sample.json~").exists());

    let store: Store<Sample> = Store::open(&path, StoreOptions::default());
    assert_eq!(store.state(), StoreState::Loaded);
    assert_eq!(store.i, 42);
    assert_eq!(store.m.get("z"), Some(&33));
    assert!(!store.m.contains_key("x"));
}

/// Saving twice without changes writes once
#[test]
fn test_second_save_is_a_no_op() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");

    let mut store: Store<Sample> = Store::open(&path, StoreOptions::default());
    store.s = "changed".to_string();
    assert_eq!(store.save().unwrap(), SaveOutcome::Written);
    let modified = fs::metadata(&path).unwrap().modified().unwrap();

    assert_eq!(store.save().unwrap(), SaveOutcome::Unchanged);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
}

/// Unknown keys on disk survive a load/save cycle
#[test]
fn test_unknown_keys_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, r#"{"i":7,"retired_field":{"nested":[1,2]}}"#).unwrap();

    let mut store: Store<Sample> = Store::open(&path, StoreOptions::default());
    assert_eq!(store.i, 7);
    store.b = false;
    assert_eq!(store.save().unwrap(), SaveOutcome::Written);

    assert_eq!(
        read_json(&path),
        json!({ "i": 7, "b": false, "retired_field": { "nested": [1, 2] } })
    );
}

/// Reverting every field removes the file
#[test]
fn test_revert_to_defaults_removes_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, r#"{"i":7}"#).unwrap();

    let mut store: Store<Sample> = Store::open(&path, StoreOptions::default());
    store.i = 99;
    assert_eq!(store.save().unwrap(), SaveOutcome::Removed);
    assert!(!path.exists());
}

/// Unparsable text fails load without touching the root
#[test]
fn test_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, "{\"i\": 5,").unwrap();

    let (diag, messages) = Diagnostics::collect();
    let mut store: Store<Sample> =
        Store::open(&path, StoreOptions::default().with_diagnostics(diag));
    assert_eq!(store.state(), StoreState::Unloaded);
    assert_eq!(store.i, 99);
    assert_eq!(messages.lock().len(), 1);

    store.i = 1;
    assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
    assert_eq!(store.i, 1);

    // Saving replaces the corrupt content.
    assert_eq!(store.save().unwrap(), SaveOutcome::Written);
    assert_eq!(read_json(&path), json!({ "i": 1 }));
}

/// Recognisable but mismatched documents load partially
#[test]
fn test_partial_load_with_diagnostics() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, r#"{"s":"kept","i":"NaN","m":[1,2]}"#).unwrap();

    let (diag, messages) = Diagnostics::collect();
    let store: Store<Sample> = Store::open(&path, StoreOptions::default().with_diagnostics(diag));

    assert_eq!(store.state(), StoreState::Loaded);
    assert_eq!(store.s, "kept");
    assert_eq!(store.i, 99);
    assert_eq!(store.m, Sample::default().m);
    assert_eq!(messages.lock().len(), 2);
}

/// Pretty output is still valid, loadable JSON
#[test]
fn test_pretty_documents() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");

    let mut store: Store<Sample> = Store::open(&path, StoreOptions::default().with_pretty(true));
    store.m2.entry(3).or_default().insert("c".to_string(), 999);
    store.save().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'));
    assert_eq!(read_json(&path), json!({ "m2": [[3, { "c": 999 }]] }));

    let reopened: Store<Sample> = Store::open(&path, StoreOptions::default());
    assert_eq!(reopened.m2[&3]["c"], 999);
}

/// Bytes that are not UTF-8 are treated like any other corrupt document
#[test]
fn test_save_over_undecodable_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doc.json");
    fs::write(&path, [0xff, 0xfe, 0x7b]).unwrap();

    let (diag, messages) = Diagnostics::collect();
    let mut store: Store<Sample> =
        Store::open(&path, StoreOptions::default().with_diagnostics(diag));
    assert_eq!(store.state(), StoreState::Unloaded);

    store.i = 5;
    assert_eq!(store.save().unwrap(), SaveOutcome::Written);
    assert_eq!(read_json(&path), json!({ "i": 5 }));
    assert_eq!(messages.lock().len(), 2);
}
