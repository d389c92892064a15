//! Shared fixtures for integration tests
//!
//! `Sample` mirrors a typical application record: scalars, an embedded JSON
//! fragment, a string-keyed map and a foreign-keyed map of maps.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use treestore::Diagnostics;

/// Serialises tests that touch process environment variables.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub b: bool,
    pub s: String,
    pub i: i32,
    pub j: Value,
    pub m: BTreeMap<String, i32>,
    pub m2: BTreeMap<u32, BTreeMap<String, i32>>,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            b: true,
            s: "string".to_string(),
            i: 99,
            j: json!({ "word": "foo", "list": [1, 2, 3] }),
            m: [("x".to_string(), 11), ("y".to_string(), 22)].into_iter().collect(),
            m2: BTreeMap::new(),
        }
    }
}

treestore::record!(Sample { b, s, i, j, m, m2 });

/// Diagnostics that fail the test on any report.
pub fn strict() -> Diagnostics {
    Diagnostics::new(|msg| panic!("unexpected diagnostic: {}", msg))
}
