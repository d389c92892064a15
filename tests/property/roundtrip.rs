//! Round-trip and default-diffing properties

use proptest::prelude::*;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use treestore::codec::{decode, encode};
use treestore::tree::{resolve, walk, Traversal};
use treestore::{Diagnostics, Node};

#[derive(Debug, Clone, PartialEq)]
struct Knobs {
    enabled: bool,
    name: String,
    level: i64,
    limits: BTreeMap<String, u32>,
    ids: Vec<u64>,
}

impl Default for Knobs {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "knobs".to_string(),
            level: 3,
            limits: [("max".to_string(), 10)].into_iter().collect(),
            ids: vec![1, 2],
        }
    }
}

treestore::record!(Knobs { enabled, name, level, limits, ids });

fn knobs() -> impl Strategy<Value = Knobs> {
    (
        any::<bool>(),
        "[a-z]{0,8}",
        any::<i64>(),
        prop::collection::btree_map("[a-z]{1,4}", any::<u32>(), 0..4),
        prop::collection::vec(any::<u64>(), 0..4),
    )
        .prop_map(|(enabled, name, level, limits, ids)| Knobs {
            enabled,
            name,
            level,
            limits,
            ids,
        })
}

fn round_trip<T: Node + Default>(value: &T) -> T {
    let diag = Diagnostics::new(|msg| panic!("unexpected diagnostic: {}", msg));
    let document = encode(value, false, &diag);
    let mut back = T::default();
    decode(&document, &mut back, &diag).unwrap();
    back
}

proptest! {
    #[test]
    fn prop_sequences_round_trip(v in prop::collection::vec(any::<i32>(), 0..16)) {
        prop_assert_eq!(round_trip(&v), v.clone());

        let d: VecDeque<i32> = v.iter().copied().collect();
        prop_assert_eq!(round_trip(&d), d);

        let s: BTreeSet<i32> = v.into_iter().collect();
        prop_assert_eq!(round_trip(&s), s);
    }

    #[test]
    fn prop_associations_round_trip(
        by_name in prop::collection::hash_map("[ -~]{0,6}", any::<bool>(), 0..8),
        by_id in prop::collection::btree_map(any::<i16>(), "[a-z]{0,4}", 0..8),
    ) {
        let by_name: HashMap<String, bool> = by_name;
        prop_assert_eq!(round_trip(&by_name), by_name);
        prop_assert_eq!(round_trip(&by_id), by_id);
    }

    #[test]
    fn prop_nested_maps_round_trip(
        m in prop::collection::btree_map(
            any::<u8>(),
            prop::collection::btree_map("[a-z]{1,3}", any::<i32>(), 0..3),
            0..5,
        )
    ) {
        prop_assert_eq!(round_trip(&m), m);
    }

    #[test]
    fn prop_records_persist_only_overrides(k in knobs()) {
        let diag = Diagnostics::silent();
        let defaults = Knobs::default();
        let document = encode(&k, true, &diag);
        let object = document.as_object().unwrap();

        prop_assert_eq!(object.contains_key("enabled"), k.enabled != defaults.enabled);
        prop_assert_eq!(object.contains_key("name"), k.name != defaults.name);
        prop_assert_eq!(object.contains_key("level"), k.level != defaults.level);
        prop_assert_eq!(object.contains_key("limits"), k.limits != defaults.limits);
        prop_assert_eq!(object.contains_key("ids"), k.ids != defaults.ids);

        let mut back = Knobs::default();
        decode(&document, &mut back, &diag).unwrap();
        prop_assert_eq!(back, k.clone());

        // The empty document restores any instance to its defaults.
        let mut reset = k;
        decode(&json!({}), &mut reset, &diag).unwrap();
        prop_assert_eq!(reset, defaults);
    }

    #[test]
    fn prop_walked_leaves_resolve(k in knobs()) {
        let mut paths = Vec::new();
        walk(&k, Traversal::Leaves, &mut |path, _| paths.push(path.to_string()));
        for path in paths {
            prop_assert_eq!(resolve(&k, &path, &mut |_| {}), Ok(true));
        }
    }
}
