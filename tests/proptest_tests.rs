// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests use property-based testing to verify that the store handles
//! arbitrary paths and value trees correctly.

use immutmem::domain::{ConfigError, ConfigPath, ConfigStore, Mapping, Value};
use immutmem::service::PersistentStore;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

fn path_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..5)
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "\\PC{0,8}".prop_map(Value::from),
    ]
}

fn value_tree() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4).prop_map(Value::Mapping),
        ]
    })
}

fn mapping_tree() -> impl Strategy<Value = Mapping> {
    prop::collection::btree_map("[a-z]{1,3}", value_tree(), 0..5)
}

// Reference deep merge: mappings merge key-wise, anything else is replaced.
fn merged(base: &Value, patch: &Value) -> Value {
    match (base, patch) {
        (Value::Mapping(base), Value::Mapping(patch)) => {
            let mut out = base.clone();
            for (key, incoming) in patch {
                let next = match out.get(key) {
                    Some(existing) => merged(existing, incoming),
                    None => incoming.clone(),
                };
                out.insert(key.clone(), next);
            }
            Value::Mapping(out)
        }
        _ => patch.clone(),
    }
}

// Test that any colon-joined list of non-empty segments parses back into the same segments
proptest! {
    #[test]
    fn test_config_path_round_trip(segments in path_segments()) {
        let key = segments.join(":");
        let path = ConfigPath::parse(&key).unwrap();
        prop_assert_eq!(path.segments(), segments.as_slice());
        prop_assert_eq!(path.as_str(), key.as_str());
        prop_assert_eq!(path.depth(), segments.len());
    }
}

// Test that a key containing an empty segment is always rejected
proptest! {
    #[test]
    fn test_config_path_rejects_empty_segments(
        segments in path_segments(),
        position in 0usize..5,
    ) {
        let mut segments = segments;
        let at = position.min(segments.len());
        segments.insert(at, String::new());
        let key = segments.join(":");

        let is_invalid_key = matches!(ConfigPath::parse(&key), Err(ConfigError::InvalidKey { .. }));
        prop_assert!(is_invalid_key);

        let store = PersistentStore::new();
        prop_assert!(store.set(&key, Value::from(1)).is_err());
        prop_assert!(store.is_empty());
    }
}

// Test that whatever is set can be read back unchanged
proptest! {
    #[test]
    fn test_set_then_get_round_trip(segments in path_segments(), value in value_tree()) {
        let store = PersistentStore::new();
        let key = segments.join(":");

        store.set(&key, value.clone()).unwrap();
        prop_assert_eq!(store.get(&key).unwrap(), Some(value));
    }
}

// Test that mutating a retrieved value never reaches the store
proptest! {
    #[test]
    fn test_retrieved_values_are_isolated(entries in mapping_tree(), replacement in value_tree()) {
        let store = PersistentStore::new();
        store.load_mapping(entries.clone());

        for key in entries.keys() {
            let mut copy = store.get(key).unwrap().unwrap();
            match &mut copy {
                Value::Mapping(map) => {
                    map.insert("injected".to_string(), replacement.clone());
                }
                Value::Sequence(items) => items.push(replacement.clone()),
                other => *other = replacement.clone(),
            }
            let got = store.get(key).unwrap();
            prop_assert_eq!(got.as_ref(), entries.get(key));
        }
    }
}

// Test that repeating the same set leaves the observable tree unchanged
proptest! {
    #[test]
    fn test_set_is_idempotent(
        entries in mapping_tree(),
        segments in path_segments(),
        value in value_tree(),
    ) {
        let store = PersistentStore::new();
        store.load_mapping(entries);
        let key = segments.join(":");

        store.set(&key, value.clone()).unwrap();
        let once = store.to_value();
        store.set(&key, value).unwrap();
        prop_assert_eq!(store.to_value(), once);
    }
}

// Test that a set never disturbs other top-level entries
proptest! {
    #[test]
    fn test_set_preserves_siblings(
        entries in mapping_tree(),
        segments in path_segments(),
        value in value_tree(),
    ) {
        let store = PersistentStore::new();
        store.load_mapping(entries.clone());

        store.set(&segments.join(":"), value).unwrap();

        for (key, expected) in entries.iter().filter(|(k, _)| **k != segments[0]) {
            let got = store.get(key).unwrap();
            prop_assert_eq!(got.as_ref(), Some(expected));
        }
    }
}

// Test that extend follows the deep-merge policy
proptest! {
    #[test]
    fn test_extend_matches_reference_merge(
        base in mapping_tree(),
        patch in mapping_tree(),
        segments in path_segments(),
    ) {
        let store = PersistentStore::new();
        let key = segments.join(":");
        store.set(&key, Value::Mapping(base.clone())).unwrap();

        store.extend(&key, Value::Mapping(patch.clone())).unwrap();

        let expected = merged(&Value::Mapping(base), &Value::Mapping(patch));
        prop_assert_eq!(store.get(&key).unwrap(), Some(expected));
    }
}

// Test that non-mapping extend arguments are always rejected
proptest! {
    #[test]
    fn test_extend_rejects_non_mappings(entries in mapping_tree(), value in value_tree()) {
        prop_assume!(!value.is_mapping());

        let store = PersistentStore::new();
        store.load_mapping(entries);
        let before = store.snapshot();

        for key in before.keys() {
            prop_assert!(store.extend(&key, value.clone()).is_err());
        }
        prop_assert_eq!(store.version(), before.version());
        prop_assert_eq!(store.to_value(), before.to_value());
    }
}

// Test that a snapshot keeps reading its own version while the store moves on
proptest! {
    #[test]
    fn test_snapshot_is_stable(
        entries in mapping_tree(),
        writes in prop::collection::vec((path_segments(), value_tree()), 1..6),
    ) {
        let store = PersistentStore::new();
        store.load_mapping(entries.clone());
        let snapshot = store.snapshot();

        for (segments, value) in writes {
            store.set(&segments.join(":"), value).unwrap();
        }

        prop_assert_eq!(snapshot.to_value(), Value::Mapping(entries));
    }
}
