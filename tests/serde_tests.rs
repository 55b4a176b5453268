#![cfg(feature = "serde")]

//! Integration tests for serde support in weft.
//!
//! Lists, maps and values serialize to JSON for an encoder collaborator;
//! lists also deserialize.

use rstest::rstest;
use serde_json::json;
use weft::persistent::{HashedMap, PList};
use weft::value::{Handle, Value, ValueMap};

// =============================================================================
// PList Integration Tests
// =============================================================================

#[rstest]
fn test_list_json_roundtrip() {
    let list = PList::cons_from([1, 2]).append([3, 4]).add([0]);
    let json = serde_json::to_string(&list).unwrap();
    let restored: PList<i32> = serde_json::from_str(&json).unwrap();

    assert_eq!(json, "[0,1,2,3,4]");
    assert_eq!(list, restored);
}

#[rstest]
fn test_list_nested_structures() {
    let inner1: PList<i32> = (1..=3).collect();
    let inner2 = PList::empty().append([4, 5, 6]);
    let outer = PList::cons_from([inner1, inner2]);

    let json = serde_json::to_string(&outer).unwrap();
    let restored: PList<PList<i32>> = serde_json::from_str(&json).unwrap();

    assert_eq!(outer, restored);
}

#[rstest]
fn test_list_rejects_non_sequence() {
    let result: Result<PList<i32>, _> = serde_json::from_str("{\"a\": 1}");
    assert!(result.is_err());
}

// =============================================================================
// HashedMap Integration Tests
// =============================================================================

#[rstest]
fn test_map_serializes_live_entries_only() {
    let map: HashedMap<String, i32> = HashedMap::from_pairs([
        ("a".to_string(), 1),
        ("b".to_string(), 2),
        ("c".to_string(), 3),
    ])
    .unwrap();
    let map = map.del(&"b".to_string()).unwrap();

    let encoded = serde_json::to_value(&map).unwrap();

    assert_eq!(encoded, json!({"a": 1, "c": 3}));
}

// =============================================================================
// Value Integration Tests
// =============================================================================

#[rstest]
fn test_value_tree_to_json() {
    let tags = PList::cons_from([Value::from("x"), Value::from(true)]);
    let record = ValueMap::new()
        .put(Value::from("id"), Value::from(7))
        .and_then(|map| map.put(Value::from("score"), Value::from(0.5)))
        .and_then(|map| map.put(Value::from("tags"), Value::from(tags)))
        .unwrap();

    let encoded = serde_json::to_value(Value::from(record)).unwrap();

    assert_eq!(encoded, json!({"id": 7, "score": 0.5, "tags": ["x", true]}));
}

#[rstest]
fn test_value_with_function_fails_to_serialize() {
    let list = PList::cons_from([Value::from(1), Value::Function(Handle::new("function", 1))]);
    let error = serde_json::to_string(&Value::from(list)).unwrap_err();

    assert!(error.to_string().contains("cannot serialize function value"));
}
