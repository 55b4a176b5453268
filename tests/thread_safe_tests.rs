//! Integration tests for sharing persistent values across threads.
//!
//! These tests run with the `arc` feature enabled, where every node is held
//! behind `Arc`.

#![cfg(feature = "arc")]

use rstest::rstest;
use std::sync::Arc;
use std::thread;
use weft::persistent::{HashedMap, PList};
use weft::value::{Value, ValueMap};

// =============================================================================
// PList
// =============================================================================

#[rstest]
fn test_list_cross_thread_structural_sharing() {
    let original = Arc::new(PList::cons_from([1, 2, 3]));

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let list = Arc::clone(&original);
            thread::spawn(move || {
                let extended = list.append([index * 10]);
                assert_eq!(extended.last(), Ok(&(index * 10)));
                assert_eq!(extended.len(), 4);
                assert_eq!(list.len(), 3);
                extended
            })
        })
        .collect();

    let results: Vec<PList<i32>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (index, list) in (0..).zip(&results) {
        assert_eq!(list.to_vec(), vec![1, 2, 3, index * 10]);
    }
    assert_eq!(original.last(), Ok(&3));
}

#[rstest]
fn test_list_canonicalized_concurrently() {
    let list = PList::cons_from([1]).append([2, 3, 4]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let list = list.clone();
            thread::spawn(move || list.to_vec())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("Thread panicked"), vec![1, 2, 3, 4]);
    }
}

// =============================================================================
// HashedMap
// =============================================================================

#[rstest]
fn test_map_versions_derived_in_parallel() {
    let base: HashedMap<i64, i64> = HashedMap::from_pairs((0..100).map(|key| (key, key))).unwrap();

    let handles: Vec<_> = (0..4_i64)
        .map(|index| {
            let map = base.clone();
            thread::spawn(move || {
                let derived = map.del(&index).unwrap().put(1000 + index, index).unwrap();
                assert_eq!(map.get(&index), Ok(&index));
                derived
            })
        })
        .collect();

    for (index, handle) in (0..4_i64).zip(handles) {
        let derived = handle.join().expect("Thread panicked");
        assert_eq!(derived.len(), 100);
        assert!(derived.get(&index).is_err());
        assert_eq!(derived.get(&(1000 + index)), Ok(&index));
    }
    assert_eq!(base.len(), 100);
}

#[rstest]
fn test_value_map_sent_between_threads() {
    let map = ValueMap::new()
        .put(Value::from("shared"), Value::from(PList::cons_from([Value::from(1)])))
        .unwrap();

    let handle = thread::spawn(move || map.get(&Value::from("shared")).cloned());

    let value = handle.join().expect("Thread panicked").unwrap();
    assert_eq!(value, Value::from(PList::cons_from([Value::from(1)])));
}
