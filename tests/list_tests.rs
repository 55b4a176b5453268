//! Integration tests for PList.

use rstest::rstest;
use weft::CoreError;
use weft::persistent::{PList, StdOracle};

// =============================================================================
// Literal Scenarios
// =============================================================================

#[rstest]
fn test_append_scenario() {
    let l1 = PList::cons_from([1, 2, 3]);
    let l2 = l1.append([4, 5]);

    assert_eq!(l2.head(), Ok(&1));
    assert_eq!(l2.last(), Ok(&5));
    assert_eq!(l1.last(), Ok(&3));
}

#[rstest]
fn test_add_scenario() {
    let l1 = PList::cons_from([1, 2, 3]);
    let l3 = l1.add([0]);

    assert_eq!(l3.head(), Ok(&0));
    assert_eq!(l3.rest().unwrap().deep_equal(&l1, &StdOracle), Ok(true));
}

// =============================================================================
// Empty List
// =============================================================================

#[rstest]
#[case::head("head")]
#[case::last("last")]
#[case::rest("rest")]
fn test_empty_list_operations_fail(#[case] operation: &'static str) {
    let list: PList<i32> = PList::empty();
    let error = match operation {
        "head" => list.head().err(),
        "last" => list.last().err(),
        _ => list.rest().err(),
    };
    assert_eq!(error, Some(CoreError::EmptyCollection { operation }));
}

#[rstest]
fn test_draining_with_rest_reaches_empty() {
    let mut list = PList::cons_from([1, 2]).append([3, 4]);
    let mut drained = Vec::new();
    while let Ok(head) = list.head() {
        drained.push(*head);
        list = list.rest().unwrap();
    }
    assert_eq!(drained, vec![1, 2, 3, 4]);
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
}

// =============================================================================
// Length In Every Representation State
// =============================================================================

#[rstest]
#[case::neither(PList::empty(), vec![])]
#[case::head_only(PList::cons_from([1, 2]), vec![1, 2])]
#[case::tail_only(PList::empty().append([1, 2, 3]), vec![1, 2, 3])]
#[case::both(PList::cons_from([1]).append([2, 3]).add([0]), vec![0, 1, 2, 3])]
#[case::reversed(PList::cons_from([1]).append([2, 3]).reverse(), vec![3, 2, 1])]
fn test_len_and_order(#[case] list: PList<i32>, #[case] expected: Vec<i32>) {
    assert_eq!(list.len(), expected.len());
    assert_eq!(list.to_vec(), expected);
    assert_eq!(list.len(), expected.len());
}

// =============================================================================
// Non-interference
// =============================================================================

#[rstest]
fn test_three_generations_stay_independent() {
    let a = PList::cons_from([1]);
    let b = a.append([2]);
    let a_items = a.to_vec();
    let b_items = b.to_vec();

    let c = b.append([3]);
    let c_prime = b.add([0]);
    let d = c.append([4]);

    assert_eq!(a.to_vec(), a_items);
    assert_eq!(b.to_vec(), b_items);
    assert_eq!(c.to_vec(), vec![1, 2, 3]);
    assert_eq!(c_prime.to_vec(), vec![0, 1, 2]);
    assert_eq!(d.to_vec(), vec![1, 2, 3, 4]);
    assert_eq!(b.last(), Ok(&2));
    assert_eq!(a.head(), Ok(&1));
}

#[rstest]
fn test_iterate_restarts_from_the_beginning() {
    let list = PList::cons_from(["a"]).append(["b", "c"]);
    let mut iterator = list.iterate();
    assert_eq!(iterator.next(), Some(&"a"));

    let fresh: Vec<&&str> = list.iterate().collect();
    assert_eq!(fresh, vec![&"a", &"b", &"c"]);
    assert_eq!(iterator.collect::<Vec<_>>(), vec![&"b", &"c"]);
}

// =============================================================================
// Concatenation
// =============================================================================

#[rstest]
fn test_extend_with_mixed_representations() {
    let head_only = PList::cons_from([1, 2]);
    let tail_only = PList::empty().append([3, 4]);
    let both = PList::cons_from([6]).append([7]).add([5]);

    let joined = head_only.extend([&tail_only, &both]);

    assert_eq!(joined.to_vec(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(joined.len(), 7);
    assert_eq!(joined.last(), Ok(&7));
    assert_eq!(head_only.to_vec(), vec![1, 2]);
}

#[rstest]
fn test_collect_and_into_iter() {
    let list: PList<i32> = (1..=3).collect();
    let doubled: Vec<i32> = list.clone().into_iter().map(|value| value * 2).collect();

    assert_eq!(doubled, vec![2, 4, 6]);
    assert_eq!(list, PList::empty().append([1, 2, 3]));
    assert_eq!(list.iterate().len(), 3);
}
