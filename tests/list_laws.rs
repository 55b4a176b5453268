//! Property-based tests for PList.
//!
//! These tests build lists through arbitrary mixes of `add` and `append`
//! and check them against a `VecDeque` model.

use std::collections::VecDeque;

use proptest::prelude::*;
use weft::persistent::{PList, StdOracle};

#[derive(Clone, Debug)]
enum Step {
    Add(Vec<i32>),
    Append(Vec<i32>),
    Rest,
    Reverse,
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    let values = || prop::collection::vec(any::<i32>(), 0..4);
    let step = prop_oneof![
        values().prop_map(Step::Add),
        values().prop_map(Step::Append),
        Just(Step::Rest),
        Just(Step::Reverse),
    ];
    prop::collection::vec(step, 0..40)
}

fn build(steps: &[Step]) -> (PList<i32>, VecDeque<i32>) {
    let mut list = PList::empty();
    let mut model = VecDeque::new();
    for step in steps {
        match step {
            Step::Add(values) => {
                list = list.add(values.iter().copied());
                for value in values.iter().rev() {
                    model.push_front(*value);
                }
            }
            Step::Append(values) => {
                list = list.append(values.iter().copied());
                model.extend(values.iter().copied());
            }
            Step::Rest => {
                if let Ok(rest) = list.rest() {
                    list = rest;
                    model.pop_front();
                }
            }
            Step::Reverse => {
                list = list.reverse();
                model = model.into_iter().rev().collect();
            }
        }
    }
    (list, model)
}

proptest! {
    #[test]
    fn prop_matches_model(steps in steps()) {
        let (list, model) = build(&steps);
        prop_assert_eq!(list.len(), model.len());
        prop_assert_eq!(list.to_vec(), model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(list.head().ok(), model.front());
        prop_assert_eq!(list.last().ok(), model.back());
    }

    #[test]
    fn prop_iterate_then_cons_from_round_trips(steps in steps()) {
        let (list, _) = build(&steps);
        let rebuilt = PList::cons_from(list.iterate().copied());
        prop_assert_eq!(rebuilt.deep_equal(&list, &StdOracle), Ok(true));
    }

    #[test]
    fn prop_iterate_is_repeatable(steps in steps()) {
        let (list, _) = build(&steps);
        let first: Vec<i32> = list.iterate().copied().collect();
        let second: Vec<i32> = list.iterate().copied().collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_append_does_not_interfere(steps in steps(), extra in prop::collection::vec(any::<i32>(), 1..4)) {
        let (list, _) = build(&steps);
        let head = list.head().ok().copied();
        let last = list.last().ok().copied();
        let items = list.to_vec();

        let longer = list.append(extra.iter().copied());

        prop_assert_eq!(list.head().ok().copied(), head);
        prop_assert_eq!(list.last().ok().copied(), last);
        prop_assert_eq!(list.to_vec(), items);
        prop_assert_eq!(longer.len(), list.len() + extra.len());
        prop_assert_eq!(longer.last().ok(), extra.last());
    }

    #[test]
    fn prop_reverse_is_involutive(steps in steps()) {
        let (list, _) = build(&steps);
        prop_assert_eq!(list.reverse().reverse(), list);
    }

    #[test]
    fn prop_extend_concatenates(left in steps(), right in steps()) {
        let (left, left_model) = build(&left);
        let (right, right_model) = build(&right);

        let joined = left.extend([&right]);

        let expected: Vec<i32> = left_model.into_iter().chain(right_model).collect();
        prop_assert_eq!(joined.to_vec(), expected);
        prop_assert_eq!(joined.len(), left.len() + right.len());
    }
}
