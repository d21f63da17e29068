//! Stream pipelines, collectors and Optional

use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use valuekit::prelude::*;
use valuekit::stream::{Characteristics, StageKind};

proptest! {
    #[test]
    fn sorted_matches_std_sort(mut items in proptest::collection::vec(any::<i64>(), 0..64)) {
        let sorted = Stream::of(items.clone()).sorted().to_array().unwrap();
        items.sort();
        prop_assert_eq!(sorted, items);
    }

    #[test]
    fn count_after_filter_matches(items in proptest::collection::vec(any::<i32>(), 0..64)) {
        let expected = items.iter().filter(|v| **v % 3 == 0).count() as i64;
        let counted = Stream::of(items).filter(|v| v % 3 == 0).count().unwrap();
        prop_assert_eq!(counted, expected);
    }
}

#[test]
fn test_sorted_to_list() {
    let list = Stream::of(vec![3, 1, 2])
        .sorted()
        .collect(collectors::to_list())
        .unwrap();
    assert_eq!(list.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_every_terminal_rejects_reuse() {
    let mut s = Stream::of(vec![1, 2, 3]);
    s.for_each(|_| {}).unwrap();
    assert!(s.count().unwrap_err().is_illegal_state());
    assert!(s.to_array().unwrap_err().is_illegal_state());
    assert!(s.any_match(|_| true).unwrap_err().is_illegal_state());
    assert!(s.reduce(|a, b| a + b).unwrap_err().is_illegal_state());
    assert!(s.collect(collectors::counting()).unwrap_err().is_illegal_state());
    assert!(s.min(Comparator::natural_order()).unwrap_err().is_illegal_state());
    assert!(s.find_first().unwrap_err().is_illegal_state());
    assert!(s.iterator().is_err());
}

#[test]
fn test_optional_absent_map() {
    let result = Optional::<i32>::of_nullable(None).map(|v| v * 100).or_else(-1);
    assert_eq!(result, -1);
}

#[test]
fn test_infinite_generate_with_limit() {
    let pulls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulls);
    let out = Stream::generate(move || {
        counter.set(counter.get() + 1);
        counter.get()
    })
    .limit(5)
    .sorted_by(Comparator::reverse_order())
    .to_array()
    .unwrap();
    assert_eq!(out, vec![5, 4, 3, 2, 1]);
    assert_eq!(pulls.get(), 5);
}

#[test]
fn test_short_circuit_on_infinite_source() {
    let found = Stream::iterate(1i64, |x| x + 1).any_match(|x| *x == 1_000).unwrap();
    assert!(found);
    let first_big = Stream::iterate(1i64, |x| x * 3)
        .filter(|x| *x > 100)
        .find_first()
        .unwrap();
    assert_eq!(first_big, Optional::of(243));
}

#[test]
fn test_grouping_and_partitioning() {
    let words = vec!["apple", "avocado", "banana", "blueberry", "cherry"];
    let groups = Stream::of(words.clone())
        .collect(collectors::grouping_by(|w: &&str| w.chars().next().unwrap_or(' '), collectors::counting()))
        .unwrap();
    assert_eq!(groups.get(&'a'), Some(&2));
    assert_eq!(groups.get(&'c'), Some(&1));

    let parts = Stream::of(words)
        .collect(collectors::partitioning_by_as_lists(|w: &&str| w.len() > 6))
        .unwrap();
    assert_eq!(parts.get(&true).map(|l| l.size()), Some(2));
    assert_eq!(parts.get(&false).map(|l| l.size()), Some(3));
}

#[test]
fn test_to_map_uniquely_rejects_duplicates() {
    let err = Stream::of(vec!["a", "bb", "cc"])
        .collect(collectors::to_map_uniquely(|w: &&str| w.len(), |w: &'static str| w))
        .unwrap_err();
    assert!(err.is_illegal_state());
}

#[test]
fn test_collection_sources() {
    let set: Set<i32> = vec![3, 1, 3, 2].into_iter().collect();
    let total = set.stream().reduce_with_identity(0, |a, b| a + b).unwrap();
    assert_eq!(total, 6);
    let joined = List::from(vec![1, 2, 3])
        .stream()
        .map(|v| v * 2)
        .collect(collectors::joining_with_affixes(", ", "[", "]"))
        .unwrap();
    assert_eq!(joined, "[2, 4, 6]");
}

#[test]
fn test_stage_descriptors() {
    let s = Stream::of(vec![1, 2, 2, 3]).distinct().skip(1).peek(|_| {});
    assert_eq!(
        s.stage_kinds(),
        &[StageKind::Distinct, StageKind::Skip, StageKind::Peek]
    );
}

#[test]
fn test_collector_characteristics() {
    assert!(collectors::to_set::<i32>()
        .characteristics()
        .contains(Characteristics::UNORDERED));
    assert!(!collectors::joining::<i32>()
        .characteristics()
        .contains(Characteristics::IDENTITY_FINISH));
}
