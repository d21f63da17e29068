//! Ready-made collectors
//!
//! Grouping and partitioning collectors delegate each group to a
//! downstream collector, so `grouping_by(f, counting())` counts per key and
//! `grouping_by(f, to_list())` lists per key.

use crate::collector::{Characteristics, Collector};
use crate::functional;
use crate::optional::Optional;
use std::fmt;
use valuekit_collections::{Collection, Comparator, List, Map, Set};
use valuekit_core::{Error, Identity, Result};

/// Collect into a [`List`] in encounter order
pub fn to_list<T: 'static>() -> Collector<T, List<T>, List<T>> {
    Collector::of(
        List::new,
        |list: &mut List<T>, t: T| list.add(t),
        |mut left, right| {
            left.extend(right);
            left
        },
        Characteristics::empty(),
    )
}

/// Collect into a [`Set`]; later duplicates are dropped
pub fn to_set<T: Identity + 'static>() -> Collector<T, Set<T>, Set<T>> {
    Collector::of(
        Set::new,
        |set: &mut Set<T>, t: T| {
            set.add(t);
        },
        |mut left, right| {
            left.extend(right);
            left
        },
        Characteristics::UNORDERED,
    )
}

/// Collect into a collection made by `supplier`
pub fn to_collection<T, C>(supplier: impl Fn() -> C + 'static) -> Collector<T, C, C>
where
    T: 'static,
    C: Collection<T> + IntoIterator<Item = T> + 'static,
{
    Collector::of(
        supplier,
        |c: &mut C, t: T| {
            c.add(t);
        },
        |mut left, right| {
            left.add_all(right);
            left
        },
        Characteristics::empty(),
    )
}

/// Concatenate the elements' text
pub fn joining<T: fmt::Display + 'static>() -> Collector<T, Vec<String>, String> {
    joining_with_affixes("", "", "")
}

/// Concatenate the elements' text separated by `delimiter`
pub fn joining_with<T: fmt::Display + 'static>(
    delimiter: &str,
) -> Collector<T, Vec<String>, String> {
    joining_with_affixes(delimiter, "", "")
}

/// `prefix` + elements separated by `delimiter` + `suffix`
pub fn joining_with_affixes<T: fmt::Display + 'static>(
    delimiter: &str,
    prefix: &str,
    suffix: &str,
) -> Collector<T, Vec<String>, String> {
    let delimiter = delimiter.to_string();
    let prefix = prefix.to_string();
    let suffix = suffix.to_string();
    Collector::of_with_finisher(
        Vec::new,
        |parts: &mut Vec<String>, t: T| parts.push(t.to_string()),
        |mut left, right| {
            left.extend(right);
            left
        },
        move |parts| format!("{}{}{}", prefix, parts.join(&delimiter), suffix),
        Characteristics::empty(),
    )
}

/// Number of elements
pub fn counting<T: 'static>() -> Collector<T, i64, i64> {
    Collector::of(
        || 0,
        |count: &mut i64, _t: T| *count = count.wrapping_add(1),
        |a, b| a.wrapping_add(b),
        Characteristics::UNORDERED,
    )
}

fn reduce_optional<T: 'static>(
    op: impl Fn(T, T) -> T + 'static,
) -> Collector<T, Option<T>, Optional<T>> {
    let op = std::rc::Rc::new(op);
    let combine_op = std::rc::Rc::clone(&op);
    Collector::of_with_finisher(
        || None,
        move |acc: &mut Option<T>, t: T| {
            *acc = Some(match acc.take() {
                Some(current) => op(current, t),
                None => t,
            });
        },
        move |left, right| match (left, right) {
            (Some(a), Some(b)) => Some(combine_op(a, b)),
            (a, None) => a,
            (None, b) => b,
        },
        Optional::of_nullable,
        Characteristics::empty(),
    )
}

/// Smallest element under `comparator`; the first one wins ties
pub fn min_by<T: 'static>(comparator: Comparator<T>) -> Collector<T, Option<T>, Optional<T>> {
    reduce_optional(functional::min_by(comparator))
}

/// Largest element under `comparator`; the first one wins ties
pub fn max_by<T: 'static>(comparator: Comparator<T>) -> Collector<T, Option<T>, Optional<T>> {
    reduce_optional(functional::max_by(comparator))
}

/// Map each element with `mapper` before handing it to `downstream`
pub fn mapping<T, U, A, R>(
    mapper: impl Fn(T) -> U + 'static,
    downstream: Collector<U, A, R>,
) -> Collector<T, A, R>
where
    T: 'static,
    U: 'static,
    A: 'static,
    R: 'static,
{
    downstream.contramap(mapper)
}

/// Apply `finisher` to the result of `downstream`
pub fn collecting_and_then<T, A, R, RR>(
    downstream: Collector<T, A, R>,
    finisher: impl Fn(R) -> RR + 'static,
) -> Collector<T, A, RR>
where
    T: 'static,
    A: 'static,
    R: 'static,
    RR: 'static,
{
    downstream.and_then(finisher)
}

// ============================================================================
// Grouping and partitioning
// ============================================================================

fn merge_groups<K, T, A, R>(
    downstream: &Collector<T, A, R>,
    mut left: Map<K, A>,
    right: Map<K, A>,
) -> Result<Map<K, A>>
where
    K: Identity,
    T: 'static,
    A: 'static,
    R: 'static,
{
    for (key, container) in right {
        let merged = match left.remove(&key) {
            Some(existing) => downstream.combine(existing, container)?,
            None => container,
        };
        left.put(key, merged);
    }
    Ok(left)
}

fn grouping_into<T, K, A, R>(
    classifier: impl Fn(&T) -> K + 'static,
    map_factory: impl Fn() -> Map<K, R> + 'static,
    downstream: Collector<T, A, R>,
) -> Collector<T, Map<K, A>, Map<K, R>>
where
    T: 'static,
    K: Identity + 'static,
    A: 'static,
    R: 'static,
{
    let accumulate_with = downstream.clone();
    let combine_with = downstream.clone();
    Collector::try_of(
        Map::new,
        move |groups: &mut Map<K, A>, t: T| -> Result<()> {
            let container = groups.compute_if_absent(classifier(&t), |_| accumulate_with.supply());
            accumulate_with.accumulate(container, t)
        },
        move |left, right| merge_groups(&combine_with, left, right),
        move |groups| {
            let mut out = map_factory();
            for (key, container) in groups {
                out.put(key, downstream.finish(container));
            }
            out
        },
        Characteristics::empty(),
    )
}

/// Group by `classifier`, reducing each group with `downstream`
pub fn grouping_by<T, K, A, R>(
    classifier: impl Fn(&T) -> K + 'static,
    downstream: Collector<T, A, R>,
) -> Collector<T, Map<K, A>, Map<K, R>>
where
    T: 'static,
    K: Identity + 'static,
    A: 'static,
    R: 'static,
{
    grouping_into(classifier, Map::new, downstream)
}

/// Group by `classifier` into lists
pub fn grouping_by_as_lists<T, K>(
    classifier: impl Fn(&T) -> K + 'static,
) -> Collector<T, Map<K, List<T>>, Map<K, List<T>>>
where
    T: 'static,
    K: Identity + 'static,
{
    grouping_by(classifier, to_list())
}

/// Group by `classifier` into a map made by `map_factory`
pub fn grouping_by_to_map<T, K, A, R>(
    classifier: impl Fn(&T) -> K + 'static,
    map_factory: impl Fn() -> Map<K, R> + 'static,
    downstream: Collector<T, A, R>,
) -> Collector<T, Map<K, A>, Map<K, R>>
where
    T: 'static,
    K: Identity + 'static,
    A: 'static,
    R: 'static,
{
    grouping_into(classifier, map_factory, downstream)
}

/// Split by `predicate`; the result always holds both `false` and `true`
pub fn partitioning_by<T, A, R>(
    predicate: impl Fn(&T) -> bool + 'static,
    downstream: Collector<T, A, R>,
) -> Collector<T, Map<bool, A>, Map<bool, R>>
where
    T: 'static,
    A: 'static,
    R: 'static,
{
    let supply_with = downstream.clone();
    let accumulate_with = downstream.clone();
    let combine_with = downstream.clone();
    Collector::try_of(
        move || {
            let mut parts = Map::with_capacity(2);
            parts.put(false, supply_with.supply());
            parts.put(true, supply_with.supply());
            parts
        },
        move |parts: &mut Map<bool, A>, t: T| -> Result<()> {
            let container = parts.compute_if_absent(predicate(&t), |_| accumulate_with.supply());
            accumulate_with.accumulate(container, t)
        },
        move |left, right| merge_groups(&combine_with, left, right),
        move |parts| {
            parts
                .into_iter()
                .map(|(key, container)| (key, downstream.finish(container)))
                .collect()
        },
        Characteristics::empty(),
    )
}

/// Split by `predicate` into lists
pub fn partitioning_by_as_lists<T: 'static>(
    predicate: impl Fn(&T) -> bool + 'static,
) -> Collector<T, Map<bool, List<T>>, Map<bool, List<T>>> {
    partitioning_by(predicate, to_list())
}

// ============================================================================
// Maps
// ============================================================================

fn to_map_into<T, K, U>(
    key_mapper: impl Fn(&T) -> K + 'static,
    value_mapper: impl Fn(T) -> U + 'static,
    merge: impl Fn(U, U) -> U + 'static,
    map_supplier: impl Fn() -> Map<K, U> + 'static,
) -> Collector<T, Map<K, U>, Map<K, U>>
where
    T: 'static,
    K: Identity + 'static,
    U: 'static,
{
    let merge = std::rc::Rc::new(merge);
    let combine_merge = std::rc::Rc::clone(&merge);
    Collector::of(
        map_supplier,
        move |map: &mut Map<K, U>, t: T| {
            let key = key_mapper(&t);
            map.merge(key, value_mapper(t), |a, b| merge(a, b));
        },
        move |mut left, right| {
            for (key, value) in right {
                left.merge(key, value, |a, b| combine_merge(a, b));
            }
            left
        },
        Characteristics::empty(),
    )
}

/// Map each element to a key and value; `merge` resolves duplicate keys
pub fn to_map<T, K, U>(
    key_mapper: impl Fn(&T) -> K + 'static,
    value_mapper: impl Fn(T) -> U + 'static,
    merge: impl Fn(U, U) -> U + 'static,
) -> Collector<T, Map<K, U>, Map<K, U>>
where
    T: 'static,
    K: Identity + 'static,
    U: 'static,
{
    to_map_into(key_mapper, value_mapper, merge, Map::new)
}

/// Like [`to_map`], collecting into a map made by `map_supplier`
pub fn to_map_supplied_by<T, K, U>(
    key_mapper: impl Fn(&T) -> K + 'static,
    value_mapper: impl Fn(T) -> U + 'static,
    merge: impl Fn(U, U) -> U + 'static,
    map_supplier: impl Fn() -> Map<K, U> + 'static,
) -> Collector<T, Map<K, U>, Map<K, U>>
where
    T: 'static,
    K: Identity + 'static,
    U: 'static,
{
    to_map_into(key_mapper, value_mapper, merge, map_supplier)
}

fn put_unique<K: Identity + fmt::Display, U>(map: &mut Map<K, U>, key: K, value: U) -> Result<()> {
    if map.contains_key(&key) {
        return Err(Error::illegal_state(format!("Duplicate key {}", key)));
    }
    map.put(key, value);
    Ok(())
}

/// Map each element to a key and value; a repeated key fails with
/// `IllegalState` ("Duplicate key k")
pub fn to_map_uniquely<T, K, U>(
    key_mapper: impl Fn(&T) -> K + 'static,
    value_mapper: impl Fn(T) -> U + 'static,
) -> Collector<T, Map<K, U>, Map<K, U>>
where
    T: 'static,
    K: Identity + fmt::Display + 'static,
    U: 'static,
{
    Collector::try_of(
        Map::new,
        move |map: &mut Map<K, U>, t: T| -> Result<()> {
            let key = key_mapper(&t);
            put_unique(map, key, value_mapper(t))
        },
        |mut left, right| -> Result<Map<K, U>> {
            for (key, value) in right {
                put_unique(&mut left, key, value)?;
            }
            Ok(left)
        },
        |map| map,
        Characteristics::IDENTITY_FINISH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<&'static str> {
        vec!["apple", "avocado", "banana", "blueberry", "cherry"]
    }

    #[test]
    fn test_to_list_and_to_set() {
        assert_eq!(to_list().collect_from(vec![3, 1, 3]).unwrap().as_slice(), &[3, 1, 3]);
        assert_eq!(to_set().collect_from(vec![3, 1, 3]).unwrap().size(), 2);
    }

    #[test]
    fn test_to_collection() {
        let stack = to_collection(valuekit_collections::Stack::new)
            .collect_from(vec![1, 2, 3])
            .unwrap();
        assert_eq!(*stack.peek().unwrap(), 3);
    }

    #[test]
    fn test_joining_variants() {
        assert_eq!(joining().collect_from(vec!["a", "b"]).unwrap(), "ab");
        assert_eq!(joining_with(", ").collect_from(vec![1, 2, 3]).unwrap(), "1, 2, 3");
        assert_eq!(
            joining_with_affixes("|", "<", ">").collect_from(Vec::<i32>::new()).unwrap(),
            "<>"
        );
    }

    #[test]
    fn test_counting_and_min_max() {
        assert_eq!(counting().collect_from(words()).unwrap(), 5);
        let by_len = Comparator::comparing(|s: &&str| s.len() as i32);
        assert_eq!(min_by(by_len.clone()).collect_from(words()).unwrap(), Optional::of("apple"));
        assert_eq!(max_by(by_len.clone()).collect_from(words()).unwrap(), Optional::of("blueberry"));
        assert!(min_by(by_len).collect_from(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_grouping_by_counts() {
        let groups = grouping_by(|w: &&str| w.chars().next().unwrap_or(' '), counting())
            .collect_from(words())
            .unwrap();
        assert_eq!(groups.get(&'a'), Some(&2));
        assert_eq!(groups.get(&'b'), Some(&2));
        assert_eq!(groups.get(&'c'), Some(&1));
        assert_eq!(groups.to_string(), "{a=2, b=2, c=1}");
    }

    #[test]
    fn test_grouping_by_as_lists_and_mapping() {
        let groups = grouping_by_as_lists(|n: &i32| n % 3).collect_from(1..=7).unwrap();
        assert_eq!(groups.get(&1).map(|l| l.to_string()), Some("[1, 4, 7]".to_string()));
        let lengths = grouping_by(
            |w: &&str| w.len() > 5,
            mapping(|w: &str| w.len() as i64, to_list()),
        )
        .collect_from(words())
        .unwrap();
        assert_eq!(lengths.get(&false).map(|l| l.to_string()), Some("[5]".to_string()));
    }

    #[test]
    fn test_grouping_by_to_map_uses_factory() {
        let groups = grouping_by_to_map(
            |n: &i32| n % 2 == 0,
            || {
                let mut m = Map::new();
                m.put(true, 0);
                m
            },
            counting(),
        )
        .collect_from(vec![1, 3])
        .unwrap();
        assert_eq!(groups.get(&true), Some(&0));
        assert_eq!(groups.get(&false), Some(&2));
    }

    #[test]
    fn test_partitioning_always_has_both_keys() {
        let parts = partitioning_by_as_lists(|n: &i32| *n > 10)
            .collect_from(vec![1, 2, 3])
            .unwrap();
        assert_eq!(parts.size(), 2);
        assert!(parts.get(&true).map_or(false, |l| l.is_empty()));
        assert_eq!(parts.to_string(), "{false=[1, 2, 3], true=[]}");
        let counts = partitioning_by(|n: &i32| n % 2 == 0, counting())
            .collect_from(1..=5)
            .unwrap();
        assert_eq!(counts.get(&true), Some(&2));
    }

    #[test]
    fn test_to_map_merges_duplicates() {
        let totals = to_map(|w: &&str| w.len(), |_w: &str| 1i64, |a, b| a + b)
            .collect_from(words())
            .unwrap();
        assert_eq!(totals.get(&6), Some(&2));
    }

    #[test]
    fn test_to_map_uniquely_rejects_duplicates() {
        let err = to_map_uniquely(|w: &&str| w.len(), |w: &'static str| w)
            .collect_from(words())
            .unwrap_err();
        assert!(matches!(err, Error::IllegalState(_)));
        assert_eq!(err.to_string(), "Duplicate key 6");
    }

    #[test]
    fn test_to_map_supplied_by() {
        let map = to_map_supplied_by(
            |n: &i32| *n,
            |n: i32| n * n,
            |a, _| a,
            || Map::with_capacity(8),
        )
        .collect_from(vec![2, 3])
        .unwrap();
        assert_eq!(map.get(&3), Some(&9));
    }

    #[test]
    fn test_collecting_and_then() {
        let size = collecting_and_then(to_list::<i32>(), |l| l.size())
            .collect_from(vec![4, 5])
            .unwrap();
        assert_eq!(size, 2);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        /// Accumulate three slices separately, then combine both ways
        fn split_collect<T: Clone + 'static, A: 'static, R: 'static>(
            collector: &Collector<T, A, R>,
            parts: [&[T]; 3],
        ) -> (R, R) {
            let fill = |part: &[T]| {
                let mut container = collector.supply();
                for t in part {
                    collector.accumulate(&mut container, t.clone()).unwrap();
                }
                container
            };
            let left_first = collector
                .combine(
                    collector.combine(fill(parts[0]), fill(parts[1])).unwrap(),
                    fill(parts[2]),
                )
                .unwrap();
            let right_first = collector
                .combine(
                    fill(parts[0]),
                    collector.combine(fill(parts[1]), fill(parts[2])).unwrap(),
                )
                .unwrap();
            (collector.finish(left_first), collector.finish(right_first))
        }

        fn split3<T>(items: &[T], a: usize, b: usize) -> [&[T]; 3] {
            let a = a.min(items.len());
            let b = b.clamp(a, items.len());
            [&items[..a], &items[a..b], &items[b..]]
        }

        proptest! {
            #[test]
            fn to_list_combine_is_associative(
                items in proptest::collection::vec(any::<i32>(), 0..48),
                a in 0usize..48,
                b in 0usize..48,
            ) {
                let collector = to_list::<i32>();
                let (left, right) = split_collect(&collector, split3(&items, a, b));
                prop_assert_eq!(left.as_slice(), right.as_slice());
                prop_assert_eq!(left.as_slice(), items.as_slice());
            }

            #[test]
            fn joining_combine_is_associative(
                items in proptest::collection::vec("[a-z]{0,4}", 0..24),
                a in 0usize..24,
                b in 0usize..24,
            ) {
                let collector = joining_with::<String>(",");
                let (left, right) = split_collect(&collector, split3(&items, a, b));
                prop_assert_eq!(&left, &right);
                prop_assert_eq!(left, items.join(","));
            }

            #[test]
            fn counting_combine_is_associative(
                items in proptest::collection::vec(any::<u8>(), 0..48),
                a in 0usize..48,
                b in 0usize..48,
            ) {
                let collector = counting::<u8>();
                let (left, right) = split_collect(&collector, split3(&items, a, b));
                prop_assert_eq!(left, right);
                prop_assert_eq!(left, items.len() as i64);
            }
        }
    }
}
