//! Lazy, single-use element pipelines
//!
//! A [`Stream`] is a source iterator plus a list of recorded [`Stage`]
//! descriptors. Nothing runs until a terminal operation (`collect`,
//! `count`, `for_each`, ...) takes the pipeline, builds the pull chain and
//! drives it to completion on the caller's thread.
//!
//! # Single use
//!
//! Intermediate operations take the stream by value. Terminal operations
//! take `&mut self` and leave the stream consumed; every later terminal
//! call fails with `Error::IllegalState`, as do terminals on any stream
//! derived from a consumed one.
//!
//! Intermediate calls cannot fail, so chaining onto a consumed stream is
//! accepted and the error is reported by the next terminal call. The same
//! holds when a `flat_map` mapper returns a consumed inner stream: the pull
//! chain ends there and the terminal fails.
//!
//! # Type-changing stages
//!
//! `map` and `flat_map` change the element type, so they close the current
//! stage list into a new source. The stage history kept for
//! [`Stream::describe`] still records them in order.
//!
//! # Infinite sources
//!
//! `generate` and `iterate` never end. `limit` stops pulling as soon as its
//! bound is reached, so `sorted`/`distinct` are safe on an infinite source
//! only after a `limit`.

use crate::collector::Collector;
use crate::functional;
use crate::optional::Optional;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};
use valuekit_collections::{Comparator, Set};
use valuekit_core::{Comparable, Error, Identity, Result, RuntimeConfig};

const CONSUMED: &str = "stream has already been operated upon or closed";

type Source<T> = Box<dyn Iterator<Item = T>>;

// ============================================================================
// Stage descriptors
// ============================================================================

/// Kind of a recorded pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Keep elements matching a predicate
    Filter,
    /// Transform each element
    Map,
    /// Replace each element with a stream of elements
    FlatMap,
    /// Drop elements equal to an earlier one
    Distinct,
    /// Buffer and order all elements
    Sorted,
    /// Observe elements as they pass
    Peek,
    /// Stop after a number of elements
    Limit,
    /// Discard a number of leading elements
    Skip,
}

impl StageKind {
    /// Lower-case stage name
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Filter => "filter",
            StageKind::Map => "map",
            StageKind::FlatMap => "flat_map",
            StageKind::Distinct => "distinct",
            StageKind::Sorted => "sorted",
            StageKind::Peek => "peek",
            StageKind::Limit => "limit",
            StageKind::Skip => "skip",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element-preserving stage, interpreted when a terminal operation runs
pub(crate) enum Stage<T> {
    Filter(Box<dyn FnMut(&T) -> bool>),
    Peek(Box<dyn FnMut(&T)>),
    /// Holds the "first occurrence" test with its own seen-set
    Distinct(Box<dyn FnMut(&T) -> bool>),
    Sorted(Comparator<T>),
    Limit(u64),
    Skip(u64),
}

impl<T: 'static> Stage<T> {
    fn kind(&self) -> StageKind {
        match self {
            Stage::Filter(_) => StageKind::Filter,
            Stage::Peek(_) => StageKind::Peek,
            Stage::Distinct(_) => StageKind::Distinct,
            Stage::Sorted(_) => StageKind::Sorted,
            Stage::Limit(_) => StageKind::Limit,
            Stage::Skip(_) => StageKind::Skip,
        }
    }

    fn apply(self, upstream: Source<T>) -> Source<T> {
        match self {
            Stage::Filter(mut pred) => Box::new(upstream.filter(move |t| pred(t))),
            Stage::Peek(mut action) => Box::new(upstream.inspect(move |t| action(t))),
            Stage::Distinct(mut first_seen) => Box::new(upstream.filter(move |t| first_seen(t))),
            Stage::Sorted(comparator) => Box::new(SortedIter {
                upstream: Some(upstream),
                comparator,
                sorted: Vec::new().into_iter(),
            }),
            Stage::Limit(n) => Box::new(upstream.take(saturating_usize(n))),
            Stage::Skip(n) => Box::new(upstream.skip(saturating_usize(n))),
        }
    }
}

fn saturating_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn warn_if_buffer_exceeds(stage: StageKind, buffered: usize) {
    let threshold = RuntimeConfig::global().buffer_warn_threshold;
    if buffered > threshold {
        warn!(
            target: "valuekit::stream",
            stage = stage.name(),
            buffered,
            threshold,
            "stage buffered more elements than the configured threshold"
        );
    }
}

/// Drains its upstream on the first pull, then yields in order
struct SortedIter<T> {
    upstream: Option<Source<T>>,
    comparator: Comparator<T>,
    sorted: std::vec::IntoIter<T>,
}

impl<T: 'static> Iterator for SortedIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if let Some(upstream) = self.upstream.take() {
            let mut buffer: Vec<T> = upstream.collect();
            warn_if_buffer_exceeds(StageKind::Sorted, buffer.len());
            let comparator = &self.comparator;
            buffer.sort_by(|a, b| comparator.compare(a, b));
            self.sorted = buffer.into_iter();
        }
        self.sorted.next()
    }
}

/// Set when a `flat_map` mapper hands back a consumed stream
#[derive(Clone)]
struct Poison {
    flags: Vec<Rc<Cell<bool>>>,
}

impl Poison {
    fn fresh() -> Self {
        Poison {
            flags: vec![Rc::new(Cell::new(false))],
        }
    }

    fn set(&self) {
        if let Some(flag) = self.flags.first() {
            flag.set(true);
        }
    }

    fn is_set(&self) -> bool {
        self.flags.iter().any(|flag| flag.get())
    }

    fn merge(mut self, other: Poison) -> Self {
        self.flags.extend(other.flags);
        self
    }

    fn check(&self) -> Result<()> {
        if self.is_set() {
            Err(Error::illegal_state(CONSUMED))
        } else {
            Ok(())
        }
    }
}

/// `flat_map` stage; ends the chain at the first consumed inner stream
struct FlatMapIter<T, U, F> {
    upstream: Source<T>,
    mapper: F,
    inner: Option<(Source<U>, Poison)>,
    poison: Poison,
}

impl<T, U, F> Iterator for FlatMapIter<T, U, F>
where
    T: 'static,
    U: 'static,
    F: FnMut(T) -> Stream<U>,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        loop {
            if self.poison.is_set() {
                return None;
            }
            if let Some((inner, inner_poison)) = self.inner.as_mut() {
                if let Some(u) = inner.next() {
                    return Some(u);
                }
                if inner_poison.is_set() {
                    self.poison.set();
                }
                self.inner = None;
                continue;
            }
            let t = self.upstream.next()?;
            match (self.mapper)(t).pipeline {
                Some(pipeline) => {
                    let inner_poison = pipeline.poison.clone();
                    self.inner = Some((pipeline.build(), inner_poison));
                }
                None => {
                    debug!(target: "valuekit::stream", "flat_map received a consumed stream");
                    self.poison.set();
                    return None;
                }
            }
        }
    }
}

struct Pipeline<T> {
    source: Source<T>,
    stages: Vec<Stage<T>>,
    poison: Poison,
}

impl<T: 'static> Pipeline<T> {
    fn build(self) -> Source<T> {
        self.stages
            .into_iter()
            .fold(self.source, |upstream, stage| stage.apply(upstream))
    }
}

// ============================================================================
// Stream
// ============================================================================

/// Lazy, single-use sequence of elements
pub struct Stream<T> {
    /// `None` once a terminal operation has run
    pipeline: Option<Pipeline<T>>,
    history: Vec<StageKind>,
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("stages", &self.history)
            .field("consumed", &self.pipeline.is_none())
            .finish()
    }
}

impl<T: 'static> Stream<T> {
    fn from_source(source: Source<T>) -> Self {
        Stream {
            pipeline: Some(Pipeline {
                source,
                stages: Vec::new(),
                poison: Poison::fresh(),
            }),
            history: Vec::new(),
        }
    }

    /// Stream over the given elements
    pub fn of(items: Vec<T>) -> Self {
        Stream::from_source(Box::new(items.into_iter()))
    }

    /// Stream of a single element
    pub fn of_one(item: T) -> Self {
        Stream::from_source(Box::new(std::iter::once(item)))
    }

    /// Stream with no elements
    pub fn empty() -> Self {
        Stream::from_source(Box::new(std::iter::empty()))
    }

    /// Stream over any owned iterator
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Stream::from_source(Box::new(items.into_iter()))
    }

    /// Infinite stream of `supplier()` results
    pub fn generate(supplier: impl FnMut() -> T + 'static) -> Self {
        Stream::from_source(Box::new(std::iter::repeat_with(supplier)))
    }

    /// Infinite stream `seed, f(seed), f(f(seed)), ...`; `successor` runs
    /// only when the next element is pulled
    pub fn iterate(seed: T, mut successor: impl FnMut(&T) -> T + 'static) -> Self
    where
        T: Clone,
    {
        let mut previous: Option<T> = None;
        let mut seed = Some(seed);
        Stream::from_source(Box::new(std::iter::from_fn(move || {
            let next = match previous.take() {
                Some(prev) => successor(&prev),
                None => seed.take()?,
            };
            previous = Some(next.clone());
            Some(next)
        })))
    }

    /// Elements of `first` followed by elements of `second`. The result is
    /// consumed if either input is.
    pub fn concat(mut first: Stream<T>, mut second: Stream<T>) -> Self {
        match (first.pipeline.take(), second.pipeline.take()) {
            (Some(a), Some(b)) => {
                let poison = a.poison.clone().merge(b.poison.clone());
                Stream {
                    pipeline: Some(Pipeline {
                        source: Box::new(a.build().chain(b.build())),
                        stages: Vec::new(),
                        poison,
                    }),
                    history: Vec::new(),
                }
            }
            _ => Stream {
                pipeline: None,
                history: Vec::new(),
            },
        }
    }

    // ------------------------------------------------------------------------
    // Intermediate operations
    // ------------------------------------------------------------------------

    fn push(mut self, stage: Stage<T>) -> Self {
        let kind = stage.kind();
        self.history.push(kind);
        match self.pipeline.as_mut() {
            Some(pipeline) => pipeline.stages.push(stage),
            None => {
                debug!(target: "valuekit::stream", stage = kind.name(), "stage added to a consumed stream")
            }
        }
        self
    }

    fn seal<U: 'static>(
        self,
        kind: StageKind,
        f: impl FnOnce(Source<T>, &Poison) -> Source<U>,
    ) -> Stream<U> {
        let mut history = self.history;
        history.push(kind);
        if self.pipeline.is_none() {
            debug!(target: "valuekit::stream", stage = kind.name(), "stage added to a consumed stream");
        }
        Stream {
            pipeline: self.pipeline.map(|p| {
                let poison = p.poison.clone();
                Pipeline {
                    source: f(p.build(), &poison),
                    stages: Vec::new(),
                    poison,
                }
            }),
            history,
        }
    }

    /// Keep elements for which `predicate` holds
    pub fn filter(self, predicate: impl FnMut(&T) -> bool + 'static) -> Self {
        self.push(Stage::Filter(Box::new(predicate)))
    }

    /// Run `action` on each element as it passes
    pub fn peek(self, action: impl FnMut(&T) + 'static) -> Self {
        self.push(Stage::Peek(Box::new(action)))
    }

    /// Drop elements equal (by `Identity`) to an earlier element
    pub fn distinct(self) -> Self
    where
        T: Identity + Clone,
    {
        let threshold = RuntimeConfig::global().buffer_warn_threshold;
        let mut seen: Set<T> = Set::new();
        let mut warned = false;
        self.push(Stage::Distinct(Box::new(move |t: &T| {
            let first = seen.add(t.clone());
            if first && !warned && seen.size() > threshold {
                warned = true;
                warn_if_buffer_exceeds(StageKind::Distinct, seen.size());
            }
            first
        })))
    }

    /// Order by natural order (stable)
    pub fn sorted(self) -> Self
    where
        T: Comparable,
    {
        self.sorted_by(Comparator::natural_order())
    }

    /// Order by `comparator` (stable)
    pub fn sorted_by(self, comparator: Comparator<T>) -> Self {
        self.push(Stage::Sorted(comparator))
    }

    /// At most `max_size` elements
    pub fn limit(self, max_size: u64) -> Self {
        self.push(Stage::Limit(max_size))
    }

    /// Discard the first `n` elements
    pub fn skip(self, n: u64) -> Self {
        self.push(Stage::Skip(n))
    }

    /// Transform each element
    pub fn map<U: 'static>(self, mapper: impl FnMut(T) -> U + 'static) -> Stream<U> {
        self.seal(StageKind::Map, move |upstream, _| Box::new(upstream.map(mapper)))
    }

    /// Replace each element with the elements of the stream `mapper` returns.
    /// If `mapper` returns a consumed stream, the terminal operation fails
    /// with `Error::IllegalState`.
    pub fn flat_map<U: 'static>(self, mapper: impl FnMut(T) -> Stream<U> + 'static) -> Stream<U> {
        self.seal(StageKind::FlatMap, move |upstream, poison| {
            Box::new(FlatMapIter {
                upstream,
                mapper,
                inner: None,
                poison: poison.clone(),
            })
        })
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Recorded stages in order
    pub fn stage_kinds(&self) -> &[StageKind] {
        &self.history
    }

    /// Pipeline shape, e.g. `source -> filter -> map`
    pub fn describe(&self) -> String {
        std::iter::once("source")
            .chain(self.history.iter().map(StageKind::name))
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// True once a terminal operation has run. Intermediate calls on a
    /// consumed stream still succeed; the next terminal call reports it.
    pub fn is_consumed(&self) -> bool {
        self.pipeline.is_none()
    }

    // ------------------------------------------------------------------------
    // Terminal operations
    // ------------------------------------------------------------------------

    fn open(&mut self, op: &'static str) -> Result<(Source<T>, Poison)> {
        let pipeline = self
            .pipeline
            .take()
            .ok_or_else(|| Error::illegal_state(CONSUMED))?;
        debug!(target: "valuekit::stream", op, pipeline = %self.describe(), "terminal operation");
        let poison = pipeline.poison.clone();
        Ok((pipeline.build(), poison))
    }

    /// Drive the pull chain with `f`, then report a consumed inner stream
    fn run<R>(&mut self, op: &'static str, f: impl FnOnce(Source<T>) -> R) -> Result<R> {
        let (elements, poison) = self.open(op)?;
        let out = f(elements);
        poison.check()?;
        Ok(out)
    }

    /// Run `action` on every element
    pub fn for_each(&mut self, action: impl FnMut(T)) -> Result<()> {
        self.run("for_each", |elements| elements.for_each(action))
    }

    /// Run `action` on every element in encounter order
    pub fn for_each_ordered(&mut self, action: impl FnMut(T)) -> Result<()> {
        self.run("for_each_ordered", |elements| elements.for_each(action))
    }

    /// Fold with `op`; absent for an empty stream
    pub fn reduce(&mut self, op: impl FnMut(T, T) -> T) -> Result<Optional<T>> {
        self.run("reduce", |elements| Optional::of_nullable(elements.reduce(op)))
    }

    /// Fold starting from `identity`
    pub fn reduce_with_identity(&mut self, identity: T, op: impl FnMut(T, T) -> T) -> Result<T> {
        self.run("reduce", |elements| elements.fold(identity, op))
    }

    /// Fold into another type. `_combiner` merges partial results and is
    /// never needed by a sequential run.
    pub fn reduce_with_identity_and_combiner<U>(
        &mut self,
        identity: U,
        accumulator: impl FnMut(U, T) -> U,
        _combiner: impl FnMut(U, U) -> U,
    ) -> Result<U> {
        self.run("reduce", |elements| elements.fold(identity, accumulator))
    }

    /// Mutable reduction through `collector`
    pub fn collect<A: 'static, R: 'static>(&mut self, collector: Collector<T, A, R>) -> Result<R> {
        self.run("collect", |elements| collector.collect_from(elements))?
    }

    /// Mutable reduction into the container made by `supplier`
    pub fn collect_with<R>(
        &mut self,
        supplier: impl FnOnce() -> R,
        mut accumulator: impl FnMut(&mut R, T),
        _combiner: impl FnMut(&mut R, R),
    ) -> Result<R> {
        self.run("collect", |elements| {
            let mut container = supplier();
            for t in elements {
                accumulator(&mut container, t);
            }
            container
        })
    }

    /// Smallest element; the first one wins ties
    pub fn min(&mut self, comparator: Comparator<T>) -> Result<Optional<T>> {
        self.run("min", |elements| {
            Optional::of_nullable(elements.reduce(functional::min_by(comparator)))
        })
    }

    /// Largest element; the first one wins ties
    pub fn max(&mut self, comparator: Comparator<T>) -> Result<Optional<T>> {
        self.run("max", |elements| {
            Optional::of_nullable(elements.reduce(functional::max_by(comparator)))
        })
    }

    /// True if any element matches; stops at the first match
    pub fn any_match(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Result<bool> {
        self.run("any_match", |mut elements| elements.any(|t| predicate(&t)))
    }

    /// True if every element matches; stops at the first mismatch
    pub fn all_match(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Result<bool> {
        self.run("all_match", |mut elements| elements.all(|t| predicate(&t)))
    }

    /// True if no element matches; stops at the first match
    pub fn none_match(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Result<bool> {
        self.run("none_match", |mut elements| !elements.any(|t| predicate(&t)))
    }

    /// Number of elements
    pub fn count(&mut self) -> Result<i64> {
        self.run("count", |elements| elements.fold(0i64, |n, _| n.wrapping_add(1)))
    }

    /// All elements in encounter order
    pub fn to_array(&mut self) -> Result<Vec<T>> {
        self.run("to_array", |elements| elements.collect())
    }

    /// First element in encounter order
    pub fn find_first(&mut self) -> Result<Optional<T>> {
        self.run("find_first", |mut elements| Optional::of_nullable(elements.next()))
    }

    /// Some element; sequential runs return the first
    pub fn find_any(&mut self) -> Result<Optional<T>> {
        self.run("find_any", |mut elements| Optional::of_nullable(elements.next()))
    }

    /// Pull elements one at a time
    pub fn iterator(&mut self) -> Result<StreamIterator<T>> {
        let (inner, poison) = self.open("iterator")?;
        Ok(StreamIterator { inner, poison })
    }
}

/// Pull-based view of a stream's elements
pub struct StreamIterator<T> {
    inner: Source<T>,
    poison: Poison,
}

impl<T> StreamIterator<T> {
    /// Fails once iteration has stopped at a consumed `flat_map` inner stream
    pub fn check(&self) -> Result<()> {
        self.poison.check()
    }
}

impl<T> Iterator for StreamIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_sorted_collect() {
        let list = Stream::of(vec![3, 1, 2])
            .sorted()
            .collect(collectors::to_list())
            .unwrap();
        assert_eq!(list.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_terminal_twice_fails() {
        let mut s = Stream::of(vec![1, 2, 3]);
        assert_eq!(s.count().unwrap(), 3);
        let err = s.count().unwrap_err();
        assert!(err.is_illegal_state());
        assert_eq!(err.to_string(), CONSUMED);
        assert!(s.find_first().is_err());
        assert!(s.is_consumed());
    }

    #[test]
    fn test_consumed_state_survives_intermediates() {
        let mut s = Stream::of(vec![1, 2, 3]);
        s.to_array().unwrap();
        let mut derived = s.filter(|v| *v > 1).map(|v| v * 2);
        assert!(derived.to_array().unwrap_err().is_illegal_state());
    }

    #[test]
    fn test_nothing_runs_before_terminal() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut s = Stream::of(vec![1, 2, 3]).peek(move |_| counter.set(counter.get() + 1));
        assert_eq!(calls.get(), 0);
        s.for_each(|_| {}).unwrap();
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_limit_bounds_infinite_sources() {
        let first = Stream::generate(|| 7).limit(3).to_array().unwrap();
        assert_eq!(first, vec![7, 7, 7]);
        let powers = Stream::iterate(1i64, |x| x * 2)
            .skip(2)
            .limit(4)
            .sorted_by(Comparator::reverse_order())
            .to_array()
            .unwrap();
        assert_eq!(powers, vec![32, 16, 8, 4]);
    }

    #[test]
    fn test_iterate_is_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        Stream::iterate(0i32, move |x| {
            counter.set(counter.get() + 1);
            x + 1
        })
        .limit(3)
        .count()
        .unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_limit_stops_pulling() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let taken = Stream::from_iter(1..=100)
            .peek(move |_| counter.set(counter.get() + 1))
            .limit(2)
            .count()
            .unwrap();
        assert_eq!(taken, 2);
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_short_circuit_matches() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let found = Stream::of(vec![1, 2, 3, 4])
            .peek(move |v| log.borrow_mut().push(*v))
            .any_match(|v| *v == 2)
            .unwrap();
        assert!(found);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert!(Stream::of(vec![2, 4]).all_match(|v| v % 2 == 0).unwrap());
        assert!(Stream::<i32>::empty().all_match(|_| false).unwrap());
        assert!(Stream::of(vec![1, 3]).none_match(|v| v % 2 == 0).unwrap());
    }

    #[test]
    fn test_distinct_uses_identity() {
        let out = Stream::of(vec!["a", "b", "a", "c", "b"])
            .map(|s| s.to_string())
            .distinct()
            .to_array()
            .unwrap();
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_flat_map_and_concat() {
        let out = Stream::of(vec![1, 2, 3])
            .flat_map(|n| Stream::from_iter(std::iter::repeat(n).take(n as usize)))
            .to_array()
            .unwrap();
        assert_eq!(out, vec![1, 2, 2, 3, 3, 3]);
        let joined = Stream::concat(Stream::of(vec![1]), Stream::of(vec![2, 3]).skip(1))
            .to_array()
            .unwrap();
        assert_eq!(joined, vec![1, 3]);
    }

    #[test]
    fn test_flat_map_rejects_consumed_inner_stream() {
        let mut out = Stream::of(vec![0, 1]).flat_map(|_| {
            let mut inner = Stream::of(vec![1, 2]);
            inner.count().unwrap();
            inner
        });
        let err = out.to_array().unwrap_err();
        assert!(err.is_illegal_state());
        assert_eq!(err.to_string(), CONSUMED);
    }

    #[test]
    fn test_flat_map_stops_at_consumed_inner_stream() {
        let mapped = Rc::new(Cell::new(0));
        let counter = Rc::clone(&mapped);
        let mut out = Stream::of(vec![1, 2, 3]).flat_map(move |n| {
            counter.set(counter.get() + 1);
            let mut inner = Stream::of(vec![n]);
            if n == 2 {
                inner.count().unwrap();
            }
            inner
        });
        assert!(out.count().unwrap_err().is_illegal_state());
        assert_eq!(mapped.get(), 2);
    }

    #[test]
    fn test_nested_flat_map_propagates_consumed_inner() {
        let mut out = Stream::of(vec![1]).flat_map(|_| {
            Stream::of(vec![1]).flat_map(|_| {
                let mut used = Stream::of_one(9);
                used.find_first().unwrap();
                used
            })
        });
        assert!(out.find_first().unwrap_err().is_illegal_state());

        let mut iter = Stream::of(vec![1, 2])
            .flat_map(|n| {
                let mut inner = Stream::of_one(n);
                if n == 2 {
                    inner.count().unwrap();
                }
                inner
            })
            .iterator()
            .unwrap();
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next(), None);
        assert!(iter.check().unwrap_err().is_illegal_state());
    }

    #[test]
    fn test_concat_with_consumed_input_is_consumed() {
        let mut used = Stream::of(vec![1]);
        used.count().unwrap();
        let mut joined = Stream::concat(used, Stream::of(vec![2]));
        assert!(joined.count().is_err());
    }

    #[test]
    fn test_reductions() {
        assert_eq!(
            Stream::of(vec![1, 2, 3]).reduce(|a, b| a + b).unwrap(),
            Optional::of(6)
        );
        assert!(Stream::<i32>::empty().reduce(|a, b| a + b).unwrap().is_empty());
        assert_eq!(Stream::of(vec![1, 2]).reduce_with_identity(10, |a, b| a + b).unwrap(), 13);
        let total_len = Stream::of(vec!["ab", "c"])
            .reduce_with_identity_and_combiner(0usize, |n, s| n + s.len(), |a, b| a + b)
            .unwrap();
        assert_eq!(total_len, 3);
    }

    #[test]
    fn test_collect_with_supplier() {
        let joined = Stream::of(vec!["x", "y"])
            .collect_with(String::new, |acc, s| acc.push_str(s), |acc, other| acc.push_str(&other))
            .unwrap();
        assert_eq!(joined, "xy");
    }

    #[test]
    fn test_min_max_keep_first_on_ties() {
        let by_len = Comparator::comparing(|s: &&str| s.len() as i32);
        let words = || Stream::of(vec!["bb", "aa", "c", "d"]);
        assert_eq!(words().min(by_len.clone()).unwrap(), Optional::of("c"));
        assert_eq!(words().max(by_len).unwrap(), Optional::of("bb"));
    }

    #[test]
    fn test_find_and_iterator() {
        assert_eq!(
            Stream::of(vec![5, 6]).skip(1).find_first().unwrap(),
            Optional::of(6)
        );
        assert!(Stream::<i32>::empty().find_any().unwrap().is_empty());
        let collected: Vec<i32> = Stream::of(vec![1, 2]).map(|v| v * 10).iterator().unwrap().collect();
        assert_eq!(collected, vec![10, 20]);
    }

    #[test]
    fn test_describe_records_stage_order() {
        let s = Stream::of(vec![1, 2, 3])
            .filter(|v| *v > 0)
            .map(|v| v + 1)
            .sorted()
            .limit(2);
        assert_eq!(
            s.stage_kinds(),
            &[StageKind::Filter, StageKind::Map, StageKind::Sorted, StageKind::Limit]
        );
        assert_eq!(s.describe(), "source -> filter -> map -> sorted -> limit");
        assert_eq!(Stream::<i32>::empty().describe(), "source");
    }

    #[test]
    fn test_sorted_is_stable() {
        let out = Stream::of(vec![(1, 'b'), (0, 'x'), (1, 'a')])
            .sorted_by(Comparator::comparing(|p: &(i32, char)| p.0))
            .map(|p| p.1)
            .to_array()
            .unwrap();
        assert_eq!(out, vec!['x', 'b', 'a']);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;
        use valuekit_collections::Collection;
        use valuekit_core::Long;

        proptest! {
            #[test]
            fn limit_and_skip_match_iterator(
                items in proptest::collection::vec(any::<i32>(), 0..64),
                skip in 0u64..80,
                limit in 0u64..80,
            ) {
                let expected: Vec<i32> = items
                    .iter()
                    .copied()
                    .skip(skip as usize)
                    .take(limit as usize)
                    .collect();
                let actual = Stream::of(items).skip(skip).limit(limit).to_array().unwrap();
                prop_assert_eq!(actual, expected);
            }

            #[test]
            fn distinct_matches_set_insertion(items in proptest::collection::vec(0i64..16, 0..64)) {
                let mut set: Set<Long> = Set::new();
                for v in &items {
                    set.add(Long(*v));
                }
                let expected = set.to_vec();
                let actual = Stream::of(items).map(Long).distinct().to_array().unwrap();
                prop_assert_eq!(actual, expected);
            }

            #[test]
            fn sorted_matches_stable_sort(items in proptest::collection::vec((0i32..8, any::<u8>()), 0..64)) {
                let mut expected = items.clone();
                expected.sort_by_key(|p| p.0);
                let actual = Stream::of(items)
                    .sorted_by(Comparator::comparing(|p: &(i32, u8)| p.0))
                    .to_array()
                    .unwrap();
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
