//! Streams over collection contents
//!
//! A stream is detached from the collection it came from: elements are
//! cloned when the stream is created, so the collection stays usable and
//! later mutations do not reach the pipeline.

use crate::stream::Stream;
use valuekit_collections::{EntrySet, KeySet, List, Map, Set, Stack, SubList, Values};
use valuekit_core::Identity;

/// Collections that can produce a [`Stream`] of their elements
pub trait ToStream {
    /// Element type of the stream
    type Item: 'static;

    /// Sequential stream over a snapshot of the elements, in iteration order
    fn stream(&self) -> Stream<Self::Item>;
}

fn snapshot<'a, T: Clone + 'static>(items: impl Iterator<Item = &'a T>) -> Stream<T> {
    Stream::of(items.cloned().collect())
}

impl<E: Clone + 'static> ToStream for List<E> {
    type Item = E;

    fn stream(&self) -> Stream<E> {
        snapshot(self.iter())
    }
}

impl<E: Clone + 'static> ToStream for SubList<'_, E> {
    type Item = E;

    fn stream(&self) -> Stream<E> {
        snapshot(self.as_slice().iter())
    }
}

impl<E: Clone + 'static> ToStream for Stack<E> {
    type Item = E;

    fn stream(&self) -> Stream<E> {
        snapshot(self.iter())
    }
}

impl<E: Identity + Clone + 'static> ToStream for Set<E> {
    type Item = E;

    fn stream(&self) -> Stream<E> {
        snapshot(self.iter())
    }
}

impl<K: Identity + Clone + 'static, V: 'static> ToStream for KeySet<'_, K, V> {
    type Item = K;

    fn stream(&self) -> Stream<K> {
        snapshot(self.iter())
    }
}

impl<K: Identity + 'static, V: Clone + 'static> ToStream for Values<'_, K, V> {
    type Item = V;

    fn stream(&self) -> Stream<V> {
        snapshot(self.iter())
    }
}

impl<K: Identity + Clone + 'static, V: Clone + 'static> ToStream for EntrySet<'_, K, V> {
    type Item = (K, V);

    fn stream(&self) -> Stream<(K, V)> {
        snapshot(self.iter())
    }
}

impl<K: Identity + Clone + 'static, V: Clone + 'static> ToStream for Map<K, V> {
    type Item = (K, V);

    fn stream(&self) -> Stream<(K, V)> {
        Stream::of(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl<T: Clone + 'static> ToStream for [T] {
    type Item = T;

    fn stream(&self) -> Stream<T> {
        snapshot(self.iter())
    }
}
