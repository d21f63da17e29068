//! Composable ordering functions
//!
//! A [`Comparator`] is an ordered chain of comparison links. `compare`
//! evaluates the links left to right and returns the first non-equal
//! result, so `comparing(age).then_comparing_by(name)` orders by age and
//! breaks ties by name.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use valuekit_core::Comparable;

type Link<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// Ordering function with tie-breakers.
pub struct Comparator<T: ?Sized> {
    links: Vec<Link<T>>,
}

impl<T: ?Sized> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Comparator {
            links: self.links.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("links", &self.links.len())
            .finish()
    }
}

impl<T: ?Sized + 'static> Comparator<T> {
    /// Comparator from a plain comparison function
    pub fn from_fn(f: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Comparator {
            links: vec![Rc::new(f)],
        }
    }

    /// Natural order of a [`Comparable`] type
    pub fn natural_order() -> Self
    where
        T: Comparable,
    {
        Comparator::from_fn(|a: &T, b: &T| a.compare_to(b))
    }

    /// Reverse of the natural order
    pub fn reverse_order() -> Self
    where
        T: Comparable,
    {
        Comparator::from_fn(|a: &T, b: &T| b.compare_to(a))
    }

    /// Order by the natural order of a projected key
    pub fn comparing<U, F>(key: F) -> Self
    where
        U: Comparable + 'static,
        F: Fn(&T) -> U + 'static,
    {
        Comparator::from_fn(move |a: &T, b: &T| key(a).compare_to(&key(b)))
    }

    /// Order by a projected key using `key_order`
    pub fn comparing_with<U, F>(key: F, key_order: Comparator<U>) -> Self
    where
        U: 'static,
        F: Fn(&T) -> U + 'static,
    {
        Comparator::from_fn(move |a: &T, b: &T| key_order.compare(&key(a), &key(b)))
    }

    /// Append `next` as a tie-breaker
    pub fn then_comparing(mut self, next: Comparator<T>) -> Self {
        self.links.extend(next.links);
        self
    }

    /// Break ties by the natural order of a projected key
    pub fn then_comparing_by<U, F>(self, key: F) -> Self
    where
        U: Comparable + 'static,
        F: Fn(&T) -> U + 'static,
    {
        self.then_comparing(Comparator::comparing(key))
    }

    /// Break ties by a projected key using `key_order`
    pub fn then_comparing_by_with<U, F>(self, key: F, key_order: Comparator<U>) -> Self
    where
        U: 'static,
        F: Fn(&T) -> U + 'static,
    {
        self.then_comparing(Comparator::comparing_with(key, key_order))
    }

    /// The whole chain, reversed
    pub fn reversed(self) -> Self {
        Comparator::from_fn(move |a: &T, b: &T| self.compare(b, a))
    }

    /// Compare `a` with `b`
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        for link in &self.links {
            match link(a, b) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}

impl<T: 'static> Comparator<Option<T>> {
    /// `None` sorts before every value; values use `inner`
    pub fn nulls_first(inner: Comparator<T>) -> Self {
        Comparator::from_fn(move |a: &Option<T>, b: &Option<T>| match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => inner.compare(x, y),
        })
    }

    /// `None` sorts after every value; values use `inner`
    pub fn nulls_last(inner: Comparator<T>) -> Self {
        Comparator::from_fn(move |a: &Option<T>, b: &Option<T>| match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => inner.compare(x, y),
        })
    }
}
