//! Duplicate-free collection keyed by [`Identity`]
//!
//! Iteration follows insertion order. Re-adding an element that is already
//! present neither replaces it nor moves it.

use crate::collection::Collection;
use crate::cursor::{element_of, SetCursor, TableCursor};
use crate::list::write_sequence;
use crate::table::IdentityTable;
use std::fmt;
use valuekit_core::Identity;

/// Insertion-ordered hash set
#[derive(Debug, Clone)]
pub struct Set<E> {
    table: IdentityTable<E, ()>,
}

impl<E> Default for Set<E> {
    fn default() -> Self {
        Set {
            table: IdentityTable::default(),
        }
    }
}

impl<E: Identity> Set<E> {
    /// Empty set
    pub fn new() -> Self {
        Set::default()
    }

    /// Empty set with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Set {
            table: IdentityTable::with_capacity(capacity),
        }
    }

    /// Number of elements
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// True if there are no elements
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// True if an element equal to `e` is present
    pub fn contains(&self, e: &E) -> bool {
        self.table.find(e).is_some()
    }

    /// Add `e` unless an equal element is present; returns whether it was added
    pub fn add(&mut self, e: E) -> bool {
        if self.contains(&e) {
            return false;
        }
        self.table.insert(e, ());
        true
    }

    /// Remove the element equal to `e`; returns whether one was present
    pub fn remove(&mut self, e: &E) -> bool {
        self.table.remove(e).is_some()
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Cursor in insertion order
    pub fn iterator(&mut self) -> SetCursor<'_, E> {
        TableCursor::new(&mut self.table, element_of)
    }

    /// Borrowing iterator in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.table.iter().map(|(e, _)| e)
    }
}

impl<E: Identity> Collection<E> for Set<E> {
    fn size(&self) -> usize {
        self.table.len()
    }

    fn contains(&self, e: &E) -> bool {
        Set::contains(self, e)
    }

    fn add(&mut self, e: E) -> bool {
        Set::add(self, e)
    }

    fn remove(&mut self, e: &E) -> bool {
        Set::remove(self, e)
    }

    fn remove_if(&mut self, pred: &mut dyn FnMut(&E) -> bool) -> bool {
        self.table.retain(|e, _| !pred(e))
    }

    fn clear(&mut self) {
        self.table.clear();
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &E> + '_> {
        Box::new(self.iter())
    }
}

/// Equal when both hold equal elements, regardless of order
impl<E: Identity> Identity for Set<E> {
    fn equals(&self, other: &Self) -> bool {
        self.size() == other.size() && self.iter().all(|e| other.contains(e))
    }

    fn hash_code(&self) -> i32 {
        self.iter().fold(0i32, |h, e| h.wrapping_add(e.hash_code()))
    }
}

impl<E: Identity> PartialEq for Set<E> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<E: Identity> Eq for Set<E> {}

impl<E: Identity + fmt::Display> fmt::Display for Set<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sequence(f, self.table.iter().map(|(e, _)| e))
    }
}

impl<E: Identity> FromIterator<E> for Set<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut set = Set::new();
        set.extend(iter);
        set
    }
}

impl<E: Identity> Extend<E> for Set<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for e in iter {
            self.add(e);
        }
    }
}

impl<E: Identity> IntoIterator for Set<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        let elements: Vec<E> = self.table.into_entries().map(|(e, _)| e).collect();
        elements.into_iter()
    }
}
