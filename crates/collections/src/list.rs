//! Ordered, duplicate-tolerant sequence
//!
//! `List` wraps a `Vec` and adds the identity-based lookups (`index_of`,
//! `remove`) and the checked positional API. Positions outside the valid
//! range fail with `Error::IndexOutOfRange` ("Index: i, Size: n").
//!
//! `sub_list` returns a live window: reads and writes through the
//! [`SubList`] go straight to the backing list.

use crate::collection::Collection;
use crate::comparator::Comparator;
use crate::cursor::ListCursor;
use std::fmt;
use std::ops::Index;
use valuekit_core::{ordered_hash, Error, Identity, Result};

fn check_index(index: usize, size: usize) -> Result<()> {
    if index < size {
        Ok(())
    } else {
        Err(Error::index_out_of_range(index, size))
    }
}

fn check_position(index: usize, size: usize) -> Result<()> {
    if index <= size {
        Ok(())
    } else {
        Err(Error::index_out_of_range(index, size))
    }
}

fn position_of<'a, E: Identity + 'a>(mut items: impl Iterator<Item = &'a E>, e: &E) -> i64 {
    items.position(|x| x.equals(e)).map_or(-1, |i| i as i64)
}

/// Growable ordered sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct List<E> {
    items: Vec<E>,
}

impl<E> Default for List<E> {
    fn default() -> Self {
        List { items: Vec::new() }
    }
}

impl<E> List<E> {
    /// Empty list
    pub fn new() -> Self {
        List::default()
    }

    /// Empty list with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        List {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Number of elements
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// True if there are no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append `e`
    pub fn add(&mut self, e: E) {
        self.items.push(e);
    }

    /// Insert `e` at `index`, shifting later elements right
    pub fn add_at(&mut self, index: usize, e: E) -> Result<()> {
        check_position(index, self.items.len())?;
        self.items.insert(index, e);
        Ok(())
    }

    /// Insert every item at `index` in iteration order; returns whether any was added
    pub fn add_all_at<I: IntoIterator<Item = E>>(&mut self, index: usize, items: I) -> Result<bool> {
        check_position(index, self.items.len())?;
        let before = self.items.len();
        self.items.splice(index..index, items);
        Ok(self.items.len() > before)
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Result<&E> {
        self.items
            .get(index)
            .ok_or_else(|| Error::index_out_of_range(index, self.items.len()))
    }

    /// Replace the element at `index`; returns the previous element
    pub fn set(&mut self, index: usize, e: E) -> Result<E> {
        check_index(index, self.items.len())?;
        Ok(std::mem::replace(&mut self.items[index], e))
    }

    /// Remove and return the element at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<E> {
        check_index(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Stable sort under `comparator`
    pub fn sort(&mut self, comparator: &Comparator<E>)
    where
        E: 'static,
    {
        self.items.sort_by(|a, b| comparator.compare(a, b));
    }

    /// Live view of `[from, to)`
    pub fn sub_list(&mut self, from: usize, to: usize) -> Result<SubList<'_, E>> {
        let size = self.items.len();
        if to > size {
            return Err(Error::index_out_of_range(to, size));
        }
        if from > to {
            return Err(Error::illegal_argument(format!(
                "fromIndex({}) > toIndex({})",
                from, to
            )));
        }
        Ok(SubList {
            items: &mut self.items,
            from,
            to,
        })
    }

    /// Cursor positioned before the first element
    pub fn iterator(&mut self) -> ListCursor<'_, E> {
        ListCursor::new(&mut self.items, 0, None, 0)
    }

    /// Cursor positioned before `index`
    pub fn list_iterator(&mut self, index: usize) -> Result<ListCursor<'_, E>> {
        check_position(index, self.items.len())?;
        Ok(ListCursor::new(&mut self.items, 0, None, index))
    }

    /// Borrowing iterator in list order
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    /// Elements as a slice
    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    /// Consume the list into its backing vector
    pub fn into_vec(self) -> Vec<E> {
        self.items
    }

    /// Last element
    pub(crate) fn last(&self) -> Option<&E> {
        self.items.last()
    }

    /// Remove the last element
    pub(crate) fn pop_last(&mut self) -> Option<E> {
        self.items.pop()
    }
}

impl<E: Identity> List<E> {
    /// First index of an element equal to `e`, or -1
    pub fn index_of(&self, e: &E) -> i64 {
        position_of(self.items.iter(), e)
    }

    /// Last index of an element equal to `e`, or -1
    pub fn last_index_of(&self, e: &E) -> i64 {
        match position_of(self.items.iter().rev(), e) {
            -1 => -1,
            from_end => self.items.len() as i64 - 1 - from_end,
        }
    }
}

impl<E: Identity> Collection<E> for List<E> {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn contains(&self, e: &E) -> bool {
        self.items.iter().any(|x| x.equals(e))
    }

    fn add(&mut self, e: E) -> bool {
        self.items.push(e);
        true
    }

    fn remove(&mut self, e: &E) -> bool {
        match self.items.iter().position(|x| x.equals(e)) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    fn remove_if(&mut self, pred: &mut dyn FnMut(&E) -> bool) -> bool {
        let before = self.items.len();
        self.items.retain(|e| !pred(e));
        self.items.len() != before
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &E> + '_> {
        Box::new(self.items.iter())
    }
}

impl<E: Identity> Identity for List<E> {
    fn equals(&self, other: &Self) -> bool {
        self.items.equals(&other.items)
    }

    fn hash_code(&self) -> i32 {
        ordered_hash(&self.items)
    }
}

pub(crate) fn write_sequence<'a, E: fmt::Display + 'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a E>,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, e) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", e)?;
    }
    f.write_str("]")
}

impl<E: fmt::Display> fmt::Display for List<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sequence(f, self.items.iter())
    }
}

impl<E> Index<usize> for List<E> {
    type Output = E;

    fn index(&self, index: usize) -> &E {
        &self.items[index]
    }
}

impl<E> From<Vec<E>> for List<E> {
    fn from(items: Vec<E>) -> Self {
        List { items }
    }
}

impl<E> FromIterator<E> for List<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        List {
            items: iter.into_iter().collect(),
        }
    }
}

impl<E> Extend<E> for List<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<E> IntoIterator for List<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a List<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// SubList
// ============================================================================

/// Live window `[from, to)` over a [`List`]
#[derive(Debug)]
pub struct SubList<'a, E> {
    items: &'a mut Vec<E>,
    from: usize,
    to: usize,
}

impl<'a, E> SubList<'a, E> {
    /// Number of elements in the window
    pub fn size(&self) -> usize {
        self.to - self.from
    }

    /// True if the window is empty
    pub fn is_empty(&self) -> bool {
        self.to == self.from
    }

    /// Element at window position `index`
    pub fn get(&self, index: usize) -> Result<&E> {
        check_index(index, self.size())?;
        Ok(&self.items[self.from + index])
    }

    /// Replace the element at window position `index`
    pub fn set(&mut self, index: usize, e: E) -> Result<E> {
        check_index(index, self.size())?;
        Ok(std::mem::replace(&mut self.items[self.from + index], e))
    }

    /// Append `e` at the end of the window
    pub fn add(&mut self, e: E) {
        self.items.insert(self.to, e);
        self.to += 1;
    }

    /// Insert `e` at window position `index`
    pub fn add_at(&mut self, index: usize, e: E) -> Result<()> {
        check_position(index, self.size())?;
        self.items.insert(self.from + index, e);
        self.to += 1;
        Ok(())
    }

    /// Remove and return the element at window position `index`
    pub fn remove_at(&mut self, index: usize) -> Result<E> {
        check_index(index, self.size())?;
        self.to -= 1;
        Ok(self.items.remove(self.from + index))
    }

    /// Remove every element of the window from the backing list
    pub fn clear(&mut self) {
        self.items.drain(self.from..self.to);
        self.to = self.from;
    }

    /// Elements of the window as a slice
    pub fn as_slice(&self) -> &[E] {
        &self.items[self.from..self.to]
    }

    /// Cursor over the window
    pub fn iterator(&mut self) -> ListCursor<'_, E> {
        ListCursor::new(&mut *self.items, self.from, Some(&mut self.to), 0)
    }
}

impl<'a, E: Identity> SubList<'a, E> {
    /// First window index of an element equal to `e`, or -1
    pub fn index_of(&self, e: &E) -> i64 {
        position_of(self.as_slice().iter(), e)
    }

    /// True if the window holds an element equal to `e`
    pub fn contains(&self, e: &E) -> bool {
        self.index_of(e) >= 0
    }
}

impl<'a, E: fmt::Display> fmt::Display for SubList<'a, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sequence(f, self.as_slice().iter())
    }
}
