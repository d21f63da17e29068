//! LIFO facade over [`List`]
//!
//! The top of the stack is the end of the list, so `push` appends and
//! `pop` removes the last element. `Stack` dereferences to its list for
//! everything else.

use crate::collection::Collection;
use crate::list::List;
use std::fmt;
use std::ops::{Deref, DerefMut};
use valuekit_core::{Error, Identity, Result};

fn empty_stack() -> Error {
    Error::no_such_element("stack is empty")
}

/// Last-in first-out stack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stack<E> {
    list: List<E>,
}

impl<E> Default for Stack<E> {
    fn default() -> Self {
        Stack { list: List::new() }
    }
}

impl<E> Stack<E> {
    /// Empty stack
    pub fn new() -> Self {
        Stack::default()
    }

    /// Push `e` onto the top; returns a reference to it
    pub fn push(&mut self, e: E) -> &E {
        self.list.add(e);
        let top = self.list.size() - 1;
        &self.list[top]
    }

    /// Remove and return the top element
    pub fn pop(&mut self) -> Result<E> {
        self.list.pop_last().ok_or_else(empty_stack)
    }

    /// Top element without removing it
    pub fn peek(&self) -> Result<&E> {
        self.list.last().ok_or_else(empty_stack)
    }

    /// True if the stack has no elements
    pub fn empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Consume the stack into its list, bottom first
    pub fn into_list(self) -> List<E> {
        self.list
    }
}

impl<E: Identity> Stack<E> {
    /// 1-based distance of `e` from the top, or -1 when absent
    pub fn search(&self, e: &E) -> i64 {
        match self.list.last_index_of(e) {
            -1 => -1,
            index => self.list.size() as i64 - index,
        }
    }
}

impl<E> Deref for Stack<E> {
    type Target = List<E>;

    fn deref(&self) -> &List<E> {
        &self.list
    }
}

impl<E> DerefMut for Stack<E> {
    fn deref_mut(&mut self) -> &mut List<E> {
        &mut self.list
    }
}

impl<E: Identity> Collection<E> for Stack<E> {
    fn size(&self) -> usize {
        self.list.size()
    }

    fn contains(&self, e: &E) -> bool {
        Collection::contains(&self.list, e)
    }

    fn add(&mut self, e: E) -> bool {
        self.list.add(e);
        true
    }

    fn remove(&mut self, e: &E) -> bool {
        Collection::remove(&mut self.list, e)
    }

    fn remove_if(&mut self, pred: &mut dyn FnMut(&E) -> bool) -> bool {
        self.list.remove_if(pred)
    }

    fn clear(&mut self) {
        self.list.clear();
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &E> + '_> {
        self.list.elements()
    }
}

impl<E: Identity> Identity for Stack<E> {
    fn equals(&self, other: &Self) -> bool {
        self.list.equals(&other.list)
    }

    fn hash_code(&self) -> i32 {
        self.list.hash_code()
    }
}

impl<E: fmt::Display> fmt::Display for Stack<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.list, f)
    }
}

impl<E> FromIterator<E> for Stack<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Stack {
            list: iter.into_iter().collect(),
        }
    }
}

impl<E> IntoIterator for Stack<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}
