//! Iteration cursors with in-place removal
//!
//! A cursor holds its collection's unique mutable borrow, so no other path
//! can mutate the collection while it is alive. Structural changes are only
//! possible through the cursor's own `remove` / `add`.
//!
//! # Protocol
//!
//! - `remove` is valid once per successful `next` (or `previous`); otherwise
//!   it fails with `Error::IllegalState`
//! - `set` on a [`ListCursor`] needs a preceding `next`/`previous` with no
//!   `remove`/`add` in between
//! - `next`/`previous` past either end fail with `Error::NoSuchElement`

use crate::table::IdentityTable;
use valuekit_core::{Error, Identity, Result};

/// Forward cursor over a collection
pub trait Cursor {
    /// Element type yielded by `next`
    type Item: ?Sized;

    /// True if `next` would succeed
    fn has_next(&self) -> bool;

    /// Advance and return the next element
    fn next(&mut self) -> Result<&Self::Item>;

    /// Remove the element last returned by `next`
    fn remove(&mut self) -> Result<()>;

    /// Apply `f` to every remaining element
    fn for_each_remaining<F: FnMut(&Self::Item)>(&mut self, mut f: F)
    where
        Self: Sized,
    {
        while let Ok(item) = self.next() {
            f(item);
        }
    }
}

fn no_such_element() -> Error {
    Error::no_such_element("cursor exhausted")
}

fn out_of_protocol(op: &str) -> Error {
    Error::illegal_state(format!("{} called without a preceding next or previous", op))
}

// ============================================================================
// List cursor
// ============================================================================

/// Bidirectional cursor over a list or a sub-list window
pub struct ListCursor<'a, E> {
    items: &'a mut Vec<E>,
    /// First index of the window in `items`
    base: usize,
    /// End of the window when it is a sub-list; `None` means the end of `items`
    bound: Option<&'a mut usize>,
    /// Position relative to `base`
    cursor: usize,
    last: Option<usize>,
}

impl<'a, E> ListCursor<'a, E> {
    pub(crate) fn new(
        items: &'a mut Vec<E>,
        base: usize,
        bound: Option<&'a mut usize>,
        start: usize,
    ) -> Self {
        ListCursor {
            items,
            base,
            bound,
            cursor: start,
            last: None,
        }
    }

    fn len(&self) -> usize {
        match &self.bound {
            Some(end) => **end - self.base,
            None => self.items.len() - self.base,
        }
    }

    /// True if `previous` would succeed
    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    /// Step back and return the previous element
    pub fn previous(&mut self) -> Result<&E> {
        if self.cursor == 0 {
            return Err(no_such_element());
        }
        self.cursor -= 1;
        self.last = Some(self.cursor);
        Ok(&self.items[self.base + self.cursor])
    }

    /// Index `next` would return
    pub fn next_index(&self) -> usize {
        self.cursor
    }

    /// Index `previous` would return, or -1 at the start
    pub fn previous_index(&self) -> i64 {
        self.cursor as i64 - 1
    }

    /// Replace the element last returned by `next` or `previous`
    pub fn set(&mut self, e: E) -> Result<()> {
        let last = self.last.ok_or_else(|| out_of_protocol("set"))?;
        self.items[self.base + last] = e;
        Ok(())
    }

    /// Insert before the element `next` would return
    pub fn add(&mut self, e: E) {
        self.items.insert(self.base + self.cursor, e);
        if let Some(end) = self.bound.as_deref_mut() {
            *end += 1;
        }
        self.cursor += 1;
        self.last = None;
    }
}

impl<'a, E> Cursor for ListCursor<'a, E> {
    type Item = E;

    fn has_next(&self) -> bool {
        self.cursor < self.len()
    }

    fn next(&mut self) -> Result<&E> {
        if !self.has_next() {
            return Err(no_such_element());
        }
        let index = self.cursor;
        self.cursor += 1;
        self.last = Some(index);
        Ok(&self.items[self.base + index])
    }

    fn remove(&mut self) -> Result<()> {
        let last = self.last.take().ok_or_else(|| out_of_protocol("remove"))?;
        self.items.remove(self.base + last);
        if let Some(end) = self.bound.as_deref_mut() {
            *end -= 1;
        }
        if last < self.cursor {
            self.cursor -= 1;
        }
        Ok(())
    }
}

// ============================================================================
// Table cursor (sets and map views)
// ============================================================================

pub(crate) fn element_of<E>(entry: &(E, ())) -> &E {
    &entry.0
}

pub(crate) fn key_of<K, V>(entry: &(K, V)) -> &K {
    &entry.0
}

pub(crate) fn value_of<K, V>(entry: &(K, V)) -> &V {
    &entry.1
}

pub(crate) fn entry_of<K, V>(entry: &(K, V)) -> &(K, V) {
    entry
}

/// Cursor over an identity table, projecting each entry to `T`
pub struct TableCursor<'a, K, V, T: ?Sized> {
    table: &'a mut IdentityTable<K, V>,
    next_slot: Option<usize>,
    last: Option<usize>,
    project: fn(&(K, V)) -> &T,
}

/// Cursor over a [`crate::Set`]
pub type SetCursor<'a, E> = TableCursor<'a, E, (), E>;
/// Cursor over a map's keys
pub type KeyCursor<'a, K, V> = TableCursor<'a, K, V, K>;
/// Cursor over a map's values
pub type ValueCursor<'a, K, V> = TableCursor<'a, K, V, V>;
/// Cursor over a map's `(key, value)` entries
pub type EntryCursor<'a, K, V> = TableCursor<'a, K, V, (K, V)>;

impl<'a, K: Identity, V, T: ?Sized> TableCursor<'a, K, V, T> {
    pub(crate) fn new(table: &'a mut IdentityTable<K, V>, project: fn(&(K, V)) -> &T) -> Self {
        let next_slot = table.next_occupied(0);
        TableCursor {
            table,
            next_slot,
            last: None,
            project,
        }
    }
}

impl<'a, K: Identity, V, T: ?Sized> Cursor for TableCursor<'a, K, V, T> {
    type Item = T;

    fn has_next(&self) -> bool {
        self.next_slot.is_some()
    }

    fn next(&mut self) -> Result<&T> {
        let slot = self.next_slot.ok_or_else(no_such_element)?;
        self.next_slot = self.table.next_occupied(slot + 1);
        self.last = Some(slot);
        let entry = self.table.entry_at(slot).ok_or_else(no_such_element)?;
        Ok((self.project)(entry))
    }

    fn remove(&mut self) -> Result<()> {
        let slot = self.last.take().ok_or_else(|| out_of_protocol("remove"))?;
        self.table.remove_slot(slot);
        Ok(())
    }
}

impl<'a, K: Identity, V> TableCursor<'a, K, V, (K, V)> {
    /// Replace the value of the entry last returned by `next`; returns the old value
    pub fn set_value(&mut self, value: V) -> Result<V> {
        let slot = self.last.ok_or_else(|| out_of_protocol("set_value"))?;
        let entry = self
            .table
            .entry_at_mut(slot)
            .ok_or_else(|| Error::illegal_state("entry was removed"))?;
        Ok(std::mem::replace(&mut entry.1, value))
    }
}
