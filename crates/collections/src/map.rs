//! Key-value mapping keyed by [`Identity`]
//!
//! # Views
//!
//! `key_set`, `values` and `entry_set` are live: each borrows the map
//! mutably, and removals or value updates made through a view (or through
//! its cursor) land in the map itself. Views cannot add entries.
//!
//! Iteration follows key insertion order. Replacing the value of an
//! existing key keeps the key's original position.

use crate::collection::Collection;
use crate::cursor::{entry_of, key_of, value_of, EntryCursor, KeyCursor, TableCursor, ValueCursor};
use crate::table::IdentityTable;
use std::fmt;
use valuekit_core::Identity;

/// Insertion-ordered hash map
#[derive(Debug, Clone)]
pub struct Map<K, V> {
    table: IdentityTable<K, V>,
}

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Map {
            table: IdentityTable::default(),
        }
    }
}

impl<K: Identity, V> Map<K, V> {
    /// Empty map
    pub fn new() -> Self {
        Map::default()
    }

    /// Empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Map {
            table: IdentityTable::with_capacity(capacity),
        }
    }

    /// Number of entries
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Associate `value` with `key`; returns the previous value, if any
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Value for `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    /// Mutable value for `key`
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key)
    }

    /// Value for `key`, or `default` when absent. Never mutates the map.
    pub fn get_or_default<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.table.get(key).unwrap_or(default)
    }

    /// True if an entry for `key` exists
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.find(key).is_some()
    }

    /// Write `value` only when `key` is absent; returns the existing value otherwise
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.table.find(&key) {
            Some(slot) => self.table.entry_at(slot).map(|(_, v)| v),
            None => {
                self.table.insert(key, value);
                None
            }
        }
    }

    /// Value for `key`, inserting `make(&key)` first when absent
    pub fn compute_if_absent(&mut self, key: K, make: impl FnOnce(&K) -> V) -> &mut V {
        self.table.get_or_insert_with(key, make)
    }

    /// Insert `value` when `key` is absent, otherwise replace the existing
    /// value with `remap(existing, value)`
    pub fn merge(&mut self, key: K, value: V, remap: impl FnOnce(V, V) -> V) {
        self.table.merge(key, value, remap);
    }

    /// Remove the entry for `key`; returns its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove(key).map(|(_, v)| v)
    }

    /// Replace the value only when `key` is present; returns the previous value
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        self.table
            .get_mut(key)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Put every entry of `entries`
    pub fn put_all<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (k, v) in entries {
            self.table.insert(k, v);
        }
    }

    /// Apply `f` to each entry in iteration order
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.table.iter() {
            f(k, v);
        }
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Borrowing iterator over `(key, value)` entries
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.table.iter().map(|(k, v)| (k, v))
    }

    /// Borrowing iterator over keys
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.table.iter().map(|(k, _)| k)
    }

    /// Borrowing iterator over values
    pub fn values_iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.table.iter().map(|(_, v)| v)
    }

    /// Entry cursor in iteration order
    pub fn iterator(&mut self) -> EntryCursor<'_, K, V> {
        TableCursor::new(&mut self.table, entry_of)
    }

    /// Live view of the keys
    pub fn key_set(&mut self) -> KeySet<'_, K, V> {
        KeySet {
            table: &mut self.table,
        }
    }

    /// Live view of the values
    pub fn values(&mut self) -> Values<'_, K, V> {
        Values {
            table: &mut self.table,
        }
    }

    /// Live view of the entries
    pub fn entry_set(&mut self) -> EntrySet<'_, K, V> {
        EntrySet {
            table: &mut self.table,
        }
    }
}

impl<K: Identity, V: Identity> Map<K, V> {
    /// True if some entry holds a value equal to `value`
    pub fn contains_value(&self, value: &V) -> bool {
        self.table.iter().any(|(_, v)| v.equals(value))
    }
}

/// Equal when both map equal keys to equal values
impl<K: Identity, V: Identity> Identity for Map<K, V> {
    fn equals(&self, other: &Self) -> bool {
        self.size() == other.size()
            && self
                .table
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |w| v.equals(w)))
    }

    fn hash_code(&self) -> i32 {
        self.table
            .iter()
            .fold(0i32, |h, (k, v)| h.wrapping_add(k.hash_code() ^ v.hash_code()))
    }
}

impl<K: Identity, V: Identity> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<K: Identity, V: Identity> Eq for Map<K, V> {}

impl<K: Identity + fmt::Display, V: fmt::Display> fmt::Display for Map<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.table.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        f.write_str("}")
    }
}

impl<K: Identity, V> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Map {
            table: iter.into_iter().collect(),
        }
    }
}

impl<K: Identity, V> Extend<(K, V)> for Map<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<K: Identity, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_entries().collect::<Vec<_>>().into_iter()
    }
}

// ============================================================================
// Live views
// ============================================================================

/// Live view of a map's keys
pub struct KeySet<'a, K, V> {
    table: &'a mut IdentityTable<K, V>,
}

impl<'a, K: Identity, V> KeySet<'a, K, V> {
    /// Number of keys
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// True if there are no keys
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// True if `key` is present
    pub fn contains(&self, key: &K) -> bool {
        self.table.find(key).is_some()
    }

    /// Remove `key` and its entry from the map
    pub fn remove(&mut self, key: &K) -> bool {
        self.table.remove(key).is_some()
    }

    /// Keep only keys that are members of `other`
    pub fn retain_all<C: Collection<K> + ?Sized>(&mut self, other: &C) -> bool {
        self.table.retain(|k, _| other.contains(k))
    }

    /// Remove keys that are members of `other`
    pub fn remove_all<C: Collection<K> + ?Sized>(&mut self, other: &C) -> bool {
        self.table.retain(|k, _| !other.contains(k))
    }

    /// Remove every entry from the map
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Borrowing iterator over keys
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.table.iter().map(|(k, _)| k)
    }

    /// Key cursor
    pub fn iterator(&mut self) -> KeyCursor<'_, K, V> {
        TableCursor::new(&mut *self.table, key_of)
    }
}

/// Live view of a map's values
pub struct Values<'a, K, V> {
    table: &'a mut IdentityTable<K, V>,
}

impl<'a, K: Identity, V> Values<'a, K, V> {
    /// Number of values
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// True if there are no values
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Remove every entry whose value matches `pred`
    pub fn remove_if(&mut self, mut pred: impl FnMut(&V) -> bool) -> bool {
        self.table.retain(|_, v| !pred(v))
    }

    /// Remove every entry from the map
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Borrowing iterator over values
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.table.iter().map(|(_, v)| v)
    }

    /// Mutable iterator over values
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.table.iter_mut().map(|(_, v)| v)
    }

    /// Value cursor
    pub fn iterator(&mut self) -> ValueCursor<'_, K, V> {
        TableCursor::new(&mut *self.table, value_of)
    }
}

impl<'a, K: Identity, V: Identity> Values<'a, K, V> {
    /// True if some entry holds a value equal to `value`
    pub fn contains(&self, value: &V) -> bool {
        self.table.iter().any(|(_, v)| v.equals(value))
    }

    /// Remove the first entry holding a value equal to `value`
    pub fn remove(&mut self, value: &V) -> bool {
        let mut slot = self.table.next_occupied(0);
        while let Some(s) = slot {
            if matches!(self.table.entry_at(s), Some((_, v)) if v.equals(value)) {
                self.table.remove_slot(s);
                return true;
            }
            slot = self.table.next_occupied(s + 1);
        }
        false
    }
}

/// Live view of a map's `(key, value)` entries
pub struct EntrySet<'a, K, V> {
    table: &'a mut IdentityTable<K, V>,
}

impl<'a, K: Identity, V> EntrySet<'a, K, V> {
    /// Number of entries
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Keep only entries for which `keep` returns true
    pub fn retain(&mut self, keep: impl FnMut(&K, &V) -> bool) -> bool {
        self.table.retain(keep)
    }

    /// Remove every entry from the map
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Borrowing iterator over entries
    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> + '_ {
        self.table.iter()
    }

    /// Entry cursor supporting `set_value`
    pub fn iterator(&mut self) -> EntryCursor<'_, K, V> {
        TableCursor::new(&mut *self.table, entry_of)
    }
}

impl<'a, K: Identity, V: Identity> EntrySet<'a, K, V> {
    /// True if the map holds `entry.0` mapped to a value equal to `entry.1`
    pub fn contains(&self, entry: &(K, V)) -> bool {
        self.table.get(&entry.0).map_or(false, |v| v.equals(&entry.1))
    }

    /// Remove the entry when both key and value match
    pub fn remove(&mut self, entry: &(K, V)) -> bool {
        if !self.contains(entry) {
            return false;
        }
        self.table.remove(&entry.0).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::list::List;

    fn sample() -> Map<String, i32> {
        vec![("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn key(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_put_returns_previous() {
        let mut m = Map::new();
        assert_eq!(m.put(key("k"), 1), None);
        assert_eq!(m.put(key("k"), 2), Some(1));
        assert_eq!(m.size(), 1);
        assert_eq!(m.get(&key("k")), Some(&2));
    }

    #[test]
    fn test_put_if_absent_and_get_or_default() {
        let mut m = sample();
        assert_eq!(m.put_if_absent(key("a"), 100), Some(&1));
        assert_eq!(m.put_if_absent(key("z"), 26), None);
        assert_eq!(m.get(&key("z")), Some(&26));
        assert_eq!(*m.get_or_default(&key("nope"), &-1), -1);
        assert!(!m.contains_key(&key("nope")));
    }

    #[test]
    fn test_replace_only_when_present() {
        let mut m = sample();
        assert_eq!(m.replace(&key("a"), 10), Some(1));
        assert_eq!(m.replace(&key("q"), 10), None);
        assert!(!m.contains_key(&key("q")));
        assert!(m.contains_value(&10));
    }

    #[test]
    fn test_compute_if_absent_and_merge() {
        let mut m: Map<String, List<i32>> = Map::new();
        m.compute_if_absent(key("odd"), |_| List::new()).add(1);
        m.compute_if_absent(key("odd"), |_| List::new()).add(3);
        assert_eq!(m.get(&key("odd")).map(List::size), Some(2));

        let mut counts: Map<char, i64> = Map::new();
        for c in "abca".chars() {
            counts.merge(c, 1, |old, new| old + new);
        }
        assert_eq!(counts.get(&'a'), Some(&2));
        assert_eq!(counts.to_string(), "{a=2, b=1, c=1}");
    }

    #[test]
    fn test_key_set_view_is_live() {
        let mut m = sample();
        {
            let mut keys = m.key_set();
            assert!(keys.remove(&key("a")));
            assert!(keys.contains(&key("b")));
        }
        assert!(!m.contains_key(&key("a")));
        m.key_set().retain_all(&List::from(vec![key("c")]));
        assert_eq!(m.to_string(), "{c=3}");
    }

    #[test]
    fn test_values_view_is_live() {
        let mut m = sample();
        assert!(m.values().remove(&2));
        assert!(!m.contains_key(&key("b")));
        for v in m.values().iter_mut() {
            *v *= 10;
        }
        assert_eq!(m.get(&key("c")), Some(&30));
        m.values().remove_if(|v| *v > 20);
        assert_eq!(m.size(), 1);
    }

    #[test]
    fn test_entry_set_cursor_set_value_writes_through() {
        let mut m = sample();
        {
            let mut entries = m.entry_set();
            let mut cursor = entries.iterator();
            while cursor.has_next() {
                let (k, v) = cursor.next().unwrap();
                if k == "b" {
                    cursor.remove().unwrap();
                } else {
                    let doubled = v * 2;
                    cursor.set_value(doubled).unwrap();
                }
            }
        }
        assert_eq!(m.to_string(), "{a=2, c=6}");
        assert!(!m.entry_set().remove(&(key("a"), 3)));
        assert!(m.entry_set().remove(&(key("a"), 2)));
        assert_eq!(m.size(), 1);
    }

    #[test]
    fn test_replacing_value_keeps_position() {
        let mut m = sample();
        m.put(key("a"), 9);
        let keys: Vec<&String> = m.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_identity() {
        let a = sample();
        let mut b: Map<String, i32> = Map::new();
        b.put(key("c"), 3);
        b.put(key("a"), 1);
        b.put(key("b"), 2);
        assert!(a.equals(&b));
        assert_eq!(a.hash_code(), b.hash_code());
        b.put(key("b"), 5);
        assert_ne!(a, b);
    }
}
