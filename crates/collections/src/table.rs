//! Insertion-ordered identity hash table
//!
//! Backing store for [`crate::Set`] and [`crate::Map`].
//!
//! # Design
//!
//! - `entries`: dense slot vector in insertion order; removed slots become
//!   `None` tombstones so live slot numbers stay stable while a cursor walks
//! - `index`: `hash_code` → slots with that hash. Most buckets hold a single
//!   slot, so a `SmallVec` keeps them inline
//! - Lookups bucket by `hash_code` then disambiguate with `equals`
//!
//! Tombstones are compacted on insert once they outnumber live entries.
//! Compaction renumbers slots, so it never runs during removal.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;
use valuekit_core::Identity;

/// Compaction is skipped below this many tombstones
const MIN_COMPACT_TOMBSTONES: usize = 16;

#[derive(Debug, Clone)]
pub(crate) struct IdentityTable<K, V> {
    entries: Vec<Option<(K, V)>>,
    index: FxHashMap<i32, SmallVec<[usize; 2]>>,
    live: usize,
}

impl<K, V> Default for IdentityTable<K, V> {
    fn default() -> Self {
        IdentityTable {
            entries: Vec::new(),
            index: FxHashMap::default(),
            live: 0,
        }
    }
}

impl<K: Identity, V> IdentityTable<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        IdentityTable {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            live: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Slot of the entry whose key equals `key`
    pub(crate) fn find(&self, key: &K) -> Option<usize> {
        let bucket = self.index.get(&key.hash_code())?;
        bucket.iter().copied().find(|&slot| {
            matches!(&self.entries[slot], Some((k, _)) if k.equals(key))
        })
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.find(key).and_then(|slot| self.entry_at(slot)).map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let slot = self.find(key)?;
        self.entries[slot].as_mut().map(|(_, v)| v)
    }

    pub(crate) fn entry_at(&self, slot: usize) -> Option<&(K, V)> {
        self.entries.get(slot).and_then(Option::as_ref)
    }

    pub(crate) fn entry_at_mut(&mut self, slot: usize) -> Option<&mut (K, V)> {
        self.entries.get_mut(slot).and_then(Option::as_mut)
    }

    /// Insert or replace. An existing entry keeps its key and position;
    /// the previous value is returned.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.find(&key) {
            return self.entries[slot]
                .as_mut()
                .map(|(_, v)| std::mem::replace(v, value));
        }
        let slot = self.reserve_slot(&key);
        self.entries[slot] = Some((key, value));
        None
    }

    /// Value for `key`, inserting `make(&key)` at the end when absent
    pub(crate) fn get_or_insert_with(&mut self, key: K, make: impl FnOnce(&K) -> V) -> &mut V {
        let slot = match self.find(&key) {
            Some(slot) => slot,
            None => self.reserve_slot(&key),
        };
        let (_, value) = self.entries[slot].get_or_insert_with(|| {
            let value = make(&key);
            (key, value)
        });
        value
    }

    /// Insert `value`, or replace the existing value with `remap(existing, value)`
    /// in place so the entry keeps its position
    pub(crate) fn merge(&mut self, key: K, value: V, remap: impl FnOnce(V, V) -> V) {
        match self.find(&key) {
            Some(slot) => {
                if let Some((k, existing)) = self.entries[slot].take() {
                    self.entries[slot] = Some((k, remap(existing, value)));
                }
            }
            None => {
                self.insert(key, value);
            }
        }
    }

    /// Append an empty slot indexed under `key`'s hash; the caller fills it
    fn reserve_slot(&mut self, key: &K) -> usize {
        self.compact_if_sparse();
        let slot = self.entries.len();
        self.index.entry(key.hash_code()).or_default().push(slot);
        self.entries.push(None);
        self.live += 1;
        slot
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let slot = self.find(key)?;
        self.remove_slot(slot)
    }

    /// Tombstone a slot. Slot numbers of other entries are unchanged.
    pub(crate) fn remove_slot(&mut self, slot: usize) -> Option<(K, V)> {
        let (key, value) = self.entries.get_mut(slot)?.take()?;
        let hash = key.hash_code();
        if let Some(bucket) = self.index.get_mut(&hash) {
            bucket.retain(|s| *s != slot);
            if bucket.is_empty() {
                self.index.remove(&hash);
            }
        }
        self.live -= 1;
        Some((key, value))
    }

    /// First occupied slot at or after `from`
    pub(crate) fn next_occupied(&self, from: usize) -> Option<usize> {
        (from..self.entries.len()).find(|&slot| self.entries[slot].is_some())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &(K, V)> + '_ {
        self.entries.iter().filter_map(Option::as_ref)
    }

    /// Consume the table into its entries in slot order
    pub(crate) fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.entries.into_iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut (K, V)> + '_ {
        self.entries.iter_mut().filter_map(Option::as_mut)
    }

    /// Remove every entry for which `keep` is false; returns whether any was removed
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) -> bool {
        let doomed: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(slot, e)| match e {
                Some((k, v)) if !keep(k, v) => Some(slot),
                _ => None,
            })
            .collect();
        for slot in &doomed {
            self.remove_slot(*slot);
        }
        self.compact_if_sparse();
        !doomed.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.live = 0;
    }

    fn compact_if_sparse(&mut self) {
        let tombstones = self.entries.len() - self.live;
        if tombstones < MIN_COMPACT_TOMBSTONES || tombstones <= self.live {
            return;
        }
        trace!(
            target: "valuekit::collections",
            live = self.live,
            tombstones,
            "compacting identity table"
        );
        let entries: Vec<Option<(K, V)>> = self.entries.drain(..).filter(Option::is_some).collect();
        self.index.clear();
        for (slot, entry) in entries.iter().enumerate() {
            if let Some((k, _)) = entry {
                self.index.entry(k.hash_code()).or_default().push(slot);
            }
        }
        self.entries = entries;
    }
}

impl<K: Identity, V> FromIterator<(K, V)> for IdentityTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut table = IdentityTable::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Key whose hash collides for every value
    #[derive(Debug, Clone, PartialEq)]
    struct Colliding(i32);

    impl Identity for Colliding {
        fn equals(&self, other: &Self) -> bool {
            self.0 == other.0
        }

        fn hash_code(&self) -> i32 {
            42
        }
    }

    #[test]
    fn test_insert_and_replace() {
        let mut table = IdentityTable::default();
        assert_eq!(table.insert("a".to_string(), 1), None);
        assert_eq!(table.insert("a".to_string(), 2), Some(1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&"a".to_string()), Some(&2));
    }

    #[test]
    fn test_collisions_disambiguated_by_equals() {
        let mut table = IdentityTable::default();
        table.insert(Colliding(1), "one");
        table.insert(Colliding(2), "two");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&Colliding(2)), Some(&"two"));
        assert_eq!(table.remove(&Colliding(1)), Some((Colliding(1), "one")));
        assert_eq!(table.get(&Colliding(1)), None);
        assert_eq!(table.get(&Colliding(2)), Some(&"two"));
    }

    #[test]
    fn test_insertion_order_and_reinsert_moves_to_end() {
        let mut table: IdentityTable<i32, ()> = (1..=3).map(|i| (i, ())).collect();
        table.remove(&1);
        table.insert(1, ());
        let keys: Vec<i32> = table.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![2, 3, 1]);
    }

    #[test]
    fn test_remove_slot_keeps_other_slots() {
        let mut table: IdentityTable<i32, ()> = (0..4).map(|i| (i, ())).collect();
        table.remove_slot(1);
        assert_eq!(table.next_occupied(1), Some(2));
        assert_eq!(table.entry_at(3).map(|(k, _)| *k), Some(3));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_compaction_preserves_contents() {
        let mut table = IdentityTable::default();
        for i in 0..100 {
            table.insert(i, i * 10);
        }
        for i in 0..90 {
            table.remove(&i);
        }
        table.insert(1000, 0);
        assert_eq!(table.len(), 11);
        assert!(table.entries.len() < 100);
        for i in 90..100 {
            assert_eq!(table.get(&i), Some(&(i * 10)));
        }
        let keys: Vec<i32> = table.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.first(), Some(&90));
        assert_eq!(keys.last(), Some(&1000));
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut table: IdentityTable<i32, Vec<i32>> = IdentityTable::default();
        table.get_or_insert_with(1, |_| Vec::new()).push(10);
        table.get_or_insert_with(1, |_| unreachable!()).push(11);
        table.get_or_insert_with(2, |k| vec![*k]);
        assert_eq!(table.get(&1), Some(&vec![10, 11]));
        assert_eq!(table.get(&2), Some(&vec![2]));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_retain() {
        let mut table: IdentityTable<i32, ()> = (0..10).map(|i| (i, ())).collect();
        assert!(table.retain(|k, _| k % 2 == 0));
        assert_eq!(table.len(), 5);
        assert!(!table.retain(|_, _| true));
    }
}
