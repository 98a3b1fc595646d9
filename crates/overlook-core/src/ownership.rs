//! Ownership Maps
//!
//! A key is present exactly while this engine holds an override on the
//! resource it names. The value is whatever is needed to undo the override.
//! Entries are only created by a successful write and only removed by a
//! restore, a confirmed destruction, or a global release.
//!
//! Keys are kept ordered so restores happen in the same order on every run.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct OwnershipMap<K, V> {
    entries: BTreeMap<K, V>,
}

impl<K, V> Default for OwnershipMap<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Copy + Ord, V> OwnershipMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record ownership of `key`. An existing entry is never replaced, so
    /// the saved state always reflects the value before the first override.
    /// Returns false when the key was already owned.
    pub fn claim(&mut self, key: K, value: V) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn owns(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.entries.get(&key)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.entries.get_mut(&key)
    }

    /// Drop ownership, returning the saved state.
    pub fn release(&mut self, key: K) -> Option<V> {
        self.entries.remove(&key)
    }

    /// Snapshot of owned keys, safe to iterate while mutating the map.
    pub fn keys(&self) -> Vec<K> {
        self.entries.keys().copied().collect()
    }

    /// Remove and return every entry.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        std::mem::take(&mut self.entries).into_iter().collect()
    }

    /// Keep only entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(K, &V) -> bool) {
        self.entries.retain(|k, v| keep(*k, v));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
