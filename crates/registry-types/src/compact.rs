//! # Compact Set
//!
//! Dense, index-addressable, duplicate-free collection with O(1)
//! `create`/`remove`/`exists`.
//!
//! ## Ordering Warning
//!
//! Removal uses swap-and-pop: the LAST element is moved into the removed
//! element's slot and the tail is popped. After any `remove`:
//!
//! - iteration order is NOT insertion order,
//! - the element that used to be last now reports a different index,
//! - any index obtained before the removal may point at a different element.
//!
//! Never iterate by index while mutating the set, and never persist an index
//! passed to `search` across mutations. Snapshot with
//! `to_vec()` first if you need to mutate while walking.
//!
//! ## Invariants
//!
//! - `index_of[a]` is defined iff `a` is in `items`
//! - `items[index_of[a]] == a` for every member
//! - `items.len() == index_of.len()`

use crate::entities::Address;
use crate::errors::CompactSetError;
use std::collections::HashMap;
use std::hash::Hash;

/// A compact set of addresses.
pub type CompactAddressSet = CompactSet<Address>;

/// Swap-and-pop set backed by a dense vector plus an index map.
#[derive(Debug, Clone)]
pub struct CompactSet<T> {
    items: Vec<T>,
    index_of: HashMap<T, usize>,
}

impl<T> Default for CompactSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index_of: HashMap::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> CompactSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item`. Fails if it is already a member.
    pub fn create(&mut self, item: T) -> Result<(), CompactSetError> {
        if self.index_of.contains_key(&item) {
            return Err(CompactSetError::AlreadyPresent);
        }
        self.index_of.insert(item, self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Remove `item`, relocating the last element into its slot.
    pub fn remove(&mut self, item: T) -> Result<(), CompactSetError> {
        let index = self
            .index_of
            .remove(&item)
            .ok_or(CompactSetError::NotPresent)?;

        let last = self.items.len() - 1;
        if index != last {
            let moved = self.items[last];
            self.items[index] = moved;
            self.index_of.insert(moved, index);
        }
        self.items.pop();
        Ok(())
    }

    /// Membership test.
    pub fn exists(&self, item: &T) -> bool {
        self.index_of.contains_key(item)
    }

    /// Element currently stored at `index`, if any.
    pub fn search(&self, index: usize) -> Option<T> {
        self.items.get(index).copied()
    }

    /// Number of members.
    pub fn length(&self) -> usize {
        self.items.len()
    }

    /// True when the set has no members.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Owned snapshot in current slot order.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}
