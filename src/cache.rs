/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;

use crate::Score;

/// Sentinel link for the ends of the recency list.
const NIL: usize = usize::MAX;

/// A single slot in the cache's backing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheEntry {
    /// Key of the position this entry represents.
    key: u64,

    /// Score of the position, relative to its side-to-move.
    score: Score,

    /// Index of the next-more-recently used entry.
    newer: usize,

    /// Index of the next-less-recently used entry.
    older: usize,
}

/// A bounded cache of position scores with least-recently-used eviction.
///
/// Used during a search to avoid re-evaluating positions that have already been seen.
/// Entries are keyed by a position's Zobrist key; collisions between distinct positions are accepted.
///
/// Every call to [`PositionCache::get`] that hits marks the entry as most recently used.
/// When the cache is full, [`PositionCache::put`] reclaims the slot of the least recently used entry.
#[derive(Debug)]
pub struct PositionCache {
    /// Maps a key to its slot in `entries`.
    index: HashMap<u64, usize>,

    /// Backing storage. Never grows beyond `capacity`.
    entries: Vec<CacheEntry>,

    /// Maximum number of entries.
    capacity: usize,

    /// Most recently used entry.
    newest: usize,

    /// Least recently used entry; the next one to be evicted.
    oldest: usize,

    /// Number of hits that have occurred since last clearing.
    pub(crate) hits: usize,

    /// Number of accesses that have occurred since last clearing.
    pub(crate) accesses: usize,
}

impl PositionCache {
    /// Default number of entries the cache can hold.
    pub const DEFAULT_CAPACITY: usize = 200_000;

    /// Maximum number of entries the cache can be configured to hold.
    pub const MAX_CAPACITY: usize = 10_000_000;

    /// Create a new [`PositionCache`] that can hold `capacity` entries.
    ///
    /// A capacity of zero disables caching entirely. Capacities above [`PositionCache::MAX_CAPACITY`] are capped.
    ///
    /// Storage grows as entries are inserted, so a large capacity costs nothing until it is filled.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            capacity: capacity.min(Self::MAX_CAPACITY),
            newest: NIL,
            oldest: NIL,
            hits: 0,
            accesses: 0,
        }
    }

    /// Maximum number of entries this cache can hold.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful lookups since the cache was last cleared.
    #[inline(always)]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of lookups since the cache was last cleared.
    #[inline(always)]
    pub fn accesses(&self) -> usize {
        self.accesses
    }

    /// Removes every entry and resets the hit counters. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
        self.newest = NIL;
        self.oldest = NIL;
        self.hits = 0;
        self.accesses = 0;
    }

    /// Fetch the score stored for `key`, marking it as the most recently used entry.
    pub fn get(&mut self, key: u64) -> Option<Score> {
        self.accesses += 1;

        let slot = *self.index.get(&key)?;
        self.hits += 1;
        self.touch(slot);

        Some(self.entries[slot].score)
    }

    /// Fetch the score stored for `key` without affecting recency or counters.
    #[inline(always)]
    pub fn peek(&self, key: u64) -> Option<Score> {
        self.index.get(&key).map(|&slot| self.entries[slot].score)
    }

    /// Store `score` for `key`, returning the key that was evicted to make room, if any.
    ///
    /// Storing an existing key overwrites its score and marks it as most recently used.
    pub fn put(&mut self, key: u64, score: Score) -> Option<u64> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].score = score;
            self.touch(slot);
            return None;
        }

        let entry = CacheEntry {
            key,
            score,
            newer: NIL,
            older: NIL,
        };

        // Room left: append a fresh slot
        if self.entries.len() < self.capacity {
            let slot = self.entries.len();
            self.entries.push(entry);
            self.index.insert(key, slot);
            self.push_newest(slot);
            return None;
        }

        // Full: recycle the oldest slot
        let slot = self.oldest;
        self.unlink(slot);
        let evicted = std::mem::replace(&mut self.entries[slot], entry).key;
        self.index.remove(&evicted);
        self.index.insert(key, slot);
        self.push_newest(slot);

        Some(evicted)
    }

    /// Moves `slot` to the front of the recency list.
    #[inline(always)]
    fn touch(&mut self, slot: usize) {
        if self.newest != slot {
            self.unlink(slot);
            self.push_newest(slot);
        }
    }

    /// Detaches `slot` from the recency list.
    fn unlink(&mut self, slot: usize) {
        let CacheEntry { newer, older, .. } = self.entries[slot];

        if newer == NIL {
            self.newest = older;
        } else {
            self.entries[newer].older = older;
        }

        if older == NIL {
            self.oldest = newer;
        } else {
            self.entries[older].newer = newer;
        }

        self.entries[slot].newer = NIL;
        self.entries[slot].older = NIL;
    }

    /// Attaches a detached `slot` as the most recently used entry.
    fn push_newest(&mut self, slot: usize) {
        self.entries[slot].older = self.newest;
        self.entries[slot].newer = NIL;

        if self.newest != NIL {
            self.entries[self.newest].newer = slot;
        }
        self.newest = slot;

        if self.oldest == NIL {
            self.oldest = slot;
        }
    }
}

impl Default for PositionCache {
    #[inline(always)]
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
