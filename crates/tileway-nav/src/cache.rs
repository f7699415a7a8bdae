use std::collections::HashMap;

use crate::{Cell, MovementPolicy, PathResult};

/// Full identity of a search: any grid mutation bumps the version, which
/// changes the key, so a stale entry can never be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathKey {
    pub start: Cell,
    pub goal: Cell,
    pub policy: MovementPolicy,
    pub grid_version: u64,
    pub smoothed: bool,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: PathResult,
    last_used: u64,
}

/// Bounded memo of recent search results with least-recently-used eviction.
///
/// Purely an optimization: disabling it must not change any observable
/// [`PathResult`] path, only latency.
#[derive(Debug)]
pub struct PathCache {
    capacity: usize,
    stamp: u64,
    entries: HashMap<PathKey, CacheEntry>,
}

impl PathCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            stamp: 0,
            entries: HashMap::with_capacity(capacity.max(1)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Refreshes the entry's recency on hit.
    pub fn lookup(&mut self, key: &PathKey) -> Option<PathResult> {
        self.stamp += 1;
        let entry = self.entries.get_mut(key)?;
        entry.last_used = self.stamp;
        Some(entry.result.clone())
    }

    pub fn store(&mut self, key: PathKey, result: PathResult) {
        // Entries keyed to older grid versions are dead weight; drop them
        // before considering eviction.
        self.entries
            .retain(|k, _| k.grid_version >= key.grid_version);

        self.stamp += 1;
        let stamp = self.stamp;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(key, CacheEntry {
            result,
            last_used: stamp,
        });
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| *k);
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
