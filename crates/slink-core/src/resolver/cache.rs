//! Bounded LRU memo of resolve outcomes.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::plugin::Plugin;

/// Default number of remembered outcomes.
pub const DEFAULT_CAPACITY: usize = 128;

/// `(normalized url, follow_redirect)`.
pub type ResolveKey = (String, bool);

/// A memoized resolve outcome. Failures are remembered too.
#[derive(Debug, Clone)]
pub enum Outcome {
    Resolved(Arc<dyn Plugin>),
    NoPlugin,
}

/// LRU cache; the least recently used entry sits at index 0.
#[derive(Debug)]
pub struct ResolveCache {
    capacity: usize,
    entries: IndexMap<ResolveKey, Outcome>,
}

impl Default for ResolveCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ResolveCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::new(),
        }
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&mut self, key: &ResolveKey) -> Option<Outcome> {
        let idx = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(idx, last);
        self.entries.get_index(last).map(|(_, v)| v.clone())
    }

    /// Insert or refresh `key`, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: ResolveKey, outcome: Outcome) {
        if self.entries.shift_remove(&key).is_none() && self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, outcome);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
