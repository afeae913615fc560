// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path to leaf memo.
//!
//! Leaf handles never move once created, so a cached entry can only go stale if
//! the tree's shape changes under it. The cache is therefore cleared as a whole
//! on every mutation rather than tracked per entry.

use crate::domain::LeafId;
use std::collections::HashMap;

/// Caches resolved leaf handles by their full path text.
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: HashMap<String, LeafId>,
}

impl LookupCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached handle for `key`.
    pub fn get(&self, key: &str) -> Option<LeafId> {
        self.entries.get(key).copied()
    }

    /// Stores the handle for `key`.
    pub fn set(&mut self, key: impl Into<String>, id: LeafId) {
        self.entries.insert(key.into(), id);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_get_set() {
        let mut cache = LookupCache::new();
        assert_eq!(cache.get("general.port"), None);

        cache.set("general.port", LeafId(1));
        assert_eq!(cache.get("general.port"), Some(LeafId(1)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_overwrite() {
        let mut cache = LookupCache::new();
        cache.set("a.b", LeafId(1));
        cache.set("a.b", LeafId(2));
        assert_eq!(cache.get("a.b"), Some(LeafId(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = LookupCache::new();
        cache.set("a.b", LeafId(1));
        cache.set("c.d", LeafId(2));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a.b"), None);
    }

    #[test]
    fn test_cache_keys_are_raw_text() {
        let mut cache = LookupCache::new();
        cache.set("port", LeafId(0));
        assert_eq!(cache.get(".port"), None);
    }
}
