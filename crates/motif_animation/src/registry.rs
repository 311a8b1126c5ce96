//! Registry of one-shot animations that already played
//!
//! Message lists animate each message in once. The registry remembers which
//! ids were seen so a re-rendered list does not replay them. It is owned by
//! the caller (typically one per conversation view) and bounded: the least
//! recently seen ids are evicted past capacity.

use lru::LruCache;
use std::num::NonZeroUsize;

/// Default number of remembered ids
pub const DEFAULT_REGISTRY_CAPACITY: usize = 512;

/// Bounded LRU set of ids whose entrance animation already ran
pub struct PlayedRegistry {
    played: LruCache<String, ()>,
}

impl PlayedRegistry {
    /// Create a registry remembering up to `capacity` ids (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            played: LruCache::new(capacity),
        }
    }

    /// Record `id` as played
    ///
    /// Returns `true` the first time an id is seen (the caller should animate
    /// it), `false` if it was already remembered.
    pub fn mark_played(&mut self, id: &str) -> bool {
        if self.played.get(id).is_some() {
            return false;
        }
        if let Some((evicted, ())) = self.played.push(id.to_string(), ()) {
            tracing::trace!("PlayedRegistry: evicted {}", evicted);
        }
        true
    }

    /// Check without refreshing the id's recency
    pub fn has_played(&self, id: &str) -> bool {
        self.played.contains(id)
    }

    /// Forget `id` so its animation plays again. Returns whether it was known.
    pub fn forget(&mut self, id: &str) -> bool {
        self.played.pop(id).is_some()
    }

    pub fn clear(&mut self) {
        self.played.clear();
    }

    pub fn len(&self) -> usize {
        self.played.len()
    }

    pub fn is_empty(&self) -> bool {
        self.played.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.played.cap().get()
    }
}

impl Default for PlayedRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_CAPACITY)
    }
}
