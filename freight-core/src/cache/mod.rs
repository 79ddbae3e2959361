//! Bounded in-memory cache with first-in, first-out eviction.
//!
//! Search and distance lookups are cached per booking session. Entries are
//! evicted strictly by insertion order once the cache grows past its
//! capacity; reads never refresh an entry's position.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A size-bounded map evicting its oldest insertion first.
///
/// Re-inserting an existing key replaces the value but keeps the key's
/// original position in the eviction queue.
///
/// # Examples
/// ```
/// use freight_core::FifoCache;
///
/// let mut cache = FifoCache::new(2);
/// cache.insert("kig", 1);
/// cache.insert("hu", 2);
/// cache.insert("mus", 3);
/// assert!(cache.get(&"kig").is_none());
/// assert_eq!(cache.get(&"mus"), Some(&3));
/// ```
#[derive(Debug, Clone)]
pub struct FifoCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero disables caching: inserts are dropped immediately.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of entries retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value, evicting the oldest entries while over
    /// capacity.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
