//! Resource cache with cost-bounded LRU eviction
//!
//! Maps resource keys to decoded drawable handles. Every entry carries a cost
//! and the cache keeps the sum of costs at or under a fixed capacity by
//! evicting the least recently used entries.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cost::{CostModel, EntryCost};
use crate::memory_budget::MemoryPressure;
use crate::surface::BufferOwner;

/// Statistics about cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently in cache
    pub entry_count: usize,

    /// Sum of the costs of all cached entries
    pub total_cost: usize,

    /// Maximum total cost allowed
    pub capacity: usize,

    /// Number of cache hits
    pub hits: u64,

    /// Number of cache misses
    pub misses: u64,

    /// Number of entries evicted to stay within capacity
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate capacity utilization (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.total_cost as f64 / self.capacity as f64
        }
    }

    /// Memory pressure implied by the current utilization
    pub fn pressure(&self) -> MemoryPressure {
        MemoryPressure::from_utilization(self.utilization())
    }
}

struct Entry<V> {
    value: V,
    cost: usize,
}

/// Internal cache state, always accessed under the cache lock
struct CacheState<K, V> {
    /// Map from key to cached value and its cost
    entries: HashMap<K, Entry<V>>,

    /// LRU queue (most recently used at back, least recently used at front)
    lru_queue: VecDeque<K>,

    /// Sum of the costs of all entries
    total_cost: usize,

    /// Maximum total cost, fixed at construction
    capacity: usize,

    /// Statistics
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> CacheState<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru_queue: VecDeque::new(),
            total_cost: 0,
            capacity,
            stats: CacheStats {
                capacity,
                ..Default::default()
            },
        }
    }

    /// Move a key to the back of the LRU queue (mark as most recently used)
    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.lru_queue.iter().position(|k| k == key) {
            self.lru_queue.remove(pos);
        }
        self.lru_queue.push_back(key.clone());
    }

    /// Remove an entry and its queue slot, returning what was stored
    fn detach(&mut self, key: &K) -> Option<Entry<V>> {
        let entry = self.entries.remove(key)?;
        if let Some(pos) = self.lru_queue.iter().position(|k| k == key) {
            self.lru_queue.remove(pos);
        }
        self.total_cost = self.total_cost.saturating_sub(entry.cost);
        Some(entry)
    }

    /// Evict the least recently used entry
    fn evict_lru(&mut self) -> Option<(K, V)> {
        let key = self.lru_queue.pop_front()?;
        let entry = self.entries.remove(&key)?;
        self.total_cost = self.total_cost.saturating_sub(entry.cost);
        self.stats.evictions += 1;
        Some((key, entry.value))
    }

    /// Evict entries until the total cost fits the capacity
    fn trim_to_capacity(&mut self) -> Vec<(K, V)> {
        let mut evicted = Vec::new();
        while self.total_cost > self.capacity {
            match self.evict_lru() {
                Some(pair) => evicted.push(pair),
                None => break,
            }
        }
        evicted
    }

    fn drain(&mut self) -> Vec<V> {
        self.lru_queue.clear();
        self.total_cost = 0;
        self.entries.drain().map(|(_, entry)| entry.value).collect()
    }

    fn sync_stats(&mut self) {
        self.stats.entry_count = self.entries.len();
        self.stats.total_cost = self.total_cost;
    }
}

/// Cost-bounded LRU cache of decoded resources
///
/// Thread-safe: one lock covers the map, the recency order and the cost
/// total, so a lookup's recency update never interleaves with an insert's
/// accounting. Values are expected to be cheap reference-counted handles;
/// `get` returns a clone.
///
/// # Example
///
/// ```
/// use svg_view_cache::ResourceCache;
///
/// // Capacity of 10 units
/// let cache: ResourceCache<u32, &str> = ResourceCache::new(10);
///
/// cache.put(1, "a", 5);
/// cache.put(2, "b", 5);
///
/// // Touch 1 so that 2 becomes the eviction candidate
/// assert_eq!(cache.get(&1), Some("a"));
/// cache.put(3, "c", 5);
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// assert_eq!(cache.total_cost(), 10);
/// ```
pub struct ResourceCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    cost_model: CostModel,
}

impl<K: Eq + Hash + Clone, V: Clone> ResourceCache<K, V> {
    /// Create a cache with the given capacity and the default cost model
    ///
    /// A capacity of zero is valid: such a cache never retains anything.
    pub fn new(capacity: usize) -> Self {
        Self::with_cost_model(capacity, CostModel::default())
    }

    /// Create a cache whose weighed inserts are charged by `cost_model`
    pub fn with_cost_model(capacity: usize, cost_model: CostModel) -> Self {
        Self {
            state: Mutex::new(CacheState::new(capacity)),
            cost_model,
        }
    }

    /// Look up an entry, marking it most recently used on a hit
    ///
    /// A miss leaves the recency order untouched.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        Self::lookup(&mut state, key)
    }

    /// Look up an entry without blocking
    ///
    /// Returns `None` if the cache is currently locked by another caller,
    /// otherwise `Some` of the lookup result with the same effects as
    /// [`get`](Self::get).
    pub fn try_get(&self, key: &K) -> Option<Option<V>> {
        let mut state = self.state.try_lock()?;
        Some(Self::lookup(&mut state, key))
    }

    fn lookup(state: &mut CacheState<K, V>, key: &K) -> Option<V> {
        match state.entries.get(key).map(|entry| entry.value.clone()) {
            Some(value) => {
                state.touch(key);
                state.stats.hits += 1;
                Some(value)
            }
            None => {
                state.stats.misses += 1;
                None
            }
        }
    }

    /// Look up an entry without updating recency or statistics
    pub fn peek(&self, key: &K) -> Option<V> {
        let state = self.state.lock();
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Check if a key is cached without updating recency
    pub fn contains(&self, key: &K) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    /// Insert or replace an entry with an explicit cost
    ///
    /// The entry becomes the most recently used. A cost of zero is charged
    /// as one. If the total then exceeds capacity, least recently used
    /// entries are evicted until it fits; the new entry is evicted last, and
    /// only if its own cost exceeds the capacity.
    ///
    /// Returns the evicted entries. A replaced value, like the evicted ones,
    /// is dropped outside the lock.
    pub fn put(&self, key: K, value: V, cost: usize) -> Vec<(K, V)> {
        let cost = cost.max(1);
        let (replaced, evicted) = {
            let mut state = self.state.lock();

            // Replacing an entry first gives back its cost
            let replaced = state.detach(&key);

            state.total_cost = state.total_cost.saturating_add(cost);
            state.entries.insert(key.clone(), Entry { value, cost });
            state.lru_queue.push_back(key);

            let evicted = state.trim_to_capacity();
            state.sync_stats();
            (replaced, evicted)
        };
        drop(replaced);

        if !evicted.is_empty() {
            trace!(count = evicted.len(), "evicted least recently used entries");
        }
        evicted
    }

    /// Insert or replace an entry charged by the cache's cost model
    pub fn put_weighed(&self, key: K, value: V) -> Vec<(K, V)>
    where
        V: EntryCost,
    {
        let cost = self.cost_model.weigh(&value);
        self.put(key, value, cost)
    }

    /// Remove an entry
    ///
    /// Returns the removed value, or `None` if it wasn't cached
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let entry = state.detach(key)?;
        state.sync_stats();
        Some(entry.value)
    }

    /// Remove every entry and reset the total cost to zero
    pub fn clear(&self) -> usize {
        let drained = {
            let mut state = self.state.lock();
            let drained = state.drain();
            state.sync_stats();
            drained
        };
        drained.len()
    }

    /// Remove every entry and release the raster buffer bound to `surface`
    ///
    /// The release is best-effort: if nothing is bound it is a no-op.
    /// Returns the number of bytes the surface released.
    pub fn evict_all<B: BufferOwner + ?Sized>(&self, surface: &mut B) -> Option<usize> {
        let cleared = self.clear();
        let released = surface.release_bound_buffer();
        debug!(
            cleared,
            released_bytes = released.unwrap_or(0),
            "evicted all cached resources"
        );
        released
    }

    /// Cost model used by [`put_weighed`](Self::put_weighed)
    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }

    /// Maximum total cost, fixed at construction
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Sum of the costs of all cached entries
    pub fn total_cost(&self) -> usize {
        self.state.lock().total_cost
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get current cache statistics
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Keys from least to most recently used
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.state.lock().lru_queue.iter().cloned().collect()
    }
}

impl<K, V> fmt::Debug for ResourceCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ResourceCache")
            .field("entries", &state.entries.len())
            .field("total_cost", &state.total_cost)
            .field("capacity", &state.capacity)
            .field("cost_model", &self.cost_model)
            .finish()
    }
}
