//! Bounded cache for per-row lookups

use std::collections::VecDeque;
use std::hash::Hash;
use std::sync::Arc;
use parking_lot::RwLock;
use ahash::AHashMap;

struct Entries<K, V> {
    values: AHashMap<K, V>,
    /// Insertion order, oldest first
    order: VecDeque<K>,
}

/// Lookup cache shared between the view and background tasks.
///
/// When full, the oldest inserted entry is evicted.
pub struct LookupCache<K, V> {
    entries: Arc<RwLock<Entries<K, V>>>,
    capacity: usize,
}

impl<K, V> LookupCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries {
                values: AHashMap::new(),
                order: VecDeque::new(),
            })),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().values.get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.read().values.contains_key(key)
    }

    pub fn put(&self, key: K, value: V) {
        let mut entries = self.entries.write();

        if entries.values.insert(key.clone(), value).is_some() {
            return;
        }
        entries.order.push_back(key);

        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.values.remove(&oldest);
            }
        }
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.values.clear();
        entries.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let cache = LookupCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 10);
        cache.put("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));

        cache.clear();
        assert!(cache.is_empty());
    }
}
