use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

#[derive(Debug)]
struct Entries<K, V> {
    by_key: HashMap<K, V>,
    order: Vec<K>,
}

/// In-memory keyed store that remembers insertion order.
///
/// Values are never replaced: `insert_new` refuses an existing key, which is
/// what the repositories build their "already exists" rule on.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<Entries<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Entries {
                by_key: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryStore<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Insert `value` unless `key` is taken. Returns `false` on conflict.
    ///
    /// The existence check and the insert happen under one write lock.
    pub fn insert_new(&self, key: K, value: V) -> bool {
        let mut entries = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if entries.by_key.contains_key(&key) {
            return false;
        }
        entries.order.push(key.clone());
        entries.by_key.insert(key, value);
        true
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        entries.by_key.get(key).cloned()
    }

    /// All values, oldest insert first.
    pub fn list(&self) -> Vec<V> {
        self.list_filtered(|_| true)
    }

    pub fn list_filtered(&self, mut keep: impl FnMut(&V) -> bool) -> Vec<V> {
        let entries = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .order
            .iter()
            .filter_map(|k| entries.by_key.get(k))
            .filter(|v| keep(v))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        let entries = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        entries.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
