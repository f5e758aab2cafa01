//! Injectable caching for source loads.
//!
//! Loaders (boundary files, survey tables) are plain functions of their
//! source identity. Whether their results are memoized is the caller's
//! choice: wrap the call in [`get_or_try_load`] with any [`SourceCache`].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Cache keyed by source identity
pub trait SourceCache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn insert(&self, key: K, value: V);
    fn invalidate(&self, key: &K);
    fn clear(&self);
}

/// In-process cache; values are cloned out, so store `Arc`s for anything large.
pub struct MemoryCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> MemoryCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, V>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SourceCache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        self.entries().get(key).cloned()
    }

    fn insert(&self, key: K, value: V) {
        self.entries().insert(key, value);
    }

    fn invalidate(&self, key: &K) {
        self.entries().remove(key);
    }

    fn clear(&self) {
        self.entries().clear();
    }
}

/// Return the cached value for `key`, or run `load` and cache its success.
/// Failures are not cached.
pub fn get_or_try_load<K, V, E, C, F>(cache: &C, key: K, load: F) -> Result<V, E>
where
    C: SourceCache<K, V> + ?Sized,
    V: Clone,
    F: FnOnce(&K) -> Result<V, E>,
{
    if let Some(value) = cache.get(&key) {
        debug!("Source cache hit");
        return Ok(value);
    }

    let value = load(&key)?;
    cache.insert(key, value.clone());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_loads_once() {
        let cache: MemoryCache<String, u32> = MemoryCache::new();
        let calls = Cell::new(0);
        let load = |_: &String| -> Result<u32, ()> {
            calls.set(calls.get() + 1);
            Ok(42)
        };

        assert_eq!(get_or_try_load(&cache, "a".to_string(), load), Ok(42));
        assert_eq!(get_or_try_load(&cache, "a".to_string(), load), Ok(42));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache: MemoryCache<&str, u32> = MemoryCache::new();
        let r: Result<u32, &str> = get_or_try_load(&cache, "k", |_| Err("offline"));
        assert_eq!(r, Err("offline"));
        assert!(cache.is_empty());

        let r: Result<u32, &str> = get_or_try_load(&cache, "k", |_| Ok(7));
        assert_eq!(r, Ok(7));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache: MemoryCache<&str, u32> = MemoryCache::new();
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.invalidate(&"a");
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let cache: Box<dyn SourceCache<String, u32>> = Box::new(MemoryCache::new());
        let v: Result<u32, ()> = get_or_try_load(cache.as_ref(), "x".to_string(), |_| Ok(3));
        assert_eq!(v, Ok(3));
        assert_eq!(cache.get(&"x".to_string()), Some(3));
    }
}
