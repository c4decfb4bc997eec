//! Name-keyed concurrent registry.

use std::sync::Arc;

use dashmap::DashMap;

/// Shared map from resource name to loaded resource.
///
/// Each operation on a single name is atomic. There is no atomicity across
/// names: a reader may observe one entry replaced while another is not yet.
/// Values are handed out as `Arc` so a reader never blocks a writer.
#[derive(Debug)]
pub struct Registry<T> {
    entries: DashMap<String, Arc<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `name`, returning the previous value.
    pub fn upsert(&self, name: impl Into<String>, value: T) -> Option<Arc<T>> {
        self.entries.insert(name.into(), Arc::new(value))
    }

    /// Remove `name`. Removing an absent name is a no-op returning `None`.
    pub fn remove(&self, name: &str) -> Option<Arc<T>> {
        self.entries.remove(name).map(|(_, value)| value)
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Snapshot of every entry, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, Arc<T>)> {
        let mut entries: Vec<(String, Arc<T>)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces() {
        let registry = Registry::new();
        assert!(registry.upsert("user", 1).is_none());

        let previous = registry.upsert("user", 2).unwrap();
        assert_eq!(*previous, 1);
        assert_eq!(*registry.get("user").unwrap(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let registry: Registry<u32> = Registry::new();
        assert!(registry.remove("ghost").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let registry = Registry::new();
        registry.upsert("order", ());
        registry.upsert("account", ());
        registry.upsert("invoice", ());

        assert_eq!(registry.names(), vec!["account", "invoice", "order"]);
    }

    #[test]
    fn test_concurrent_writers() {
        let registry = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for j in 0..100 {
                        registry.upsert(format!("r{}", j % 10), i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 10);
    }
}
