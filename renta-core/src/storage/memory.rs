use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::factory::{KeyValueStoreFactory, StoreConfig};
use super::kv::{KeyValueStore, StorageError};

/// Process-local store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set_item` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .inner
            .lock()
            .map_err(|_| StorageError::Database("mutex poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| StorageError::Database("mutex poisoned".into()))?;
        map.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// [`KeyValueStoreFactory`] for the `"memory"` backend. The connection
/// string is ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl KeyValueStoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StorageError> {
        Ok(Box::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn missing_key_reads_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("resultados").await, Ok(None));
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        store.set_item("k", "v1").await.unwrap();
        store.set_item("k", "v2").await.unwrap();

        assert_eq!(store.get_item("k").await, Ok(Some("v2".to_string())));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn factory_creates_empty_store() {
        let store = MemoryStoreFactory
            .create(&StoreConfig::default())
            .await
            .unwrap();
        assert_eq!(store.get_item("k").await, Ok(None));
    }
}
