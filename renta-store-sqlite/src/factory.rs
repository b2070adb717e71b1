use async_trait::async_trait;

use renta_core::storage::{KeyValueStore, KeyValueStoreFactory, StorageError, StoreConfig};

use crate::store::SqliteStore;

/// [`KeyValueStoreFactory`] for SQLite.
///
/// Register this with a [`renta_core::storage::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use renta_core::storage::StoreRegistry;
/// use renta_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl KeyValueStoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database named by `config.connection_string` and bring its
    /// schema up to date.
    ///
    /// Accepted values:
    /// * A bare file path, e.g. `"renta.db"`. Created if it does not exist.
    /// * `":memory:"`, an ephemeral database (useful for tests).
    /// * A sqlx URL such as `"sqlite:renta.db?mode=rwc"`.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StorageError> {
        let store = SqliteStore::new(&config.connection_string).await?;
        store.run_migrations().await?;
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use renta_core::storage::{KeyValueStore, KeyValueStoreFactory, StoreConfig};

    use super::SqliteStoreFactory;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteStoreFactory.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn creates_in_memory_store() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };

        let store = SqliteStoreFactory
            .create(&config)
            .await
            .expect("failed to create in-memory store");

        assert_eq!(store.get_item("resultados").await, Ok(None));
    }
}
