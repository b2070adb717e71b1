use std::str::FromStr;

use async_trait::async_trait;
use renta_core::storage::{KeyValueStore, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

/// [`KeyValueStore`] backed by a single SQLite table.
///
/// The pool holds one connection: the application is a single writer, and
/// it keeps a `:memory:` database alive for as long as the store exists.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open `connection_string`, which may be a bare file path (created if
    /// missing), `:memory:`, or a sqlx-style `sqlite:` URL.
    pub async fn new(connection_string: &str) -> Result<Self, StorageError> {
        let options = connect_options(connection_string)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn connect_options(connection_string: &str) -> Result<SqliteConnectOptions, StorageError> {
    let options = if connection_string == ":memory:" {
        SqliteConnectOptions::from_str("sqlite::memory:")
    } else if connection_string.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(connection_string)
    } else {
        Ok(SqliteConnectOptions::new().filename(connection_string))
    };

    options
        .map(|o| o.create_if_missing(true))
        .map_err(|e| StorageError::Configuration(format!("invalid sqlite path '{connection_string}': {e}")))
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        debug!(key, found = value.is_some(), "sqlite get_item");
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        debug!(key, bytes = value.len(), "sqlite set_item");
        Ok(())
    }
}
