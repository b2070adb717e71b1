//! SQLite backend for the renta key-value store.

mod factory;
mod store;

pub use factory::SqliteStoreFactory;
pub use store::SqliteStore;
