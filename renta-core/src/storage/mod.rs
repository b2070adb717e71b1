pub mod factory;
pub mod kv;
pub mod memory;
pub mod results;

pub use factory::{KeyValueStoreFactory, StoreConfig, StoreRegistry};
pub use kv::{KeyValueStore, StorageError};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use results::{RESULTS_KEY, ResultStore, ResultStoreError};
