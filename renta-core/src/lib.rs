pub mod calculations;
pub mod models;
pub mod storage;
pub mod validation;

pub use calculations::{CalculationError, compute_tax};
pub use models::*;
pub use storage::{KeyValueStore, ResultStore, ResultStoreError, StorageError};
pub use validation::{FormField, ValidationError};
