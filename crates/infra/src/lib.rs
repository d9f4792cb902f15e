//! Infrastructure layer: transaction coordination, locking, configuration.

pub mod config;
pub mod coordinator;
pub mod lock;

pub use config::{AppConfig, ConfigError};
pub use coordinator::{InventoryTransactionCoordinator, TransactionError};
pub use lock::{LockError, VinGuard, VinLocks};
