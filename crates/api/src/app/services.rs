use std::sync::Arc;

use dealership_contracts::InMemoryContractLedger;
use dealership_infra::{AppConfig, InventoryTransactionCoordinator, TransactionError};
use dealership_inventory::{InMemoryVehicleRepository, VinAllocator};

pub type Coordinator =
    InventoryTransactionCoordinator<Arc<InMemoryVehicleRepository>, Arc<InMemoryContractLedger>>;

/// Shared state behind every handler.
#[derive(Debug)]
pub struct AppServices {
    coordinator: Coordinator,
}

pub fn build_services(config: &AppConfig) -> AppServices {
    let allocator = match config.vin_seed {
        Some(seed) => VinAllocator::seeded(seed),
        None => VinAllocator::from_entropy(),
    };

    let coordinator = InventoryTransactionCoordinator::new(
        Arc::new(InMemoryVehicleRepository::new()),
        Arc::new(InMemoryContractLedger::new()),
        allocator,
    )
    .with_lock_timeout(config.lock_timeout);

    AppServices { coordinator }
}

impl AppServices {
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}

/// Run a coordinator call that takes VIN locks on the blocking pool; lock waits
/// must not stall the runtime.
pub async fn run_locked<T, F>(services: &Arc<AppServices>, op: F) -> Result<T, TransactionError>
where
    T: Send + 'static,
    F: FnOnce(&Coordinator) -> Result<T, TransactionError> + Send + 'static,
{
    let services = Arc::clone(services);
    tokio::task::spawn_blocking(move || op(&services.coordinator))
        .await
        .map_err(|e| TransactionError::Storage(format!("coordinator task failed: {e}")))?
}
