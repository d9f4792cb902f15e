//! Inventory transaction coordinator.
//!
//! Sells and leases touch two stores: the vehicle leaves the lot and a contract
//! enters the ledger. The coordinator runs both writes as one unit:
//!
//! ```text
//! acquire per-VIN lock (bounded wait)
//!   ↓
//! look up vehicle            -- NotFound if absent
//!   ↓
//! snapshot into contract
//!   ↓
//! remove from lot
//!   ↓
//! append to ledger           -- on failure: put the vehicle back, report the error
//!   ↓
//! release lock
//! ```
//!
//! Every mutation of the lot (add, remove, sell, lease) goes through the same
//! lock table, so a VIN is never consumed twice and a compensating restore can
//! never collide with a concurrent add of the same VIN. A VIN stays issued after
//! its vehicle leaves the lot and is never handed out again.
//!
//! `find_by_vin` waits on the VIN lock too, so a single-vehicle lookup sees the
//! vehicle either before a transaction or after it commits or rolls back.
//! Listing reads (`query`, `list_all`, `list_sales`, `list_leases`) take no VIN
//! locks and go straight to the stores. Each store call is a consistent snapshot
//! of that store, but between the lot removal and the ledger append of an
//! in-flight sale or lease, and while a failed one is being restored, a listing
//! can show the vehicle absent from the lot with no contract for it yet.

use std::time::Duration;

use rand::RngCore;
use rand::rngs::StdRng;
use thiserror::Error;

use dealership_contracts::{
    ContractLedger, LeaseContract, LeaseVehicle, LedgerError, Recorded, SalesContract, SellVehicle,
};
use dealership_core::{DomainError, RangeField, TransactionId, Vin};
use dealership_inventory::{NewVehicle, Vehicle, VehicleQuery, VehicleRepository, VinAllocator};

use crate::lock::{LockError, VinGuard, VinLocks};

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// How many times `add_vehicle` redraws when a concurrent add claims the allocated VIN.
const MAX_ALLOCATION_RACES: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("vehicle {0} not found in inventory")]
    NotFound(Vin),

    #[error("vehicle {0} already exists in inventory")]
    DuplicateVin(Vin),

    #[error("invalid {field} range: min {min} is greater than max {max}")]
    InvalidRange { field: RangeField, min: u64, max: u64 },

    /// Another transaction holds the VIN and did not release it in time.
    #[error("vehicle {0} is held by another transaction")]
    VehicleUnavailable(Vin),

    #[error("validation failed: {0}")]
    Validation(String),

    /// The ledger refused the contract; the vehicle was returned to the lot.
    #[error("contract could not be recorded: {0}")]
    Ledger(LedgerError),

    /// The ledger refused the contract and the vehicle could not be restored.
    #[error("contract for {vin} could not be recorded ({ledger}) and restore failed ({restore})")]
    RollbackFailed {
        vin: Vin,
        ledger: LedgerError,
        restore: DomainError,
    },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for TransactionError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound(vin) => TransactionError::NotFound(vin),
            DomainError::DuplicateVin(vin) => TransactionError::DuplicateVin(vin),
            DomainError::InvalidRange { field, min, max } => {
                TransactionError::InvalidRange { field, min, max }
            }
            DomainError::VehicleUnavailable(vin) => TransactionError::VehicleUnavailable(vin),
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                TransactionError::Validation(msg)
            }
            DomainError::Storage(msg) => TransactionError::Storage(msg),
        }
    }
}

impl From<LedgerError> for TransactionError {
    fn from(value: LedgerError) -> Self {
        TransactionError::Ledger(value)
    }
}

impl From<LockError> for TransactionError {
    fn from(value: LockError) -> Self {
        match value {
            LockError::Timeout(vin) => TransactionError::VehicleUnavailable(vin),
            LockError::Poisoned => TransactionError::Storage("VIN lock table poisoned".to_string()),
        }
    }
}

/// Orchestrates lot mutations and the sell/lease use cases.
///
/// Collaborators are injected at construction; share one coordinator (e.g. behind
/// an `Arc`) between every adapter that mutates the same lot.
#[derive(Debug)]
pub struct InventoryTransactionCoordinator<V, L, R = StdRng> {
    vehicles: V,
    ledger: L,
    allocator: VinAllocator<R>,
    locks: VinLocks,
    lock_timeout: Duration,
}

impl<V, L, R> InventoryTransactionCoordinator<V, L, R>
where
    V: VehicleRepository,
    L: ContractLedger,
    R: RngCore,
{
    pub fn new(vehicles: V, ledger: L, allocator: VinAllocator<R>) -> Self {
        Self {
            vehicles,
            ledger,
            allocator,
            locks: VinLocks::new(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Bound on how long a mutation waits for a VIN held by another transaction.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Waits for any transaction holding `vin`, so the vehicle is never seen mid-sale.
    pub fn find_by_vin(&self, vin: Vin) -> Result<Vehicle, TransactionError> {
        let _guard = self.lock(vin)?;
        Ok(self.vehicles.find_by_vin(vin)?)
    }

    pub fn query(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>, TransactionError> {
        Ok(self.vehicles.query(query)?)
    }

    pub fn list_all(&self) -> Result<Vec<Vehicle>, TransactionError> {
        Ok(self.vehicles.list_all()?)
    }

    pub fn list_sales(&self) -> Result<Vec<Recorded<SalesContract>>, TransactionError> {
        Ok(self.ledger.list_sales()?)
    }

    pub fn list_leases(&self) -> Result<Vec<Recorded<LeaseContract>>, TransactionError> {
        Ok(self.ledger.list_leases()?)
    }

    // ---------------------------------------------------------------------
    // Lot mutations
    // ---------------------------------------------------------------------

    /// Put a vehicle on the lot.
    ///
    /// With `vin` supplied the VIN is used as-is; any VIN ever issued, including
    /// those of sold, leased, or removed vehicles, surfaces as `DuplicateVin`
    /// from the repository. Without it a never-issued VIN is allocated.
    pub fn add_vehicle(
        &self,
        draft: &NewVehicle,
        vin: Option<Vin>,
    ) -> Result<Vehicle, TransactionError> {
        let tx = TransactionId::new();
        let _span = tracing::info_span!("inventory.add", transaction_id = %tx).entered();
        draft.validate()?;

        if let Some(vin) = vin {
            let _guard = self.lock(vin)?;
            let added = self.vehicles.add(draft.with_vin(vin)?)?;
            tracing::info!(vin = %vin, "vehicle added with supplied VIN");
            return Ok(added);
        }

        for _ in 0..MAX_ALLOCATION_RACES {
            let vin = self.allocator.allocate(&self.vehicles)?;
            let _guard = self.lock(vin)?;
            match self.vehicles.add(draft.with_vin(vin)?) {
                Ok(added) => {
                    tracing::info!(vin = %vin, "vehicle added with allocated VIN");
                    return Ok(added);
                }
                Err(DomainError::DuplicateVin(_)) => {
                    tracing::debug!(vin = %vin, "allocated VIN claimed concurrently, redrawing");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TransactionError::Validation(
            "could not allocate a free VIN".to_string(),
        ))
    }

    /// Take a vehicle off the lot without a contract.
    pub fn remove_vehicle(&self, vin: Vin) -> Result<Vehicle, TransactionError> {
        let tx = TransactionId::new();
        let _span = tracing::info_span!("inventory.remove", transaction_id = %tx, vin = %vin).entered();

        let _guard = self.lock(vin)?;
        let removed = self.vehicles.remove(vin)?;
        tracing::info!("vehicle removed from lot");
        Ok(removed)
    }

    // ---------------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------------

    /// Sell a vehicle: remove it from the lot and record a sales contract, atomically.
    pub fn sell(&self, cmd: SellVehicle) -> Result<Recorded<SalesContract>, TransactionError> {
        let tx = TransactionId::new();
        let _span = tracing::info_span!("inventory.sell", transaction_id = %tx, vin = %cmd.vin).entered();

        let recorded = self.consume(
            cmd.vin,
            |vehicle| SalesContract {
                date: cmd.occurred_at.date_naive(),
                customer: cmd.customer,
                vehicle,
                fees: cmd.fees,
                financed: cmd.financed,
            },
            |ledger, contract| ledger.record_sale(contract),
        )?;

        tracing::info!(contract_id = %recorded.id, financed = recorded.contract.financed, "vehicle sold");
        Ok(recorded)
    }

    /// Lease a vehicle: remove it from the lot and record a lease contract, atomically.
    pub fn lease(&self, cmd: LeaseVehicle) -> Result<Recorded<LeaseContract>, TransactionError> {
        let tx = TransactionId::new();
        let _span = tracing::info_span!("inventory.lease", transaction_id = %tx, vin = %cmd.vin).entered();

        let recorded = self.consume(
            cmd.vin,
            |vehicle| LeaseContract {
                date: cmd.occurred_at.date_naive(),
                customer: cmd.customer,
                vehicle,
                terms: cmd.terms,
            },
            |ledger, contract| ledger.record_lease(contract),
        )?;

        tracing::info!(contract_id = %recorded.id, "vehicle leased");
        Ok(recorded)
    }

    /// Shared remove + record unit. Holds the VIN lock across both writes and
    /// restores the vehicle if the ledger append fails.
    fn consume<C>(
        &self,
        vin: Vin,
        build: impl FnOnce(Vehicle) -> C,
        record: impl FnOnce(&L, C) -> Result<Recorded<C>, LedgerError>,
    ) -> Result<Recorded<C>, TransactionError> {
        let _guard = self.lock(vin)?;

        let vehicle = self.vehicles.find_by_vin(vin)?;
        let contract = build(Vehicle {
            sold: true,
            ..vehicle
        });

        let removed = self.vehicles.remove(vin)?;

        match record(&self.ledger, contract) {
            Ok(recorded) => Ok(recorded),
            Err(ledger_err) => {
                tracing::warn!(error = %ledger_err, "ledger append failed, restoring vehicle");
                match self.vehicles.restore(removed) {
                    Ok(_) => Err(TransactionError::Ledger(ledger_err)),
                    Err(restore) => {
                        tracing::error!(error = %restore, "vehicle restore failed");
                        Err(TransactionError::RollbackFailed {
                            vin,
                            ledger: ledger_err,
                            restore,
                        })
                    }
                }
            }
        }
    }

    fn lock(&self, vin: Vin) -> Result<VinGuard<'_>, TransactionError> {
        self.locks.acquire(vin, self.lock_timeout).map_err(|e| {
            tracing::warn!(vin = %vin, error = %e, "VIN lock not acquired");
            TransactionError::from(e)
        })
    }
}
