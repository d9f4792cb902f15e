use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use dealership_core::{DomainError, DomainResult, Entity, Vin};

use crate::query::VehicleQuery;
use crate::vehicle::Vehicle;

/// Single source of truth for the vehicles currently on the lot.
///
/// Each operation is atomic on its own: readers never observe a vehicle
/// half-way through an insert or a removal. Listing operations return vehicles
/// ordered by VIN ascending.
///
/// A VIN is issued by its first successful `add` and stays issued after the
/// vehicle leaves the lot, so no two vehicles ever share a VIN.
pub trait VehicleRepository: Send + Sync {
    /// Insert a vehicle. Fails with `DuplicateVin` if the VIN was ever issued,
    /// whether the vehicle is still on the lot or not.
    fn add(&self, vehicle: Vehicle) -> DomainResult<Vehicle>;

    /// Delete a vehicle from available inventory and return it. The VIN stays issued.
    fn remove(&self, vin: Vin) -> DomainResult<Vehicle>;

    /// Put a previously removed vehicle back on the lot.
    ///
    /// Fails with `DuplicateVin` if the VIN is on the lot and with `Validation`
    /// if it was never issued.
    fn restore(&self, vehicle: Vehicle) -> DomainResult<Vehicle>;

    fn find_by_vin(&self, vin: Vin) -> DomainResult<Vehicle>;

    /// Whether the VIN is on the lot right now.
    fn contains(&self, vin: Vin) -> DomainResult<bool>;

    /// Whether the VIN was ever added, including vehicles since sold, leased, or removed.
    fn is_issued(&self, vin: Vin) -> DomainResult<bool>;

    /// All vehicles matching every predicate in `query`.
    ///
    /// Range predicates are validated before any data is read; an empty result
    /// is not an error.
    fn query(&self, query: &VehicleQuery) -> DomainResult<Vec<Vehicle>>;

    fn list_all(&self) -> DomainResult<Vec<Vehicle>> {
        self.query(&VehicleQuery::all())
    }
}

impl<R> VehicleRepository for Arc<R>
where
    R: VehicleRepository + ?Sized,
{
    fn add(&self, vehicle: Vehicle) -> DomainResult<Vehicle> {
        (**self).add(vehicle)
    }

    fn remove(&self, vin: Vin) -> DomainResult<Vehicle> {
        (**self).remove(vin)
    }

    fn restore(&self, vehicle: Vehicle) -> DomainResult<Vehicle> {
        (**self).restore(vehicle)
    }

    fn find_by_vin(&self, vin: Vin) -> DomainResult<Vehicle> {
        (**self).find_by_vin(vin)
    }

    fn contains(&self, vin: Vin) -> DomainResult<bool> {
        (**self).contains(vin)
    }

    fn is_issued(&self, vin: Vin) -> DomainResult<bool> {
        (**self).is_issued(vin)
    }

    fn query(&self, query: &VehicleQuery) -> DomainResult<Vec<Vehicle>> {
        (**self).query(query)
    }

    fn list_all(&self) -> DomainResult<Vec<Vehicle>> {
        (**self).list_all()
    }
}

#[derive(Debug, Default)]
struct Lot {
    on_lot: BTreeMap<Vin, Vehicle>,
    issued: BTreeSet<Vin>,
}

/// In-memory vehicle repository.
///
/// Keyed by VIN in a `BTreeMap`, which gives the VIN-ascending listing order for free.
/// Issued VINs are kept in the same lock as the lot so the uniqueness check and
/// the insert are one step.
#[derive(Debug, Default)]
pub struct InMemoryVehicleRepository {
    lot: RwLock<Lot>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vehicles(vehicles: impl IntoIterator<Item = Vehicle>) -> DomainResult<Self> {
        let repo = Self::new();
        for v in vehicles {
            repo.add(v)?;
        }
        Ok(repo)
    }

    /// Vehicles currently on the lot.
    pub fn len(&self) -> DomainResult<usize> {
        Ok(self.lot.read().map_err(|_| poisoned())?.on_lot.len())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned() -> DomainError {
    DomainError::storage("vehicle repository lock poisoned")
}

impl VehicleRepository for InMemoryVehicleRepository {
    fn add(&self, vehicle: Vehicle) -> DomainResult<Vehicle> {
        let mut lot = self.lot.write().map_err(|_| poisoned())?;
        let vin = vehicle.id();
        if !lot.issued.insert(vin) {
            return Err(DomainError::DuplicateVin(vin));
        }
        lot.on_lot.insert(vin, vehicle.clone());
        tracing::debug!(vin = %vin, "vehicle added to lot");
        Ok(vehicle)
    }

    fn remove(&self, vin: Vin) -> DomainResult<Vehicle> {
        let mut lot = self.lot.write().map_err(|_| poisoned())?;
        let removed = lot.on_lot.remove(&vin).ok_or(DomainError::NotFound(vin))?;
        tracing::debug!(vin = %vin, "vehicle removed from lot");
        Ok(removed)
    }

    fn restore(&self, vehicle: Vehicle) -> DomainResult<Vehicle> {
        let mut lot = self.lot.write().map_err(|_| poisoned())?;
        let vin = vehicle.id();
        if !lot.issued.contains(&vin) {
            return Err(DomainError::validation(format!(
                "cannot restore vehicle {vin}: VIN was never issued"
            )));
        }
        if lot.on_lot.contains_key(&vin) {
            return Err(DomainError::DuplicateVin(vin));
        }
        lot.on_lot.insert(vin, vehicle.clone());
        tracing::debug!(vin = %vin, "vehicle restored to lot");
        Ok(vehicle)
    }

    fn find_by_vin(&self, vin: Vin) -> DomainResult<Vehicle> {
        let lot = self.lot.read().map_err(|_| poisoned())?;
        lot.on_lot.get(&vin).cloned().ok_or(DomainError::NotFound(vin))
    }

    fn contains(&self, vin: Vin) -> DomainResult<bool> {
        let lot = self.lot.read().map_err(|_| poisoned())?;
        Ok(lot.on_lot.contains_key(&vin))
    }

    fn is_issued(&self, vin: Vin) -> DomainResult<bool> {
        let lot = self.lot.read().map_err(|_| poisoned())?;
        Ok(lot.issued.contains(&vin))
    }

    fn query(&self, query: &VehicleQuery) -> DomainResult<Vec<Vehicle>> {
        query.validate()?;
        let lot = self.lot.read().map_err(|_| poisoned())?;
        Ok(lot
            .on_lot
            .values()
            .filter(|v| query.matches(v))
            .cloned()
            .collect())
    }
}
