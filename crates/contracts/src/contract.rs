use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dealership_core::{ContractId, DomainError, DomainResult, Entity, Vin};
use dealership_inventory::Vehicle;

/// Buyer or lessee named on a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("customer email must contain '@'"));
        }
        Ok(Self { name, email })
    }
}

/// Fees attached to a sale. Amounts are opaque whole units passed through unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub tax_amount: u64,
    pub recording_fee: u64,
    pub processing_fee: u64,
}

/// Lease-specific numeric terms. Opaque; no financing calculation happens here.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseTerms {
    pub monthly_payment: u64,
    pub lease_cost: u64,
}

/// A completed sale. `vehicle` is a snapshot taken at the moment of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesContract {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub customer: Customer,
    pub vehicle: Vehicle,
    pub fees: FeeSchedule,
    pub financed: bool,
}

/// A completed lease. Leases are never financed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseContract {
    pub date: NaiveDate,
    pub customer: Customer,
    pub vehicle: Vehicle,
    pub terms: LeaseTerms,
}

/// Shared view over sale and lease contracts.
pub trait VehicleContract {
    fn date(&self) -> NaiveDate;
    fn customer(&self) -> &Customer;
    fn vehicle(&self) -> &Vehicle;
}

impl VehicleContract for SalesContract {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn customer(&self) -> &Customer {
        &self.customer
    }

    fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }
}

impl VehicleContract for LeaseContract {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn customer(&self) -> &Customer {
        &self.customer
    }

    fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }
}

/// A contract after it has been appended to a ledger and assigned an identifier.
///
/// The VIN it carries is a historical reference: the vehicle is no longer on the lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recorded<C> {
    pub id: ContractId,
    #[serde(flatten)]
    pub contract: C,
}

impl<C: VehicleContract> Recorded<C> {
    pub fn vin(&self) -> Vin {
        self.contract.vehicle().vin
    }
}

impl<C> Entity for Recorded<C> {
    type Id = ContractId;

    fn id(&self) -> ContractId {
        self.id
    }
}
