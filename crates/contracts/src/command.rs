use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealership_core::Vin;

use crate::contract::{Customer, FeeSchedule, LeaseTerms};

/// Command: SellVehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellVehicle {
    pub vin: Vin,
    pub customer: Customer,
    pub financed: bool,
    pub fees: FeeSchedule,
    /// The contract is dated with the calendar day of this instant.
    pub occurred_at: DateTime<Utc>,
}

/// Command: LeaseVehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseVehicle {
    pub vin: Vin,
    pub customer: Customer,
    pub terms: LeaseTerms,
    pub occurred_at: DateTime<Utc>,
}
