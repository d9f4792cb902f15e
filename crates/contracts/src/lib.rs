//! Contracts domain module.
//!
//! Sale and lease contracts, the commands that produce them, and the
//! append-only ledger that records them.

pub mod command;
pub mod contract;
pub mod ledger;

pub use command::{LeaseVehicle, SellVehicle};
pub use contract::{
    Customer, FeeSchedule, LeaseContract, LeaseTerms, Recorded, SalesContract, VehicleContract,
};
pub use ledger::{ContractLedger, InMemoryContractLedger, LedgerError};
