//! Inventory domain module.
//!
//! Owns the vehicles currently on the lot: the vehicle model, predicate-set
//! queries, the repository boundary, and VIN allocation.

pub mod query;
pub mod repository;
pub mod vehicle;
pub mod vin;

pub use query::{Range, VehicleQuery};
pub use repository::{InMemoryVehicleRepository, VehicleRepository};
pub use vehicle::{NewVehicle, Vehicle};
pub use vin::VinAllocator;
