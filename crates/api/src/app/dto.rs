use chrono::Utc;
use serde::Deserialize;

use dealership_contracts::{Customer, FeeSchedule, LeaseTerms, LeaseVehicle, SellVehicle};
use dealership_core::{DomainResult, Vin};
use dealership_inventory::{NewVehicle, Range, VehicleQuery};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddVehicleRequest {
    /// Fixed VIN; omit to have one allocated.
    pub vin: Option<u32>,
    pub year: u16,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
    pub color: String,
    pub mileage: u64,
    pub price: u64,
}

impl AddVehicleRequest {
    pub fn into_parts(self) -> DomainResult<(NewVehicle, Option<Vin>)> {
        let vin = self.vin.map(Vin::new).transpose()?;
        let draft = NewVehicle {
            year: self.year,
            make: self.make,
            model: self.model,
            vehicle_type: self.vehicle_type,
            color: self.color,
            mileage: self.mileage,
            price: self.price,
        };
        Ok((draft, vin))
    }
}

/// `?min=..&max=..`
#[derive(Debug, Deserialize)]
pub struct RangeParams<T> {
    pub min: T,
    pub max: T,
}

impl<T> From<RangeParams<T>> for Range<T> {
    fn from(value: RangeParams<T>) -> Self {
        Range {
            min: value.min,
            max: value.max,
        }
    }
}

/// Combined search. A range with only one bound is open on the other side.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_year: Option<u16>,
    pub max_year: Option<u16>,
    pub min_mileage: Option<u64>,
    pub max_mileage: Option<u64>,
    pub color: Option<String>,
    pub vehicle_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
}

impl SearchParams {
    pub fn into_query(self) -> VehicleQuery {
        VehicleQuery {
            price: bounds(self.min_price, self.max_price, 0, u64::MAX),
            year: bounds(self.min_year, self.max_year, 0, u16::MAX),
            mileage: bounds(self.min_mileage, self.max_mileage, 0, u64::MAX),
            color: self.color,
            vehicle_type: self.vehicle_type,
            make: self.make,
            model: self.model,
        }
    }
}

fn bounds<T: Copy>(min: Option<T>, max: Option<T>, floor: T, ceiling: T) -> Option<Range<T>> {
    match (min, max) {
        (None, None) => None,
        (min, max) => Some(Range {
            min: min.unwrap_or(floor),
            max: max.unwrap_or(ceiling),
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub vin: u32,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub financed: bool,
    #[serde(default)]
    pub fees: FeeSchedule,
}

impl SellRequest {
    pub fn into_command(self) -> DomainResult<SellVehicle> {
        Ok(SellVehicle {
            vin: Vin::new(self.vin)?,
            customer: Customer::new(self.customer_name, self.customer_email)?,
            financed: self.financed,
            fees: self.fees,
            occurred_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaseRequest {
    pub vin: u32,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub terms: LeaseTerms,
}

impl LeaseRequest {
    pub fn into_command(self) -> DomainResult<LeaseVehicle> {
        Ok(LeaseVehicle {
            vin: Vin::new(self.vin)?,
            customer: Customer::new(self.customer_name, self.customer_email)?,
            terms: self.terms,
            occurred_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_with_one_bound_is_open_on_the_other() {
        let query = SearchParams {
            min_price: Some(5_000),
            max_year: Some(2015),
            ..SearchParams::default()
        }
        .into_query();

        assert_eq!(query.price, Some(Range::new(5_000, u64::MAX)));
        assert_eq!(query.year, Some(Range::new(0, 2015)));
        assert_eq!(query.mileage, None);
    }

    #[test]
    fn out_of_range_vin_in_body_is_rejected() {
        let req = SellRequest {
            vin: 12_345,
            customer_name: "Jane Doe".to_string(),
            customer_email: "jane@example.com".to_string(),
            financed: false,
            fees: FeeSchedule::default(),
        };
        assert!(req.into_command().is_err());
    }
}
