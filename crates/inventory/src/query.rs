//! Predicate-set queries over on-lot vehicles.
//!
//! A [`VehicleQuery`] is a conjunction: a vehicle matches when it satisfies every
//! predicate that is present. An absent predicate places no constraint on its field.
//!
//! Text predicates (color, vehicle type, make, model) use case-insensitive exact
//! matching after trimming surrounding whitespace. "honda" matches "Honda" but
//! "hon" does not.

use serde::{Deserialize, Serialize};

use dealership_core::{DomainError, DomainResult, RangeField};

use crate::vehicle::Vehicle;

/// Inclusive `[min, max]` bound on a numeric attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T> Range<T>
where
    T: Copy + PartialOrd + Into<u64>,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, field: RangeField) -> DomainResult<()> {
        if self.min > self.max {
            return Err(DomainError::invalid_range(field, self.min, self.max));
        }
        Ok(())
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Conjunction of optional predicates over vehicle attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleQuery {
    pub price: Option<Range<u64>>,
    pub year: Option<Range<u16>>,
    pub mileage: Option<Range<u64>>,
    pub color: Option<String>,
    pub vehicle_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
}

impl VehicleQuery {
    /// Query with no predicates; matches every vehicle.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn price(mut self, min: u64, max: u64) -> Self {
        self.price = Some(Range::new(min, max));
        self
    }

    pub fn year(mut self, min: u16, max: u16) -> Self {
        self.year = Some(Range::new(min, max));
        self
    }

    pub fn mileage(mut self, min: u64, max: u64) -> Self {
        self.mileage = Some(Range::new(min, max));
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn vehicle_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = Some(vehicle_type.into());
        self
    }

    pub fn make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Make and model must both match.
    pub fn make_and_model(self, make: impl Into<String>, model: impl Into<String>) -> Self {
        self.make(make).model(model)
    }

    /// Check every range pair. Must pass before the query touches a repository.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(r) = &self.price {
            r.validate(RangeField::Price)?;
        }
        if let Some(r) = &self.year {
            r.validate(RangeField::Year)?;
        }
        if let Some(r) = &self.mileage {
            r.validate(RangeField::Mileage)?;
        }
        Ok(())
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.price.is_none_or(|r| r.contains(vehicle.price))
            && self.year.is_none_or(|r| r.contains(vehicle.year))
            && self.mileage.is_none_or(|r| r.contains(vehicle.mileage))
            && text_matches(self.color.as_deref(), &vehicle.color)
            && text_matches(self.vehicle_type.as_deref(), &vehicle.vehicle_type)
            && text_matches(self.make.as_deref(), &vehicle.make)
            && text_matches(self.model.as_deref(), &vehicle.model)
    }
}

fn text_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        None => true,
        Some(w) => w.trim().to_lowercase() == actual.trim().to_lowercase(),
    }
}
