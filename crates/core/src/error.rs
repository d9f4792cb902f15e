//! Domain error model.

use thiserror::Error;

use crate::id::Vin;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Range-queryable vehicle attribute, reported by [`DomainError::InvalidRange`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RangeField {
    Price,
    Year,
    Mileage,
}

impl RangeField {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeField::Price => "price",
            RangeField::Year => "year",
            RangeField::Mileage => "mileage",
        }
    }
}

impl core::fmt::Display for RangeField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Every variant is
/// recoverable at the adapter boundary; none of them is fatal to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure, out-of-range VIN).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The VIN is not in available inventory.
    #[error("vehicle {0} not found in inventory")]
    NotFound(Vin),

    /// A vehicle with this VIN is already on the lot.
    #[error("vehicle {0} already exists in inventory")]
    DuplicateVin(Vin),

    /// A range predicate was supplied with `min > max`.
    #[error("invalid {field} range: min {min} is greater than max {max}")]
    InvalidRange { field: RangeField, min: u64, max: u64 },

    /// The VIN exists but another transaction is currently consuming it.
    #[error("vehicle {0} is held by another transaction")]
    VehicleUnavailable(Vin),

    /// The backing store could not serve the request.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn invalid_range(field: RangeField, min: impl Into<u64>, max: impl Into<u64>) -> Self {
        Self::InvalidRange {
            field,
            min: min.into(),
            max: max.into(),
        }
    }
}
