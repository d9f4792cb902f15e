use serde::{Deserialize, Serialize};

use dealership_core::{DomainError, DomainResult, Entity, Vin};

/// A vehicle on the lot.
///
/// Monetary amounts and mileage are whole units; negative values are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vin: Vin,
    pub year: u16,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
    pub color: String,
    pub mileage: u64,
    pub price: u64,
    #[serde(default)]
    pub sold: bool,
}

impl Entity for Vehicle {
    type Id = Vin;

    fn id(&self) -> Vin {
        self.vin
    }
}

/// Vehicle attributes collected by an add-vehicle request, before a VIN is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVehicle {
    pub year: u16,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
    pub color: String,
    pub mileage: u64,
    pub price: u64,
}

impl NewVehicle {
    pub fn validate(&self) -> DomainResult<()> {
        for (field, value) in [
            ("make", &self.make),
            ("model", &self.model),
            ("vehicle_type", &self.vehicle_type),
            ("color", &self.color),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }

    /// Bind the attributes to a VIN, trimming the text fields.
    pub fn with_vin(&self, vin: Vin) -> DomainResult<Vehicle> {
        self.validate()?;
        Ok(Vehicle {
            vin,
            year: self.year,
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            vehicle_type: self.vehicle_type.trim().to_string(),
            color: self.color.trim().to_string(),
            mileage: self.mileage,
            price: self.price,
            sold: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civic() -> NewVehicle {
        NewVehicle {
            year: 2020,
            make: " Honda ".to_string(),
            model: "Civic".to_string(),
            vehicle_type: "Sedan".to_string(),
            color: "Blue".to_string(),
            mileage: 15_000,
            price: 18_000,
        }
    }

    #[test]
    fn with_vin_binds_identity_and_trims_text() {
        let vin = Vin::new(123_456_789).unwrap();
        let vehicle = civic().with_vin(vin).unwrap();
        assert_eq!(vehicle.id(), vin);
        assert_eq!(vehicle.make, "Honda");
        assert!(!vehicle.sold);
    }

    #[test]
    fn blank_text_fields_are_rejected() {
        let mut draft = civic();
        draft.color = "   ".to_string();
        let err = draft.with_vin(Vin::new(123_456_789).unwrap()).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("color") => {}
            other => panic!("expected color validation error, got {other:?}"),
        }
    }
}
