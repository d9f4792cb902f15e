//! Fixed-width text rendering for vehicles and contracts.

use dealership_contracts::{LeaseContract, Recorded, SalesContract, VehicleContract};
use dealership_inventory::Vehicle;

pub const EMPTY_INVENTORY: &str = "No vehicles in inventory";

pub fn vehicle_header() -> String {
    let header = format!(
        "{:<10} {:<6} {:<12} {:<12} {:<12} {:<10} {:>10} {:>10}",
        "VIN", "YEAR", "MAKE", "MODEL", "TYPE", "COLOR", "MILEAGE", "PRICE"
    );
    let rule = "-".repeat(header.len());
    format!("{header}\n{rule}")
}

/// Text columns are truncated to their width so rows stay aligned.
pub fn vehicle_row(vehicle: &Vehicle) -> String {
    format!(
        "{:<10} {:<6} {:<12.12} {:<12.12} {:<12.12} {:<10.10} {:>10} {:>10}",
        vehicle.vin,
        vehicle.year,
        vehicle.make,
        vehicle.model,
        vehicle.vehicle_type,
        vehicle.color,
        vehicle.mileage,
        vehicle.price
    )
}

pub fn vehicle_table(vehicles: &[Vehicle]) -> String {
    if vehicles.is_empty() {
        return EMPTY_INVENTORY.to_string();
    }
    let mut lines = vec![vehicle_header()];
    lines.extend(vehicles.iter().map(vehicle_row));
    lines.join("\n")
}

fn contract_prefix<C: VehicleContract>(recorded: &Recorded<C>) -> String {
    let vehicle = recorded.contract.vehicle();
    format!(
        "#{:<5} {} {:<20.20} {} {} {}",
        recorded.id.get(),
        recorded.contract.date(),
        recorded.contract.customer().name,
        vehicle.vin,
        vehicle.make,
        vehicle.model
    )
}

pub fn sale_row(recorded: &Recorded<SalesContract>) -> String {
    let fees = recorded.contract.fees;
    format!(
        "{} | sale | financed: {} | tax {} recording {} processing {}",
        contract_prefix(recorded),
        if recorded.contract.financed { "yes" } else { "no" },
        fees.tax_amount,
        fees.recording_fee,
        fees.processing_fee
    )
}

pub fn lease_row(recorded: &Recorded<LeaseContract>) -> String {
    let terms = recorded.contract.terms;
    format!(
        "{} | lease | monthly {} | cost {}",
        contract_prefix(recorded),
        terms.monthly_payment,
        terms.lease_cost
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dealership_contracts::{Customer, FeeSchedule};
    use dealership_core::{ContractId, Vin};

    fn civic() -> Vehicle {
        Vehicle {
            vin: Vin::new(123_456_789).unwrap(),
            year: 2018,
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            vehicle_type: "Sedan".to_string(),
            color: "Blue".to_string(),
            mileage: 30_000,
            price: 15_000,
            sold: false,
        }
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(vehicle_table(&[]), EMPTY_INVENTORY);
    }

    #[test]
    fn rows_line_up_with_header() {
        let header = vehicle_header();
        let title = header.lines().next().unwrap();
        let row = vehicle_row(&civic());
        assert_eq!(title.len(), row.len());
        assert!(row.starts_with("123456789  2018"));
    }

    #[test]
    fn long_text_is_truncated() {
        let mut v = civic();
        v.model = "Civic Type R Limited Edition".to_string();
        assert_eq!(vehicle_row(&v).len(), vehicle_row(&civic()).len());
    }

    #[test]
    fn sale_row_shows_date_customer_and_vin() {
        let recorded = Recorded {
            id: ContractId::new(1),
            contract: SalesContract {
                date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
                customer: Customer::new("Jane Doe", "jane@example.com").unwrap(),
                vehicle: civic(),
                fees: FeeSchedule::default(),
                financed: true,
            },
        };
        let row = sale_row(&recorded);
        assert!(row.contains("2026-10-16"));
        assert!(row.contains("Jane Doe"));
        assert!(row.contains("123456789"));
        assert!(row.contains("financed: yes"));
    }
}
