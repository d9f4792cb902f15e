//! Append-only contract ledger boundary.
//!
//! The ledger is the audit trail of completed transactions. There are no update
//! or delete operations. Sales and leases live in separate tables, each with its
//! own sequential identifier starting at 1.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use dealership_core::ContractId;

use crate::contract::{LeaseContract, Recorded, SalesContract};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The append was rejected; nothing was written.
    #[error("ledger append rejected: {0}")]
    Rejected(String),

    #[error("ledger storage failure: {0}")]
    Storage(String),
}

pub trait ContractLedger: Send + Sync {
    /// Append a sale and return it with its assigned identifier.
    fn record_sale(&self, contract: SalesContract) -> Result<Recorded<SalesContract>, LedgerError>;

    /// Append a lease and return it with its assigned identifier.
    fn record_lease(&self, contract: LeaseContract) -> Result<Recorded<LeaseContract>, LedgerError>;

    /// All sales in creation order.
    fn list_sales(&self) -> Result<Vec<Recorded<SalesContract>>, LedgerError>;

    /// All leases in creation order.
    fn list_leases(&self) -> Result<Vec<Recorded<LeaseContract>>, LedgerError>;
}

impl<L> ContractLedger for Arc<L>
where
    L: ContractLedger + ?Sized,
{
    fn record_sale(&self, contract: SalesContract) -> Result<Recorded<SalesContract>, LedgerError> {
        (**self).record_sale(contract)
    }

    fn record_lease(&self, contract: LeaseContract) -> Result<Recorded<LeaseContract>, LedgerError> {
        (**self).record_lease(contract)
    }

    fn list_sales(&self) -> Result<Vec<Recorded<SalesContract>>, LedgerError> {
        (**self).list_sales()
    }

    fn list_leases(&self) -> Result<Vec<Recorded<LeaseContract>>, LedgerError> {
        (**self).list_leases()
    }
}

/// In-memory append-only ledger.
///
/// Intended for tests/dev and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryContractLedger {
    sales: RwLock<Vec<Recorded<SalesContract>>>,
    leases: RwLock<Vec<Recorded<LeaseContract>>>,
}

impl InMemoryContractLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id<C>(table: &[Recorded<C>]) -> ContractId {
    table
        .last()
        .map(|r| r.id.next())
        .unwrap_or(ContractId::new(1))
}

fn append<C: Clone>(table: &RwLock<Vec<Recorded<C>>>, contract: C) -> Result<Recorded<C>, LedgerError> {
    let mut rows = table
        .write()
        .map_err(|_| LedgerError::Storage("lock poisoned".to_string()))?;
    let recorded = Recorded {
        id: next_id(&rows),
        contract,
    };
    rows.push(recorded.clone());
    Ok(recorded)
}

fn snapshot<C: Clone>(table: &RwLock<Vec<Recorded<C>>>) -> Result<Vec<Recorded<C>>, LedgerError> {
    let rows = table
        .read()
        .map_err(|_| LedgerError::Storage("lock poisoned".to_string()))?;
    Ok(rows.clone())
}

impl ContractLedger for InMemoryContractLedger {
    fn record_sale(&self, contract: SalesContract) -> Result<Recorded<SalesContract>, LedgerError> {
        let recorded = append(&self.sales, contract)?;
        tracing::debug!(contract_id = %recorded.id, vin = %recorded.vin(), "sale recorded");
        Ok(recorded)
    }

    fn record_lease(&self, contract: LeaseContract) -> Result<Recorded<LeaseContract>, LedgerError> {
        let recorded = append(&self.leases, contract)?;
        tracing::debug!(contract_id = %recorded.id, vin = %recorded.vin(), "lease recorded");
        Ok(recorded)
    }

    fn list_sales(&self) -> Result<Vec<Recorded<SalesContract>>, LedgerError> {
        snapshot(&self.sales)
    }

    fn list_leases(&self) -> Result<Vec<Recorded<LeaseContract>>, LedgerError> {
        snapshot(&self.leases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Customer, FeeSchedule, LeaseTerms};
    use chrono::NaiveDate;
    use dealership_core::Vin;
    use dealership_inventory::Vehicle;

    fn vehicle(vin: u32) -> Vehicle {
        Vehicle {
            vin: Vin::new(vin).unwrap(),
            year: 2021,
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            vehicle_type: "Sedan".to_string(),
            color: "White".to_string(),
            mileage: 8_000,
            price: 21_000,
            sold: true,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
    }

    fn sale(vin: u32) -> SalesContract {
        SalesContract {
            date: date(),
            customer: Customer::new("Jane Doe", "jane@example.com").unwrap(),
            vehicle: vehicle(vin),
            fees: FeeSchedule::default(),
            financed: false,
        }
    }

    #[test]
    fn sales_get_sequential_ids_in_creation_order() {
        let ledger = InMemoryContractLedger::new();
        let a = ledger.record_sale(sale(111_111_111)).unwrap();
        let b = ledger.record_sale(sale(222_222_222)).unwrap();

        assert_eq!(a.id, ContractId::new(1));
        assert_eq!(b.id, ContractId::new(2));

        let listed = ledger.list_sales().unwrap();
        assert_eq!(listed, vec![a, b]);
    }

    #[test]
    fn sales_and_leases_are_numbered_independently() {
        let ledger = InMemoryContractLedger::new();
        ledger.record_sale(sale(111_111_111)).unwrap();
        ledger.record_sale(sale(222_222_222)).unwrap();

        let lease = ledger
            .record_lease(LeaseContract {
                date: date(),
                customer: Customer::new("John Roe", "john@example.com").unwrap(),
                vehicle: vehicle(333_333_333),
                terms: LeaseTerms {
                    monthly_payment: 350,
                    lease_cost: 12_600,
                },
            })
            .unwrap();

        assert_eq!(lease.id, ContractId::new(1));
        assert_eq!(ledger.list_leases().unwrap().len(), 1);
        assert_eq!(ledger.list_sales().unwrap().len(), 2);
    }

    #[test]
    fn empty_ledger_lists_nothing() {
        let ledger = InMemoryContractLedger::new();
        assert!(ledger.list_sales().unwrap().is_empty());
        assert!(ledger.list_leases().unwrap().is_empty());
    }
}
