//! Interactive dealership menu.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use chrono::Utc;
use rand::RngCore;

use dealership_contracts::{
    ContractLedger, Customer, FeeSchedule, LeaseTerms, LeaseVehicle, SellVehicle,
};
use dealership_core::Vin;
use dealership_infra::{InventoryTransactionCoordinator, TransactionError};
use dealership_inventory::{NewVehicle, VehicleQuery, VehicleRepository};

use crate::console::Console;
use crate::render;

const MAIN_OPTIONS: [&str; 12] = [
    "Search by Price",
    "Search by Make/Model",
    "Search by Year",
    "Search by Color",
    "Search by Mileage",
    "Search by Vehicle Type",
    "Search All Vehicles",
    "Add Vehicle to Lot",
    "Remove Vehicle from Lot",
    "Sell a Vehicle",
    "Lease a Vehicle",
    "Exit Program",
];

const MAKE_MODEL_OPTIONS: [&str; 3] = ["Search by Make", "Search by Model", "Search Make and Model"];

const CONFIRM_OPTIONS: [&str; 2] = ["Yes", "No"];

enum Flow {
    Continue,
    Exit,
}

pub struct Menu<'a, V, L, G, R, W> {
    coordinator: &'a InventoryTransactionCoordinator<V, L, G>,
    console: Console<R, W>,
}

impl<'a, V, L, G, R, W> Menu<'a, V, L, G, R, W>
where
    V: VehicleRepository,
    L: ContractLedger,
    G: RngCore,
    R: BufRead,
    W: Write,
{
    pub fn new(coordinator: &'a InventoryTransactionCoordinator<V, L, G>, console: Console<R, W>) -> Self {
        Self {
            coordinator,
            console,
        }
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Loop until "Exit Program" is chosen. Domain failures are reported and the
    /// loop continues; only console I/O errors end it early.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.title("Welcome to the Dealership!")?;
            let choice = self.console.prompt_option(&MAIN_OPTIONS)?;
            if let Flow::Exit = self.dispatch(choice)? {
                self.console.println("Thank you for coming to the dealership!")?;
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: usize) -> io::Result<Flow> {
        match choice {
            1 => self.search_by_price()?,
            2 => self.search_by_make_model()?,
            3 => self.search_by_year()?,
            4 => self.search_by_color()?,
            5 => self.search_by_mileage()?,
            6 => self.search_by_vehicle_type()?,
            7 => self.show_all()?,
            8 => self.add_vehicle()?,
            9 => self.remove_vehicle()?,
            10 => self.sell_vehicle()?,
            11 => self.lease_vehicle()?,
            _ => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn title(&mut self, text: &str) -> io::Result<()> {
        let rule = "=".repeat(text.len() + 4);
        self.console.println(format!("\n{rule}\n  {text}\n{rule}"))
    }

    fn report(&mut self, err: impl Display) -> io::Result<()> {
        self.console.println(format!("Error: {err}"))
    }

    fn show(&mut self, query: VehicleQuery) -> io::Result<()> {
        match self.coordinator.query(&query) {
            Ok(vehicles) => self.console.println(render::vehicle_table(&vehicles)),
            Err(e) => self.report(e),
        }
    }

    fn search_by_price(&mut self) -> io::Result<()> {
        self.title("Search Vehicles By Price")?;
        let (min, max) = self.console.prompt_range::<u64>("price")?;
        self.show(VehicleQuery::all().price(min, max))
    }

    fn search_by_make_model(&mut self) -> io::Result<()> {
        self.title("Search Vehicles By Make / Model")?;
        let query = match self.console.prompt_option(&MAKE_MODEL_OPTIONS)? {
            1 => VehicleQuery::all().make(self.console.prompt_string("Please enter a make: ")?),
            2 => VehicleQuery::all().model(self.console.prompt_string("Please enter a model: ")?),
            _ => {
                let make = self.console.prompt_string("Please enter a make: ")?;
                let model = self.console.prompt_string("Please enter a model: ")?;
                VehicleQuery::all().make_and_model(make, model)
            }
        };
        self.show(query)
    }

    fn search_by_year(&mut self) -> io::Result<()> {
        self.title("Search Vehicles By Year")?;
        let (min, max) = self.console.prompt_range::<u16>("year")?;
        self.show(VehicleQuery::all().year(min, max))
    }

    fn search_by_color(&mut self) -> io::Result<()> {
        self.title("Search Vehicles By Color")?;
        let color = self.console.prompt_string("Please enter a color: ")?;
        self.show(VehicleQuery::all().color(color))
    }

    fn search_by_mileage(&mut self) -> io::Result<()> {
        self.title("Search Vehicles By Mileage")?;
        let (min, max) = self.console.prompt_range::<u64>("mileage")?;
        self.show(VehicleQuery::all().mileage(min, max))
    }

    fn search_by_vehicle_type(&mut self) -> io::Result<()> {
        self.title("Search Vehicles By Vehicle Type")?;
        let vehicle_type = self.console.prompt_string("Please enter a vehicle type: ")?;
        self.show(VehicleQuery::all().vehicle_type(vehicle_type))
    }

    fn show_all(&mut self) -> io::Result<()> {
        self.title("All Vehicles")?;
        self.show(VehicleQuery::all())
    }

    fn add_vehicle(&mut self) -> io::Result<()> {
        self.title("Add a Vehicle to the Lot")?;
        let draft = NewVehicle {
            year: self.console.prompt_parse("Vehicle Year: ")?,
            make: self.console.prompt_string("Vehicle Make: ")?,
            model: self.console.prompt_string("Vehicle Model: ")?,
            vehicle_type: self.console.prompt_string("Vehicle Type: ")?,
            color: self.console.prompt_string("Vehicle Color: ")?,
            mileage: self.console.prompt_u64("Vehicle Mileage: ")?,
            price: self.console.prompt_u64("Vehicle Price: ")?,
        };

        match self.coordinator.add_vehicle(&draft, None) {
            Ok(vehicle) => {
                self.console.println("Vehicle added:")?;
                self.console.println(render::vehicle_table(&[vehicle]))
            }
            Err(e) => self.report(e),
        }
    }

    /// Show the chosen vehicle and ask for confirmation. `None` when the VIN is
    /// not on the lot or the user declines.
    fn choose_vehicle(&mut self, action: &str) -> io::Result<Option<Vin>> {
        self.show_all()?;
        let vin = self
            .console
            .prompt_vin(&format!("Please enter the VIN of the vehicle you want to {action}: "))?;

        let vehicle = match self.coordinator.find_by_vin(vin) {
            Ok(v) => v,
            Err(e) => {
                self.report(e)?;
                return Ok(None);
            }
        };

        self.console.println("You have chosen:")?;
        self.console.println(render::vehicle_table(&[vehicle]))?;
        self.console
            .println(format!("Are you sure you want to {action} this vehicle?"))?;
        if self.console.prompt_option(&CONFIRM_OPTIONS)? == 1 {
            Ok(Some(vin))
        } else {
            self.console.println("Returning to menu...")?;
            Ok(None)
        }
    }

    fn prompt_customer(&mut self) -> io::Result<Option<Customer>> {
        let name = self.console.prompt_string("Please enter your full name: ")?;
        let email = self.console.prompt_string("Please enter your email address: ")?;
        match Customer::new(name, email) {
            Ok(customer) => Ok(Some(customer)),
            Err(e) => {
                self.report(e)?;
                Ok(None)
            }
        }
    }

    fn remove_vehicle(&mut self) -> io::Result<()> {
        self.title("Remove a Vehicle From the Lot")?;
        let Some(vin) = self.choose_vehicle("remove")? else {
            return Ok(());
        };
        match self.coordinator.remove_vehicle(vin) {
            Ok(_) => self.console.println(format!("Vehicle {vin} removed from the lot.")),
            Err(e) => self.report(e),
        }
    }

    fn sell_vehicle(&mut self) -> io::Result<()> {
        self.title("Sales Contract")?;
        let Some(vin) = self.choose_vehicle("buy")? else {
            return Ok(());
        };
        let Some(customer) = self.prompt_customer()? else {
            return Ok(());
        };
        let financed = self
            .console
            .prompt_yes_no("Would you like to finance the vehicle? (Y/N) ")?;

        let outcome = self.coordinator.sell(SellVehicle {
            vin,
            customer,
            financed,
            fees: FeeSchedule::default(),
            occurred_at: Utc::now(),
        });
        self.finish(outcome.map(|recorded| render::sale_row(&recorded)))
    }

    fn lease_vehicle(&mut self) -> io::Result<()> {
        self.title("Lease Contract")?;
        let Some(vin) = self.choose_vehicle("lease")? else {
            return Ok(());
        };
        let Some(customer) = self.prompt_customer()? else {
            return Ok(());
        };

        let outcome = self.coordinator.lease(LeaseVehicle {
            vin,
            customer,
            terms: LeaseTerms::default(),
            occurred_at: Utc::now(),
        });
        self.finish(outcome.map(|recorded| render::lease_row(&recorded)))
    }

    fn finish(&mut self, outcome: Result<String, TransactionError>) -> io::Result<()> {
        match outcome {
            Ok(row) => {
                self.console.println("Contract recorded:")?;
                self.console.println(row)
            }
            Err(e) => self.report(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use dealership_contracts::InMemoryContractLedger;
    use dealership_inventory::{InMemoryVehicleRepository, Vehicle, VinAllocator};

    type TestCoordinator = InventoryTransactionCoordinator<InMemoryVehicleRepository, InMemoryContractLedger>;

    fn coordinator_with_civic() -> TestCoordinator {
        let civic = Vehicle {
            vin: Vin::new(123_456_789).unwrap(),
            year: 2018,
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            vehicle_type: "Sedan".to_string(),
            color: "Blue".to_string(),
            mileage: 30_000,
            price: 15_000,
            sold: false,
        };
        InventoryTransactionCoordinator::new(
            InMemoryVehicleRepository::with_vehicles([civic]).unwrap(),
            InMemoryContractLedger::new(),
            VinAllocator::seeded(1),
        )
    }

    fn run(coordinator: &TestCoordinator, script: &str) -> String {
        let console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let mut menu = Menu::new(coordinator, console);
        menu.run().unwrap();
        String::from_utf8(menu.into_console().into_output()).unwrap()
    }

    #[test]
    fn exit_ends_the_session() {
        let coordinator = coordinator_with_civic();
        let out = run(&coordinator, "12\n");
        assert!(out.contains("Welcome to the Dealership!"));
        assert!(out.contains("Thank you for coming to the dealership!"));
    }

    #[test]
    fn price_search_reprompts_on_inverted_range() {
        let coordinator = coordinator_with_civic();
        let out = run(&coordinator, "1\n20000\n10000\n10000\n20000\n12\n");
        assert!(out.contains("Minimum price cannot be greater than maximum price"));
        assert!(out.contains("123456789"));
    }

    #[test]
    fn make_and_model_submenu() {
        let coordinator = coordinator_with_civic();
        let out = run(&coordinator, "2\n3\nhonda\ncivic\n2\n1\nFord\n12\n");
        assert!(out.contains("Civic"));
        assert!(out.contains(render::EMPTY_INVENTORY));
    }

    #[test]
    fn add_allocates_a_vin() {
        let coordinator = coordinator_with_civic();
        run(
            &coordinator,
            "8\n2020\nToyota\nCorolla\nSedan\nWhite\n12000\n18000\n12\n",
        );
        let corollas = coordinator
            .query(&VehicleQuery::all().model("Corolla"))
            .unwrap();
        assert_eq!(corollas.len(), 1);
        assert_eq!(coordinator.list_all().unwrap().len(), 2);
    }

    #[test]
    fn sell_with_financing_records_contract_and_clears_lot() {
        let coordinator = coordinator_with_civic();
        let out = run(
            &coordinator,
            "10\n123456789\n1\nJane Doe\njane@example.com\nY\n12\n",
        );

        assert!(out.contains("Contract recorded:"));
        let sales = coordinator.list_sales().unwrap();
        assert_eq!(sales.len(), 1);
        assert!(sales[0].contract.financed);
        assert_eq!(sales[0].contract.customer.name, "Jane Doe");
        assert!(coordinator.list_all().unwrap().is_empty());
    }

    #[test]
    fn declining_removal_keeps_the_vehicle() {
        let coordinator = coordinator_with_civic();
        let out = run(&coordinator, "9\n123456789\n2\n12\n");
        assert!(out.contains("Returning to menu..."));
        assert_eq!(coordinator.list_all().unwrap().len(), 1);
    }

    #[test]
    fn leasing_an_unknown_vin_reports_and_continues() {
        let coordinator = coordinator_with_civic();
        let out = run(&coordinator, "11\n987654321\n7\n12\n");
        assert!(out.contains("Error: vehicle 987654321 not found in inventory"));
        assert!(coordinator.list_leases().unwrap().is_empty());
        assert_eq!(coordinator.list_all().unwrap().len(), 1);
    }
}
