mod console;
mod menu;
mod render;

use std::io;
use std::time::Duration;

use clap::Parser;

use dealership_contracts::InMemoryContractLedger;
use dealership_infra::InventoryTransactionCoordinator;
use dealership_inventory::{InMemoryVehicleRepository, VinAllocator};
use dealership_observability::LogFormat;

use console::Console;
use menu::Menu;

#[derive(Parser)]
#[command(name = "dealership")]
#[command(about = "Interactive dealership lot and contract console.")]
struct CommandLine {
    /// Seed for deterministic VIN allocation
    #[arg(long, env = "DEALERSHIP_VIN_SEED")]
    vin_seed: Option<u64>,

    /// How long a mutation waits for a VIN held by another transaction
    #[arg(long, env = "DEALERSHIP_LOCK_TIMEOUT_MS", default_value_t = 2000)]
    lock_timeout_ms: u64,

    /// Log output: json or pretty (logs go to stderr in pretty mode)
    #[arg(long, env = "DEALERSHIP_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let args = CommandLine::parse();
    dealership_observability::init(args.log_format);

    let allocator = match args.vin_seed {
        Some(seed) => VinAllocator::seeded(seed),
        None => VinAllocator::from_entropy(),
    };
    let coordinator = InventoryTransactionCoordinator::new(
        InMemoryVehicleRepository::new(),
        InMemoryContractLedger::new(),
        allocator,
    )
    .with_lock_timeout(Duration::from_millis(args.lock_timeout_ms));

    let console = Console::new(io::stdin().lock(), io::stdout().lock());
    match Menu::new(&coordinator, console).run() {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            tracing::info!("input closed, exiting");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
