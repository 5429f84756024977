mod cleaner;
mod error;
mod orchestrator;
mod records;
mod zip_service;

use std::path::Path;
use std::process;

use log::info;

use orchestrator::run;

/// Raw fuel-purchase data, resolved relative to the working directory.
const INPUT_CSV: &str = "data/fuelPurchaseData.csv";

fn main() {
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    info!("starting fuel data cleaner with file: {}", INPUT_CSV);

    if let Err(e) = run(Path::new(INPUT_CSV)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
