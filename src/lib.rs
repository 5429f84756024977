pub mod cleaner;
pub mod error;
pub mod orchestrator;
pub mod records;
pub mod zip_service;

pub use cleaner::FuelDataCleaner;
pub use error::CleanError;
pub use orchestrator::run;
pub use records::{Record, RecordSet};
pub use zip_service::{LookupOutcome, ZipLookup, ZipService, ZipServiceConfig};
