pub mod zip_service;

pub use zip_service::{LookupOutcome, ZipLookup, ZipService, ZipServiceConfig};
