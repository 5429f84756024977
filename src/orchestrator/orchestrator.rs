use std::env;
use std::path::Path;

use log::info;

use crate::cleaner::FuelDataCleaner;
use crate::error::CleanError;
use crate::zip_service::{ZipService, ZipServiceConfig};

/// Environment variable holding the primary provider's API key.
pub const API_KEY_ENV: &str = "ZIPBASE_KEY";

/// Patch at most this many missing ZIP codes per run.
pub const DEFAULT_MAX_ZIP_LOOKUPS: usize = 5;

/// Wire up the service and cleaner and run the pipeline against `input`.
///
/// The environment is consulted here, once, at the boundary; the service
/// itself only ever sees explicit configuration. An absent key disables the
/// primary provider without error.
pub fn run(input: &Path) -> Result<(), CleanError> {
    let api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
    if api_key.is_none() {
        info!("{} not set, primary zip provider disabled", API_KEY_ENV);
    }

    let svc = ZipService::new(ZipServiceConfig {
        api_key,
        ..ZipServiceConfig::default()
    })?;
    let cleaner = FuelDataCleaner::new(DEFAULT_MAX_ZIP_LOOKUPS);

    let out_dir = cleaner.run(input, &svc)?;
    let resolved = out_dir.canonicalize().unwrap_or(out_dir);
    println!("Cleaning complete: {}", resolved.display());

    Ok(())
}
