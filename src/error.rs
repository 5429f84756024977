use thiserror::Error;

/// Errors that abort a cleaning run.
///
/// Lookup misses, inference failures, and provider transport problems are
/// deliberately not represented here; those degrade gracefully inside the
/// pipeline and never stop the batch.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("csv processing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is missing required column `{0}`")]
    MissingColumn(String),

    #[error("non-numeric price `{value}` in row {row}")]
    PriceFormat { row: usize, value: String },

    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}
