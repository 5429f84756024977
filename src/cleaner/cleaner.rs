use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info, warn};
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CleanError;
use crate::records::RecordSet;
use crate::zip_service::{LookupOutcome, ZipLookup};

pub const GROSS_PRICE: &str = "Gross Price";
pub const FUEL_TYPE: &str = "Fuel Type";
pub const FULL_ADDRESS: &str = "Full Address";

pub const CLEANED_FILE: &str = "cleanedData.csv";
pub const ANOMALY_FILE: &str = "dataAnomalies.csv";

/// Vendor substring that routes a row to the anomaly output.
const ANOMALY_VENDOR: &str = "pepsi";

/// City and state code inferred from free-text address parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressComponents {
    pub city: String,
    pub state: String,
}

/// Extract (city, state) from an address like `123 Main St, Dayton, OH 45402`.
///
/// Comma-split with per-segment trim. With three or more segments the city is
/// the second-to-last segment and the state is the first whitespace token of
/// the last; with exactly two, city is the first segment and state the first
/// token of the second. Anything else fails, as does an empty city or a last
/// segment with no token. Never guesses.
pub fn infer_city_state(addr: &str) -> Option<AddressComponents> {
    let parts: Vec<&str> = addr.split(',').map(str::trim).collect();

    let (city, tail) = if parts.len() >= 3 {
        (parts[parts.len() - 2], parts[parts.len() - 1])
    } else if parts.len() == 2 {
        (parts[0], parts[1])
    } else {
        return None;
    };

    let state = tail.split_whitespace().next()?;
    if city.is_empty() {
        return None;
    }

    Some(AddressComponents {
        city: city.to_string(),
        state: state.to_string(),
    })
}

/// End-to-end cleaner: price formatting, dedup, anomaly split, ZIP patching.
pub struct FuelDataCleaner {
    max_zip_lookups: usize,
    zip_regex: Regex,
}

impl FuelDataCleaner {
    pub fn new(max_zip_lookups: usize) -> Self {
        Self {
            max_zip_lookups,
            // Maximal run of exactly 5 digits, bounded by non-digit or edge.
            zip_regex: Regex::new(r"\b\d{5}\b").expect("valid zip pattern"),
        }
    }

    /// Run the whole pipeline against `src_csv`, writing `cleanedData.csv`
    /// and `dataAnomalies.csv` next to it. Returns the output directory.
    pub fn run(&self, src_csv: &Path, svc: &dyn ZipLookup) -> Result<PathBuf, CleanError> {
        let dir = match src_csv.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut records = RecordSet::from_path(src_csv)?;
        info!("read {} records from {}", records.len(), src_csv.display());

        // Price formatting is correctness-critical and runs before the first
        // write, so a fatal error here leaves no partial output behind.
        self.format_prices(&mut records)?;
        self.deduplicate(&mut records);
        let anomalies = self.split_anomalies(&mut records);
        info!(
            "{} records kept, {} anomalies",
            records.len(),
            anomalies.len()
        );

        anomalies.write_to_path(&dir.join(ANOMALY_FILE))?;

        let patched = self.patch_missing_zips(&mut records, svc);
        info!("patched {} missing zip codes", patched);

        records.write_to_path(&dir.join(CLEANED_FILE))?;
        Ok(dir)
    }

    /// Force the `Gross Price` column to fixed two-decimal text.
    ///
    /// Values are parsed as `Decimal` and rounded half-away-from-zero, so the
    /// exact `.005` boundary rounds up in magnitude ("2.005" becomes "2.01").
    /// A non-numeric value aborts the run.
    pub fn format_prices(&self, records: &mut RecordSet) -> Result<(), CleanError> {
        let col = records
            .column(GROSS_PRICE)
            .ok_or_else(|| CleanError::MissingColumn(GROSS_PRICE.to_string()))?;

        for (row, record) in records.records_mut().iter_mut().enumerate() {
            let raw = record.get(col).unwrap_or("").to_string();
            let value = Decimal::from_str(raw.trim()).map_err(|_| CleanError::PriceFormat {
                row,
                value: raw.clone(),
            })?;
            let rounded =
                value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            record.set(col, format!("{rounded:.2}"));
        }
        Ok(())
    }

    /// Drop rows that are field-for-field identical to an earlier row,
    /// keeping the first occurrence and the survivors' relative order.
    pub fn deduplicate(&self, records: &mut RecordSet) {
        let mut seen = HashSet::new();
        records.retain(|record| seen.insert(record.clone()));
    }

    /// Stable partition: rows whose `Fuel Type` contains the anomaly vendor
    /// (case-insensitive) move to the returned set. A missing or empty field
    /// is a non-match, and a missing column means no anomalies at all.
    pub fn split_anomalies(&self, records: &mut RecordSet) -> RecordSet {
        let mut anomalies = RecordSet::new(records.headers().to_vec());
        let Some(col) = records.column(FUEL_TYPE) else {
            return anomalies;
        };

        let (anomalous, kept): (Vec<_>, Vec<_>) =
            records.take_records().into_iter().partition(|record| {
                record
                    .get(col)
                    .is_some_and(|v| v.to_lowercase().contains(ANOMALY_VENDOR))
            });

        records.set_records(kept);
        anomalies.set_records(anomalous);
        anomalies
    }

    /// Patch the first `max_zip_lookups` rows whose address lacks a 5-digit
    /// token. Returns the number of rows actually amended.
    ///
    /// Selection happens up front, in row order. A row whose address does not
    /// decompose into city/state still consumes its slot without a service
    /// call; the loop never searches further for a replacement candidate.
    pub fn patch_missing_zips(&self, records: &mut RecordSet, svc: &dyn ZipLookup) -> usize {
        let Some(col) = records.column(FULL_ADDRESS) else {
            warn!("no `{}` column, skipping zip patching", FULL_ADDRESS);
            return 0;
        };

        let targets: Vec<usize> = records
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                !record
                    .get(col)
                    .is_some_and(|addr| self.zip_regex.is_match(addr))
            })
            .map(|(idx, _)| idx)
            .take(self.max_zip_lookups)
            .collect();

        let mut patched = 0;
        for idx in targets {
            let addr = records.records()[idx].get(col).unwrap_or("").to_string();
            let Some(components) = infer_city_state(&addr) else {
                debug!("could not infer city/state from {:?}", addr);
                continue;
            };

            match svc.lookup_zip(&components.city, &components.state) {
                LookupOutcome::Found(zip) => {
                    records.records_mut()[idx].set(col, format!("{} {}", addr.trim(), zip));
                    patched += 1;
                }
                LookupOutcome::NotFound => {
                    debug!("no zip found for {}, {}", components.city, components.state);
                }
            }
        }
        patched
    }
}
