use std::fs;

use fuel_data_cleaner::{CleanError, FuelDataCleaner, LookupOutcome, RecordSet, ZipLookup};

/// Deterministic lookup double standing in for the remote providers.
struct StubLookup;

impl ZipLookup for StubLookup {
    fn lookup_zip(&self, city: &str, state: &str) -> LookupOutcome {
        match (city, state) {
            ("Cincinnati", "OH") => LookupOutcome::Found("45202".to_string()),
            _ => LookupOutcome::NotFound,
        }
    }
}

const INPUT: &str = "\
Fuel Type,Gross Price,Full Address\n\
Diesel,3.456,\"123 Main St, Dayton, OH 45402\"\n\
Regular,2.005,\"456 Oak Ave, Cincinnati, OH\"\n\
Regular,2.005,\"456 Oak Ave, Cincinnati, OH\"\n\
Pepsi Cola,1.5,\"789 Pine Rd, Columbus, OH\"\n\
Premium,4,garbage\n";

#[test]
fn test_full_pipeline_produces_cleaned_and_anomaly_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fuelPurchaseData.csv");
    fs::write(&input, INPUT).unwrap();

    let cleaner = FuelDataCleaner::new(5);
    let out_dir = cleaner.run(&input, &StubLookup).unwrap();
    assert_eq!(out_dir, dir.path());

    let cleaned = RecordSet::from_path(&out_dir.join("cleanedData.csv")).unwrap();
    let anomalies = RecordSet::from_path(&out_dir.join("dataAnomalies.csv")).unwrap();

    // Duplicate dropped, pepsi row routed to anomalies.
    assert_eq!(cleaned.len(), 3);
    assert_eq!(anomalies.len(), 1);

    let fuel = cleaned.column("Fuel Type").unwrap();
    let price = cleaned.column("Gross Price").unwrap();
    let addr = cleaned.column("Full Address").unwrap();

    let rows: Vec<&fuel_data_cleaner::Record> = cleaned.records().iter().collect();
    assert_eq!(rows[0].get(fuel), Some("Diesel"));
    assert_eq!(rows[0].get(price), Some("3.46"));
    assert_eq!(rows[0].get(addr), Some("123 Main St, Dayton, OH 45402"));

    // Midpoint rounds away from zero and the missing ZIP was patched in.
    assert_eq!(rows[1].get(price), Some("2.01"));
    assert_eq!(rows[1].get(addr), Some("456 Oak Ave, Cincinnati, OH 45202"));

    // Unparseable address is left alone but kept in the cleaned output.
    assert_eq!(rows[2].get(price), Some("4.00"));
    assert_eq!(rows[2].get(addr), Some("garbage"));

    let anomaly = &anomalies.records()[0];
    assert_eq!(anomaly.get(fuel), Some("Pepsi Cola"));
    assert_eq!(anomaly.get(price), Some("1.50"));
}

#[test]
fn test_bad_price_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fuelPurchaseData.csv");
    fs::write(
        &input,
        "Fuel Type,Gross Price,Full Address\nDiesel,oops,\"1 A St, Dayton, OH\"\n",
    )
    .unwrap();

    let cleaner = FuelDataCleaner::new(5);
    let err = cleaner.run(&input, &StubLookup).unwrap_err();
    assert!(matches!(err, CleanError::PriceFormat { row: 0, .. }));

    assert!(!dir.path().join("cleanedData.csv").exists());
    assert!(!dir.path().join("dataAnomalies.csv").exists());
}

#[test]
fn test_missing_input_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let cleaner = FuelDataCleaner::new(5);
    let err = cleaner.run(&dir.path().join("absent.csv"), &StubLookup);
    assert!(err.is_err());
    assert!(!dir.path().join("cleanedData.csv").exists());
}
