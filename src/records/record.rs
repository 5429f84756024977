use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::CleanError;

/// One row of the tabular data set.
///
/// Fields are positionally aligned with the owning [`RecordSet`]'s headers.
/// Rows have no identity beyond field equality, so `Eq`/`Hash` derive gives
/// exactly the full-row equality deduplication needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record(Vec<String>);

impl Record {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    pub fn set(&mut self, idx: usize, value: String) {
        if let Some(field) = self.0.get_mut(idx) {
            *field = value;
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

/// An ordered sequence of [`Record`]s sharing one header schema.
#[derive(Debug, Clone)]
pub struct RecordSet {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            records: Vec::new(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, CleanError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CleanError> {
        let mut rdr = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            records.push(Record::new(row.iter().map(String::from).collect()));
        }

        Ok(Self { headers, records })
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), CleanError> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Writes headers then rows, with no trailing index column.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CleanError> {
        let mut wtr = WriterBuilder::new().from_writer(writer);
        wtr.write_record(&self.headers)?;
        for record in &self.records {
            wtr.write_record(record.fields())?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Index of a column by header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Moves all rows out, leaving the set empty with its headers intact.
    pub fn take_records(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn retain<F: FnMut(&Record) -> bool>(&mut self, f: F) {
        self.records.retain(f);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
