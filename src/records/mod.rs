pub mod record;

pub use record::{Record, RecordSet};
