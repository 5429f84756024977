pub mod cleaner;

pub use cleaner::{infer_city_state, AddressComponents, FuelDataCleaner};
