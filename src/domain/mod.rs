pub mod geo;
pub mod record;

pub use record::{HousingRecord, RecordFields, RecordFilter, TriState, DEFAULT_STATUS, NO_FILTER};
