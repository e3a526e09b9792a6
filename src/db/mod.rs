pub mod audit;
pub mod connection;
pub mod records;
pub mod stats;

pub use connection::{init_db, Database};
