pub mod datetime;

mod error;
pub use error::Error;

pub mod roster;
pub mod dues;
pub mod summary;
pub mod transactions;
