
pub mod connection;
pub use connection::Connection;

pub mod results;
pub mod schema;

mod members;
mod dues;
mod ledger;
mod announcements;
