//! The department's announcement board: posting, editing and
//! removing notices, and reading them as a paginated feed.

mod error;
pub use error::Error;

pub mod board;
pub mod feed;
