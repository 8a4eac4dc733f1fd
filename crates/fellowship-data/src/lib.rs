
// Operations
mod operations;
pub use operations::*;

// Models
mod members;
pub use members::*;

mod dues;
pub use dues::*;

mod ledger;
pub use ledger::*;

mod announcements;
pub use announcements::*;
