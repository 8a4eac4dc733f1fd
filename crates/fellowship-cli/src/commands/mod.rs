mod members;
pub use members::*;

mod dues;
pub use dues::*;

mod finance;
pub use finance::*;

mod search;
pub use search::*;

mod announcements;
pub use announcements::*;
