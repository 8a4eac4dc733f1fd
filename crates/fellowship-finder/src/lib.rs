//! Member finder: look up members by a fragment of their
//! name together with their dues, contributions and donations.

mod search;
pub use search::*;

mod highlight;
pub use highlight::*;

mod debounce;
pub use debounce::*;

mod finder;
pub use finder::*;

#[cfg(test)]
mod testing;
