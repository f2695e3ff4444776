//! Common test infrastructure
//!
//! Fixtures write a metadata sheet into a temporary directory and build a
//! generator pointed at it.

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::TestSheet;
