//! Shared record types and serialization for the tavern simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod record;
pub mod summary;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use record::{CharacterSnapshot, DayRecord};
pub use summary::{RunOutcome, RunSummary};
