//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // tavern-events = { path = "../tavern-events", features = ["test-fixtures"] }
//!
//! use tavern_events::fixtures;
//!
//! let records = fixtures::sample_day_records();
//! let summary = fixtures::sample_summary();
//! ```

use crate::{DayRecord, RunSummary};

/// Returns three days of a winning run.
///
/// - day 1: never asked for advice (`""`), two-level gift outcome
/// - day 2: advice skipped (`null`), dragon slain
/// - day 3: advice given, caravan protected, money reaches 150
pub fn sample_day_records() -> Vec<DayRecord> {
    let json = include_str!("../tests/fixtures/sample_day_records.json");
    serde_json::from_str(json).expect("Failed to parse sample_day_records.json")
}

/// Returns the run summary wrapping [`sample_day_records`].
pub fn sample_summary() -> RunSummary {
    let json = include_str!("../tests/fixtures/sample_summary.json");
    RunSummary::from_json(json).expect("Failed to parse sample_summary.json")
}
