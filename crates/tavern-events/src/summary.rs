//! Run Summary
//!
//! The structured end-of-run export handed to the driver.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use uuid::Uuid;

use crate::record::{CharacterSnapshot, DayRecord};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Money reached the victory threshold
    Victory,
    /// Health reached zero
    Death,
    /// Every scheduled day was played without a terminal condition
    Survived,
}

impl RunOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunOutcome::Survived)
    }
}

/// Complete decision history of a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub character: String,
    pub outcome: RunOutcome,
    pub days_played: u32,
    pub final_state: CharacterSnapshot,
    #[serde(default)]
    pub decisions: Vec<DayRecord>,
}

impl RunSummary {
    pub fn new(
        outcome: RunOutcome,
        final_state: CharacterSnapshot,
        decisions: Vec<DayRecord>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            character: final_state.name.clone(),
            outcome,
            days_played: decisions.len() as u32,
            final_state,
            decisions,
        }
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a summary from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Writes the summary to a file as pretty JSON.
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = self.to_json_pretty()?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&RunOutcome::Victory).unwrap(),
            r#""victory""#
        );
        assert_eq!(
            serde_json::to_string(&RunOutcome::Survived).unwrap(),
            r#""survived""#
        );
        assert!(RunOutcome::Death.is_terminal());
        assert!(!RunOutcome::Survived.is_terminal());
    }

    #[test]
    fn test_new_counts_days() {
        let decisions = fixtures::sample_day_records();
        let final_state = decisions.last().unwrap().state.clone();
        let summary = RunSummary::new(RunOutcome::Survived, final_state, decisions);

        assert_eq!(summary.days_played, 3);
        assert_eq!(summary.character, "Aldric");
    }

    #[test]
    fn test_sample_summary_fixture_parses() {
        let summary = fixtures::sample_summary();
        assert_eq!(summary.outcome, RunOutcome::Victory);
        assert_eq!(summary.decisions.len(), summary.days_played as usize);
        assert_eq!(summary.decisions[0].human_advice.as_deref(), Some(""));
        assert_eq!(summary.decisions[1].human_advice, None);
    }

    #[test]
    fn test_write_to_file() {
        let summary = fixtures::sample_summary();
        let dir = std::env::temp_dir().join(format!("tavern_events_{}", summary.run_id));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("summary.json");

        summary.write_to(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let parsed = RunSummary::from_json(&content).unwrap();
        assert_eq!(parsed, summary);

        fs::remove_dir_all(&dir).ok();
    }
}
