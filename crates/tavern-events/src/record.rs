//! Day Records
//!
//! Per-day decision records and character state snapshots.

use serde::{Deserialize, Serialize};

/// Point-in-time view of the NPC's numeric state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub name: String,
    #[serde(default)]
    pub traits: Vec<String>,
    pub health: f64,
    pub money: f64,
    pub mood: f64,
    #[serde(default)]
    pub trust: f64,
}

/// One entry of the run's decision log.
///
/// `human_advice` is always serialized so that "never asked" (`""`) and
/// "skipped" (`null`) stay distinguishable in exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u32,
    pub action: String,
    pub outcome: String,
    pub human_advice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub state: CharacterSnapshot,
}

impl DayRecord {
    /// True when the advisor actually said something this day
    pub fn had_advice(&self) -> bool {
        self.human_advice
            .as_deref()
            .map(|a| !a.trim().is_empty())
            .unwrap_or(false)
    }
}
