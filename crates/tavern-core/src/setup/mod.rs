//! World Setup
//!
//! Built-in outcome tables for each world setting.

pub mod frontier;
pub mod tavern;

use serde::{Deserialize, Serialize};

use crate::outcomes::{ActionDef, OutcomeDef, OutcomeTable, Requirement, SecondaryDef, TableError};

pub use frontier::{frontier_actions, frontier_table};
pub use tavern::{tavern_actions, tavern_secondary, tavern_table};

/// Which built-in outcome table a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldSetting {
    #[default]
    Tavern,
    /// The tavern plus the marketplace and the woods
    Frontier,
}

impl WorldSetting {
    pub fn table(self) -> Result<OutcomeTable, TableError> {
        match self {
            WorldSetting::Tavern => tavern_table(),
            WorldSetting::Frontier => frontier_table(),
        }
    }
}

fn outcomes(pairs: &[(&str, f64)]) -> Vec<OutcomeDef> {
    pairs
        .iter()
        .map(|&(text, weight)| OutcomeDef {
            text: text.to_string(),
            weight,
            effect: None,
        })
        .collect()
}

fn action(name: &str, requires: Requirement, pairs: &[(&str, f64)]) -> ActionDef {
    ActionDef {
        name: name.to_string(),
        requires,
        outcomes: outcomes(pairs),
    }
}

fn secondary(trigger: &str, pairs: &[(&str, f64)]) -> SecondaryDef {
    SecondaryDef {
        trigger: trigger.to_string(),
        outcomes: outcomes(pairs),
    }
}
