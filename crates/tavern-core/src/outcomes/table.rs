//! Outcome Table
//!
//! Static two-level lottery: each action maps to a weighted set of primary
//! outcomes, and some primary outcomes map to a weighted secondary set.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::effect::Effect;
use super::sample::{sample, validate_weights, SampleError};

/// Errors raised while building an outcome table
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("outcome table defines no actions")]
    Empty,

    #[error("duplicate action '{0}'")]
    DuplicateAction(String),

    #[error("duplicate secondary trigger '{0}'")]
    DuplicateTrigger(String),

    #[error("secondary outcomes for '{0}' do not follow any primary outcome")]
    UnreachableSecondary(String),

    #[error("outcome '{outcome}' of '{context}' has a non-finite effect")]
    NonFiniteEffect { context: String, outcome: String },

    #[error("outcomes of '{context}': {source}")]
    InvalidLottery {
        context: String,
        #[source]
        source: SampleError,
    },
}

/// A single possible result: narrative text plus its state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub text: String,
    pub effect: Effect,
}

impl Outcome {
    pub fn new(text: impl Into<String>, effect: Effect) -> Self {
        Self {
            text: text.into(),
            effect,
        }
    }

    /// Builds an outcome whose effect is read off its text
    pub fn tagged(text: impl Into<String>) -> Self {
        let text = text.into();
        let effect = Effect::from_text(&text);
        Self { text, effect }
    }
}

/// Weighted discrete distribution over outcomes
#[derive(Debug, Clone, PartialEq)]
pub struct Lottery {
    outcomes: Vec<Outcome>,
    weights: Vec<f64>,
}

impl Lottery {
    pub fn new(outcomes: Vec<Outcome>, weights: Vec<f64>) -> Result<Self, SampleError> {
        validate_weights(outcomes.len(), &weights)?;
        Ok(Self { outcomes, weights })
    }

    /// Builds a lottery from `(outcome, weight)` pairs
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Outcome, f64)>,
    ) -> Result<Self, SampleError> {
        let (outcomes, weights) = pairs.into_iter().unzip();
        Self::new(outcomes, weights)
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Probability of the outcome at `index`
    pub fn probability(&self, index: usize) -> f64 {
        let total: f64 = self.weights.iter().sum();
        self.weights.get(index).map(|w| w / total).unwrap_or(0.0)
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Outcome, SampleError> {
        sample(rng, &self.outcomes, &self.weights)
    }
}

/// Availability predicate for an action.
///
/// Thresholds are strict: `mood_above = 50` is not met at mood 50.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_above: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_above: Option<f64>,
}

impl Requirement {
    /// Always available
    pub fn none() -> Self {
        Self::default()
    }

    pub fn mood_and_health_above(mood: f64, health: f64) -> Self {
        Self {
            mood_above: Some(mood),
            health_above: Some(health),
        }
    }

    pub fn is_unconditional(&self) -> bool {
        self.mood_above.is_none() && self.health_above.is_none()
    }

    pub fn is_met(&self, health: f64, mood: f64) -> bool {
        self.mood_above.map_or(true, |min| mood > min)
            && self.health_above.map_or(true, |min| health > min)
    }
}

/// One primary action and its outcome distribution
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    pub name: String,
    pub requires: Requirement,
    pub lottery: Lottery,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>, requires: Requirement, lottery: Lottery) -> Self {
        Self {
            name: name.into(),
            requires,
            lottery,
        }
    }
}

/// Authoring form of an outcome.
///
/// When `effect` is omitted it is derived from `text` once, while the table
/// is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDef {
    pub text: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
}

/// Authoring form of a primary action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: String,
    #[serde(default)]
    pub requires: Requirement,
    pub outcomes: Vec<OutcomeDef>,
}

/// Authoring form of a secondary lottery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryDef {
    pub trigger: String,
    pub outcomes: Vec<OutcomeDef>,
}

fn lottery_from_defs(context: &str, defs: Vec<OutcomeDef>) -> Result<Lottery, TableError> {
    Lottery::from_pairs(defs.into_iter().map(|def| {
        let effect = def.effect.unwrap_or_else(|| Effect::from_text(&def.text));
        (Outcome::new(def.text, effect), def.weight)
    }))
    .map_err(|source| TableError::InvalidLottery {
        context: context.to_string(),
        source,
    })
}

fn check_effects(context: &str, lottery: &Lottery) -> Result<(), TableError> {
    match lottery.outcomes().iter().find(|o| !o.effect.is_finite()) {
        Some(outcome) => Err(TableError::NonFiniteEffect {
            context: context.to_string(),
            outcome: outcome.text.clone(),
        }),
        None => Ok(()),
    }
}

/// The complete, validated outcome configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeTable {
    actions: Vec<ActionSpec>,
    secondary: HashMap<String, Lottery>,
}

impl OutcomeTable {
    /// Builds a table, checking that names are unique, every effect is
    /// finite, and every secondary lottery hangs off some primary outcome.
    pub fn new(
        actions: Vec<ActionSpec>,
        secondary: Vec<(String, Lottery)>,
    ) -> Result<Self, TableError> {
        if actions.is_empty() {
            return Err(TableError::Empty);
        }

        let mut names = HashSet::new();
        for action in &actions {
            if !names.insert(action.name.as_str()) {
                return Err(TableError::DuplicateAction(action.name.clone()));
            }
            check_effects(&action.name, &action.lottery)?;
        }

        let primary_texts: HashSet<&str> = actions
            .iter()
            .flat_map(|a| a.lottery.outcomes())
            .map(|o| o.text.as_str())
            .collect();

        let mut secondary_map = HashMap::with_capacity(secondary.len());
        for (trigger, lottery) in secondary {
            if !primary_texts.contains(trigger.as_str()) {
                return Err(TableError::UnreachableSecondary(trigger));
            }
            if secondary_map.contains_key(&trigger) {
                return Err(TableError::DuplicateTrigger(trigger));
            }
            check_effects(&trigger, &lottery)?;
            secondary_map.insert(trigger, lottery);
        }

        Ok(Self {
            actions,
            secondary: secondary_map,
        })
    }

    /// Builds a table from its authoring form
    pub fn from_defs(
        actions: Vec<ActionDef>,
        secondary: Vec<SecondaryDef>,
    ) -> Result<Self, TableError> {
        let actions = actions
            .into_iter()
            .map(|def| {
                let lottery = lottery_from_defs(&def.name, def.outcomes)?;
                Ok(ActionSpec::new(def.name, def.requires, lottery))
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        let secondary = secondary
            .into_iter()
            .map(|def| {
                let lottery = lottery_from_defs(&def.trigger, def.outcomes)?;
                Ok((def.trigger, lottery))
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        Self::new(actions, secondary)
    }

    /// Actions in declaration order
    pub fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.name.as_str())
    }

    /// Secondary lottery triggered by a primary outcome, if any
    pub fn secondary(&self, primary_text: &str) -> Option<&Lottery> {
        self.secondary.get(primary_text)
    }

    /// Every secondary lottery with its trigger, in no particular order
    pub fn secondaries(&self) -> impl Iterator<Item = (&str, &Lottery)> {
        self.secondary
            .iter()
            .map(|(trigger, lottery)| (trigger.as_str(), lottery))
    }

    pub fn is_secondary_trigger(&self, primary_text: &str) -> bool {
        self.secondary.contains_key(primary_text)
    }

    pub fn secondary_count(&self) -> usize {
        self.secondary.len()
    }
}
