//! Character State
//!
//! The NPC's numeric attributes, the rules for applying outcome effects to
//! them, action availability, and the run-scoped decision log.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use tavern_events::{CharacterSnapshot, DayRecord};

use crate::memory::CharacterMemory;
use crate::outcomes::{Effect, OutcomeTable, Resource};

/// Initial journal entry before the first narrated day
pub const WAKE_UP_REPORT: &str = "Woke up in the tavern.";

/// Money at which the run is won
pub const VICTORY_MONEY: f64 = 150.0;

/// Upper bound for health, mood and trust
pub const STAT_MAX: f64 = 100.0;

fn clamp_stat(value: f64) -> f64 {
    value.clamp(0.0, STAT_MAX)
}

fn floor_money(value: f64) -> f64 {
    value.max(0.0)
}

/// Starting values for a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProfile {
    pub name: String,
    pub traits: Vec<String>,
    pub health: f64,
    pub money: f64,
    pub mood: f64,
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self {
            name: "Aldric".to_string(),
            traits: vec!["curious".to_string()],
            health: 100.0,
            money: 20.0,
            mood: 50.0,
        }
    }
}

/// The NPC for one run
#[derive(Debug, Clone)]
pub struct CharacterState {
    name: String,
    traits: BTreeSet<String>,
    health: f64,
    money: f64,
    mood: f64,
    trust: f64,
    last_report: String,
    decision_log: Vec<DayRecord>,
    memory: CharacterMemory,
}

impl CharacterState {
    /// Creates a character from its profile. Starting values are clamped
    /// into their domains.
    pub fn new(profile: &CharacterProfile, memory: CharacterMemory) -> Self {
        Self {
            name: profile.name.clone(),
            traits: profile.traits.iter().cloned().collect(),
            health: clamp_stat(profile.health),
            money: floor_money(profile.money),
            mood: clamp_stat(profile.mood),
            trust: 0.0,
            last_report: WAKE_UP_REPORT.to_string(),
            decision_log: Vec::new(),
            memory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn traits(&self) -> impl Iterator<Item = &str> {
        self.traits.iter().map(String::as_str)
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn money(&self) -> f64 {
        self.money
    }

    pub fn mood(&self) -> f64 {
        self.mood
    }

    pub fn trust(&self) -> f64 {
        self.trust
    }

    pub fn last_report(&self) -> &str {
        &self.last_report
    }

    /// True until the first narrated day replaces the wake-up line
    pub fn is_first_morning(&self) -> bool {
        self.last_report == WAKE_UP_REPORT
    }

    pub fn set_last_report(&mut self, report: impl Into<String>) {
        self.last_report = report.into();
    }

    pub fn memory(&self) -> &CharacterMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut CharacterMemory {
        &mut self.memory
    }

    pub fn decision_log(&self) -> &[DayRecord] {
        &self.decision_log
    }

    /// The day about to be played (1-based)
    pub fn current_day(&self) -> u32 {
        self.decision_log.len() as u32 + 1
    }

    /// Applies an outcome's effect, keeping every stat in its domain
    pub fn apply_effect(&mut self, effect: &Effect) {
        match *effect {
            Effect::Nothing => {}
            Effect::Die => self.health = 0.0,
            Effect::Adjust { resource, amount } => {
                self.update(resource, |current| current + amount);
            }
            Effect::Scale { resource, factor } => {
                self.update(resource, |current| current * factor);
            }
        }
    }

    /// Tags `text` with the effect rule table and applies the result.
    ///
    /// Returns the effect that was applied (`Nothing` if no rule matched).
    pub fn apply_effect_text(&mut self, text: &str) -> Effect {
        let effect = Effect::from_text(text);
        self.apply_effect(&effect);
        effect
    }

    fn update(&mut self, resource: Resource, f: impl FnOnce(f64) -> f64) {
        match resource {
            Resource::Health => self.health = clamp_stat(f(self.health)),
            Resource::Mood => self.mood = clamp_stat(f(self.mood)),
            Resource::Money => self.money = floor_money(f(self.money)),
        }
    }

    /// Shifts mood by `delta`, clamped to [0, 100]
    pub fn adjust_mood(&mut self, delta: f64) {
        self.update(Resource::Mood, |mood| mood + delta);
    }

    /// Raises trust toward the advisor; returns the new trust level
    pub fn receive_advice(&mut self, gain: f64) -> f64 {
        self.trust = clamp_stat(self.trust + gain);
        self.trust
    }

    /// Actions whose requirement currently holds, in table order
    pub fn available_actions<'t>(&self, table: &'t OutcomeTable) -> Vec<&'t str> {
        table
            .actions()
            .iter()
            .filter(|action| action.requires.is_met(self.health, self.mood))
            .map(|action| action.name.as_str())
            .collect()
    }

    pub fn alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn won(&self) -> bool {
        self.won_with(VICTORY_MONEY)
    }

    pub fn won_with(&self, victory_money: f64) -> bool {
        self.money >= victory_money
    }

    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            name: self.name.clone(),
            traits: self.traits.iter().cloned().collect(),
            health: self.health,
            money: self.money,
            mood: self.mood,
            trust: self.trust,
        }
    }

    /// Appends today's record with a snapshot of the current state
    pub fn log_day(
        &mut self,
        action: impl Into<String>,
        outcome: impl Into<String>,
        human_advice: Option<String>,
        reasoning: Option<String>,
    ) -> &DayRecord {
        let record = DayRecord {
            day: self.current_day(),
            action: action.into(),
            outcome: outcome.into(),
            human_advice,
            reasoning,
            state: self.snapshot(),
        };
        self.decision_log.push(record);
        &self.decision_log[self.decision_log.len() - 1]
    }
}
