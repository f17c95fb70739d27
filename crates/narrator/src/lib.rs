//! Narrator: the character's voice.
//!
//! The narrator consults an oracle (a local LLM) at four points of a day:
//! the overnight mood shift, the choice of action, the journal entry, and
//! the periodic reflection. Every call has a fallback, so a run completes
//! with the oracle down.
//!
//! # Modules
//!
//! - [`oracle`]: the `Oracle` trait, the Ollama client and the offline stand-in
//! - [`prompts`]: prompt text for each call
//! - [`parse`]: pulling actions, integers and JSON out of replies
//! - [`config`]: the `[narrator]` configuration section

pub mod config;
pub mod oracle;
pub mod parse;
pub mod prompts;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

pub use config::{ConfigError, NarratorConfig, Temperatures};
pub use oracle::{OfflineOracle, OllamaOracle, Oracle, OracleError};
pub use parse::{ParsedDecision, ParsedReflection};

use tavern_core::{CharacterState, MemoryError};

/// Where a decision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    /// Parsed from the oracle's reply
    Oracle,
    /// The oracle could not be reached
    Fallback,
    /// The reply named no available action
    Default,
}

/// The action chosen for the day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: String,
    pub reasoning: Option<String>,
    pub source: DecisionSource,
}

/// Journal line used when the oracle cannot narrate
pub fn fallback_report(action: &str, outcome: &str) -> String {
    format!("Today I chose to {}. {}.", action, outcome.trim_end_matches('.'))
}

/// Oracle-backed narration with local fallbacks
#[derive(Debug)]
pub struct Narrator<O> {
    oracle: O,
    config: NarratorConfig,
}

impl<O: Oracle> Narrator<O> {
    pub fn new(oracle: O, config: NarratorConfig) -> Self {
        Self { oracle, config }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    /// Applies the oracle's overnight mood shift.
    ///
    /// Returns the shift requested, or `None` when mood was left unchanged.
    pub fn adjust_mood(&self, character: &mut CharacterState) -> Option<i64> {
        let prompt = prompts::mood_prompt(character);
        let shift = self
            .oracle
            .complete(&prompt, self.config.temperatures.mood)
            .and_then(|reply| parse::parse_mood_shift(&reply));

        match shift {
            Ok(shift) => {
                character.adjust_mood(shift as f64);
                tracing::debug!("Mood shift {:+} -> {:.1}", shift, character.mood());
                Some(shift)
            }
            Err(e) => {
                tracing::warn!("Mood left unchanged: {}", e);
                None
            }
        }
    }

    /// Picks today's action from `available`.
    ///
    /// An unreachable oracle yields `fallback`; a reply naming no available
    /// action yields the first available one.
    pub fn choose_action(
        &self,
        character: &CharacterState,
        available: &[&str],
        advice: Option<&str>,
        fallback: &str,
    ) -> Decision {
        let default_action = available.first().copied().unwrap_or(fallback);
        let prompt = prompts::decision_prompt(character, available, advice);

        let reply = match self
            .oracle
            .complete(&prompt, self.config.temperatures.decision)
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Decision fell back to '{}': {}", fallback, e);
                return Decision {
                    action: fallback.to_string(),
                    reasoning: None,
                    source: DecisionSource::Fallback,
                };
            }
        };

        match parse::parse_decision(&reply, available) {
            Ok(parsed) => Decision {
                action: parsed.action,
                reasoning: parsed.reasoning,
                source: DecisionSource::Oracle,
            },
            Err(e) => {
                tracing::warn!("Decision defaulted to '{}': {}", default_action, e);
                Decision {
                    action: default_action.to_string(),
                    reasoning: None,
                    source: DecisionSource::Default,
                }
            }
        }
    }

    /// Writes today's journal entry and stores it as the character's last
    /// report.
    pub fn describe_day(
        &self,
        character: &mut CharacterState,
        action: &str,
        outcome: &str,
    ) -> String {
        let prompt = prompts::narration_prompt(character, action, outcome);
        let report = match self
            .oracle
            .complete(&prompt, self.config.temperatures.narration)
        {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Empty journal entry; using template");
                fallback_report(action, outcome)
            }
            Err(e) => {
                tracing::warn!("Journal entry from template: {}", e);
                fallback_report(action, outcome)
            }
        };

        character.set_last_report(report.clone());
        report
    }

    /// Lets the character revisit its goals.
    ///
    /// Skipped (returning `Ok(None)`) when the oracle is unreachable or its
    /// reply has no usable JSON. Storage failures are returned.
    pub fn reflect(
        &self,
        character: &mut CharacterState,
    ) -> Result<Option<ParsedReflection>, MemoryError> {
        let prompt = prompts::reflection_prompt(character);
        let parsed = match self
            .oracle
            .complete(&prompt, self.config.temperatures.reflection)
            .and_then(|reply| parse::parse_reflection(&reply))
        {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Reflection skipped: {}", e);
                return Ok(None);
            }
        };

        character
            .memory_mut()
            .reflect(parsed.goals.clone(), parsed.reflection.as_deref())?;
        tracing::info!(
            "{} reflected; goals now {:?}",
            character.name(),
            character.memory().goals()
        );
        Ok(Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedOracle;
    use tavern_core::memory::{CharacterMemory, MemoryLimits};
    use tavern_core::CharacterProfile;
    use tempfile::{tempdir, TempDir};

    fn aldric(dir: &TempDir) -> CharacterState {
        let profile = CharacterProfile::default();
        let memory =
            CharacterMemory::load(dir.path(), &profile.name, MemoryLimits::default()).unwrap();
        CharacterState::new(&profile, memory)
    }

    const AVAILABLE: &[&str] = &["Chat with Keeper", "Get Drunk"];

    #[test]
    fn test_mood_shift_applied() {
        let dir = tempdir().unwrap();
        let mut npc = aldric(&dir);
        let narrator = Narrator::new(ScriptedOracle::with_replies(["-4"]), NarratorConfig::default());

        assert_eq!(narrator.adjust_mood(&mut npc), Some(-4));
        assert_eq!(npc.mood(), 46.0);
        assert_eq!(narrator.oracle().temperatures(), vec![0.9]);
    }

    #[test]
    fn test_mood_unchanged_on_failure() {
        let dir = tempdir().unwrap();
        let mut npc = aldric(&dir);
        let narrator = Narrator::new(
            ScriptedOracle::with_replies(["I feel fine"]),
            NarratorConfig::default(),
        );

        assert_eq!(narrator.adjust_mood(&mut npc), None);
        assert_eq!(narrator.adjust_mood(&mut npc), None);
        assert_eq!(npc.mood(), 50.0);
    }

    #[test]
    fn test_choose_action_from_reply() {
        let dir = tempdir().unwrap();
        let npc = aldric(&dir);
        let narrator = Narrator::new(
            ScriptedOracle::with_replies(["REASONING: Thirsty.\nACTION: Get Drunk"]),
            NarratorConfig::default(),
        );

        let decision = narrator.choose_action(&npc, AVAILABLE, None, "Get Drunk");
        assert_eq!(decision.action, "Get Drunk");
        assert_eq!(decision.reasoning.as_deref(), Some("Thirsty."));
        assert_eq!(decision.source, DecisionSource::Oracle);
    }

    #[test]
    fn test_choose_action_fallbacks() {
        let dir = tempdir().unwrap();
        let npc = aldric(&dir);

        let offline = Narrator::new(OfflineOracle, NarratorConfig::default());
        let decision = offline.choose_action(&npc, AVAILABLE, None, "Get Drunk");
        assert_eq!(decision.action, "Get Drunk");
        assert_eq!(decision.source, DecisionSource::Fallback);

        let rambling = Narrator::new(
            ScriptedOracle::with_replies(["I shall dance a jig."]),
            NarratorConfig::default(),
        );
        let decision = rambling.choose_action(&npc, AVAILABLE, None, "Get Drunk");
        assert_eq!(decision.action, "Chat with Keeper");
        assert_eq!(decision.reasoning, None);
        assert_eq!(decision.source, DecisionSource::Default);
    }

    #[test]
    fn test_describe_day_sets_last_report() {
        let dir = tempdir().unwrap();
        let mut npc = aldric(&dir);
        let narrator = Narrator::new(
            ScriptedOracle::with_replies(["  The ale was sour.  "]),
            NarratorConfig::default(),
        );

        let report = narrator.describe_day(&mut npc, "Get Drunk", "Lose 0.5 money");
        assert_eq!(report, "The ale was sour.");
        assert_eq!(npc.last_report(), "The ale was sour.");
        assert!(!npc.is_first_morning());
    }

    #[test]
    fn test_describe_day_template() {
        let dir = tempdir().unwrap();
        let mut npc = aldric(&dir);
        let narrator = Narrator::new(OfflineOracle, NarratorConfig::default());

        let report = narrator.describe_day(&mut npc, "Get Drunk", "Lose 0.5 money");
        assert_eq!(report, "Today I chose to Get Drunk. Lose 0.5 money.");
        assert_eq!(npc.last_report(), report);
    }

    #[test]
    fn test_reflect_updates_goals() {
        let dir = tempdir().unwrap();
        let mut npc = aldric(&dir);
        let narrator = Narrator::new(
            ScriptedOracle::with_replies([r#"{"goals": ["stay alive"], "reflection": "Dragons bite."}"#]),
            NarratorConfig::default(),
        );

        let parsed = narrator.reflect(&mut npc).unwrap().unwrap();
        assert_eq!(parsed.reflection.as_deref(), Some("Dragons bite."));
        assert_eq!(npc.memory().goals(), &["stay alive".to_string()]);
        assert!(npc.memory().memories().last().unwrap().is_reflection());
    }

    #[test]
    fn test_reflect_skipped_on_failure() {
        let dir = tempdir().unwrap();
        let mut npc = aldric(&dir);
        let narrator = Narrator::new(
            ScriptedOracle::with_replies(["no json here"]),
            NarratorConfig::default(),
        );

        assert!(narrator.reflect(&mut npc).unwrap().is_none());
        assert!(narrator.reflect(&mut npc).unwrap().is_none());
        assert!(npc.memory().memories().is_empty());
        assert_eq!(npc.memory().goals().len(), 2);
    }

    #[test]
    fn test_fallback_report_punctuation() {
        assert_eq!(
            fallback_report("Chat with Keeper", "Receive a gift from Keeper → +20 money"),
            "Today I chose to Chat with Keeper. Receive a gift from Keeper → +20 money."
        );
        assert_eq!(fallback_report("Rest", "Slept well."), "Today I chose to Rest. Slept well.");
    }
}
