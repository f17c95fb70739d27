//! Day loop
//!
//! Drives one character through a run: mood, advice, decision, resolution,
//! narration, termination checks and periodic reflection.

use rand::rngs::SmallRng;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use narrator::{Narrator, NarratorConfig, Oracle};
use tavern_core::config::{ConfigError, RulesConfig};
use tavern_core::memory::CharacterMemory;
use tavern_core::{
    ActionResolver, CharacterState, MemoryError, OutcomeTable, ResolveError, SimConfig,
};
use tavern_events::{RunOutcome, RunSummary};

use crate::advice::AdviceSource;

/// Errors that stop a run
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("narrator configuration error: {0}")]
    NarratorConfig(#[from] narrator::ConfigError),

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("could not serialize run summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not write export to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for the whole program: simulation plus narrator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub sim: SimConfig,
    pub narrator: NarratorConfig,
}

impl AppConfig {
    /// Parses both halves from one TOML document
    pub fn from_str(content: &str) -> Result<Self, SimError> {
        Ok(Self {
            sim: SimConfig::from_str(content)?,
            narrator: NarratorConfig::from_str(content)?,
        })
    }

    /// Loads `path`, using defaults only when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Could not find {}. Using defaults.", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
            .into()),
        }
    }
}

/// Per-run knobs that do not belong in the config file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub days: u32,
    /// Pause after each day
    pub delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            days: 10,
            delay: Duration::from_secs(1),
        }
    }
}

/// One character's run
pub struct Simulation<O, A> {
    narrator: Narrator<O>,
    advice: A,
    table: OutcomeTable,
    rules: RulesConfig,
    character: CharacterState,
    rng: SmallRng,
    options: RunOptions,
}

impl<O: Oracle, A: AdviceSource> Simulation<O, A> {
    /// Builds the table and loads the character's memory.
    ///
    /// A corrupt memory record fails here, before day 1.
    pub fn new(
        config: &SimConfig,
        narrator: Narrator<O>,
        advice: A,
        rng: SmallRng,
        options: RunOptions,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let table = config.table()?;
        let memory = CharacterMemory::load(
            &config.memory.directory,
            &config.character.name,
            config.memory.limits(),
        )?;
        let character = CharacterState::new(&config.character, memory);

        tracing::info!(
            "{} enters the {:?} setting with {} actions",
            character.name(),
            config.world.setting,
            table.actions().len()
        );

        Ok(Self {
            narrator,
            advice,
            table,
            rules: config.rules.clone(),
            character,
            rng,
            options,
        })
    }

    pub fn character(&self) -> &CharacterState {
        &self.character
    }

    pub fn narrator(&self) -> &Narrator<O> {
        &self.narrator
    }

    pub fn table(&self) -> &OutcomeTable {
        &self.table
    }

    /// Plays up to `options.days` days and returns the run summary
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        println!("=== Beginning Simulation with {} ===", self.character.name());

        let mut outcome = RunOutcome::Survived;
        for day in 1..=self.options.days {
            if let Some(ended) = self.play_day(day)? {
                outcome = ended;
                break;
            }
            if !self.options.delay.is_zero() && day < self.options.days {
                std::thread::sleep(self.options.delay);
            }
        }

        println!("\n=== End of Simulation ===");
        let log = self.character.decision_log();
        tracing::info!(
            "{} finished after {} days ({} with advice): {:?}",
            self.character.name(),
            log.len(),
            log.iter().filter(|d| d.had_advice()).count(),
            outcome
        );

        Ok(RunSummary::new(
            outcome,
            self.character.snapshot(),
            self.character.decision_log().to_vec(),
        ))
    }

    /// Plays one day. Returns the run outcome if the day ended the run.
    pub fn play_day(&mut self, day: u32) -> Result<Option<RunOutcome>, SimError> {
        let character = &mut self.character;

        println!("\n--- DAY {} ---", day);
        println!(
            "Current State: Health={:.1}, Money={:.1}, Mood={:.1}",
            character.health(),
            character.money(),
            character.mood()
        );

        self.narrator.adjust_mood(character);
        if !character.alive() {
            println!("{} has died. Simulation ends.", character.name());
            return Ok(Some(RunOutcome::Death));
        }

        // Day 1 is never asked
        let advice = if day == 1 {
            Some(String::new())
        } else {
            self.advice.advice(day)
        };
        if advice.as_deref().is_some_and(|a| !a.trim().is_empty()) {
            let trust = character.receive_advice(self.rules.advice_trust_gain);
            tracing::debug!("Advice received; trust now {:.1}", trust);
        }

        let available = character.available_actions(&self.table);
        let decision = self.narrator.choose_action(
            character,
            &available,
            advice.as_deref(),
            &self.rules.fallback_action,
        );
        if let Some(reasoning) = &decision.reasoning {
            println!("{}'s reasoning: {}", character.name(), reasoning);
        }
        println!("Chosen action: {}", decision.action);

        let resolution = ActionResolver::new(&self.table).resolve(
            character,
            &decision.action,
            &mut self.rng,
        )?;
        println!("Outcome: {}", resolution.text);

        let report = self
            .narrator
            .describe_day(character, &decision.action, &resolution.text);
        println!("Report:\n{}", report);

        character.log_day(
            decision.action,
            resolution.text,
            advice,
            decision.reasoning,
        );

        if character.won_with(self.rules.victory_money) {
            println!("{} has achieved wealth and wins the game!", character.name());
            return Ok(Some(RunOutcome::Victory));
        }
        if !character.alive() {
            println!("{} has died. Final State: {:?}", character.name(), character.snapshot());
            return Ok(Some(RunOutcome::Death));
        }

        if self.rules.reflects_on(day) {
            self.narrator.reflect(character)?;
        }

        Ok(None)
    }
}

/// Prints the summary and writes the export file if one was requested
pub fn publish_summary(summary: &RunSummary, export: Option<&Path>) -> Result<(), SimError> {
    println!("{}", summary.to_json_pretty()?);

    if let Some(path) = export {
        summary.write_to(path).map_err(|source| SimError::Export {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Exported run summary to {}", path.display());
    }
    Ok(())
}
