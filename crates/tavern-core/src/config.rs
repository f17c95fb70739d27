//! Configuration System
//!
//! Loads run parameters from tavern.toml so characters, rules and tables can
//! be adjusted without recompiling. Every section is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::character::{CharacterProfile, STAT_MAX, VICTORY_MONEY};
use crate::memory::MemoryLimits;
use crate::outcomes::{ActionDef, OutcomeTable, SecondaryDef, TableError};
use crate::setup::WorldSetting;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "tavern.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid outcome table: {0}")]
    Table(#[from] TableError),

    #[error("fallback action '{0}' is not an unconditional action of the table")]
    InvalidFallback(String),

    #[error("invalid rule: {0}")]
    InvalidRule(String),

    #[error("invalid character: {0}")]
    InvalidCharacter(String),
}

/// Game rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Money at which the run is won
    pub victory_money: f64,
    /// Trust gained per piece of non-blank advice
    pub advice_trust_gain: f64,
    /// Reflect every N days (0 disables reflection)
    pub reflect_every: u32,
    /// Action taken when the oracle cannot be reached
    pub fallback_action: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            victory_money: VICTORY_MONEY,
            advice_trust_gain: 5.0,
            reflect_every: 3,
            fallback_action: "Get Drunk".to_string(),
        }
    }
}

impl RulesConfig {
    pub fn reflects_on(&self, day: u32) -> bool {
        self.reflect_every > 0 && day % self.reflect_every == 0
    }
}

/// Memory store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Directory holding `<name>_state.json` records
    pub directory: PathBuf,
    pub long_term_capacity: usize,
    pub short_term_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            long_term_capacity: 5,
            short_term_capacity: 5,
        }
    }
}

impl MemoryConfig {
    pub fn limits(&self) -> MemoryLimits {
        MemoryLimits {
            long_term: self.long_term_capacity,
            short_term: self.short_term_capacity,
        }
    }
}

/// Which table to play on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub setting: WorldSetting,
}

/// Simulation configuration.
///
/// `actions` and `secondary` replace the built-in table for the chosen
/// setting when `actions` is non-empty. Sections this crate does not own
/// (such as `[narrator]`) are ignored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub character: CharacterProfile,
    pub rules: RulesConfig,
    pub memory: MemoryConfig,
    pub world: WorldConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary: Vec<SecondaryDef>,
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults only when the file is missing.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "Could not find {}. Using defaults.",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Checks starting stats, rule values, and that the table builds
    pub fn validate(&self) -> Result<(), ConfigError> {
        let profile = &self.character;
        for (stat, value, max) in [
            ("health", profile.health, STAT_MAX),
            ("mood", profile.mood, STAT_MAX),
            ("money", profile.money, f64::INFINITY),
        ] {
            if !value.is_finite() || !(0.0..=max).contains(&value) {
                return Err(ConfigError::InvalidCharacter(format!(
                    "{} must be a finite value in [0, {}], got {}",
                    stat, max, value
                )));
            }
        }

        if !self.rules.victory_money.is_finite() || self.rules.victory_money <= 0.0 {
            return Err(ConfigError::InvalidRule(format!(
                "victory_money must be positive, got {}",
                self.rules.victory_money
            )));
        }
        if !self.rules.advice_trust_gain.is_finite() || self.rules.advice_trust_gain < 0.0 {
            return Err(ConfigError::InvalidRule(format!(
                "advice_trust_gain must be non-negative, got {}",
                self.rules.advice_trust_gain
            )));
        }
        if self.memory.long_term_capacity == 0 || self.memory.short_term_capacity == 0 {
            return Err(ConfigError::InvalidRule(
                "memory capacities must be at least 1".to_string(),
            ));
        }
        self.table().map(|_| ())
    }

    /// Builds the outcome table this configuration plays on.
    ///
    /// Fails if the fallback action is missing or gated, since it must be
    /// takeable on any day.
    pub fn table(&self) -> Result<OutcomeTable, ConfigError> {
        let table = if self.actions.is_empty() {
            self.world.setting.table()?
        } else {
            OutcomeTable::from_defs(self.actions.clone(), self.secondary.clone())?
        };

        match table.action(&self.rules.fallback_action) {
            Some(action) if action.requires.is_unconditional() => Ok(table),
            _ => Err(ConfigError::InvalidFallback(
                self.rules.fallback_action.clone(),
            )),
        }
    }
}
