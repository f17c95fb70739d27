//! Configuration loading for the narrator.
//!
//! Narrator settings live in the `[narrator]` section of the same TOML file
//! as the simulation settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Narrator configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Sampling temperature for each kind of oracle call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperatures {
    pub decision: f64,
    pub narration: f64,
    pub mood: f64,
    pub reflection: f64,
}

impl Default for Temperatures {
    fn default() -> Self {
        Self {
            decision: 0.7,
            narration: 0.6,
            mood: 0.9,
            reflection: 0.9,
        }
    }
}

/// Oracle connection and sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Model name passed to the server
    pub model: String,
    /// Server root, without the `/api/chat` path
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    pub temperatures: Temperatures,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1".to_string(),
            base_url: "http://localhost:11434".to_string(),
            timeout_secs: 60,
            temperatures: Temperatures::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Section {
    #[serde(default)]
    narrator: NarratorConfig,
}

impl NarratorConfig {
    /// Parses the `[narrator]` section of a TOML document. Other sections
    /// are ignored; a missing section yields the defaults.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let section: Section = toml::from_str(content)?;
        Ok(section.narrator)
    }

    /// Full chat endpoint
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NarratorConfig::default();
        assert_eq!(config.model, "llama3.1");
        assert_eq!(config.temperatures.decision, 0.7);
        assert_eq!(config.temperatures.narration, 0.6);
        assert_eq!(config.chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_section_among_others() {
        let config = NarratorConfig::from_str(
            r#"
            [character]
            name = "Brenna"

            [narrator]
            model = "mistral"
            base_url = "http://gpu-box:11434/"

            [narrator.temperatures]
            decision = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.model, "mistral");
        assert_eq!(config.chat_url(), "http://gpu-box:11434/api/chat");
        assert_eq!(config.temperatures.decision, 0.2);
        assert_eq!(config.temperatures.mood, 0.9);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_missing_section() {
        let config = NarratorConfig::from_str("[rules]\nreflect_every = 2\n").unwrap();
        assert_eq!(config, NarratorConfig::default());
    }
}
