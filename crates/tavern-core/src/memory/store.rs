//! Memory Store
//!
//! Loads and persists a character's [`MemoryRecord`] as pretty JSON, one file
//! per character name. Every mutation is saved before it returns, and a
//! mutation whose save fails leaves the in-memory record untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::record::{MemoryEntry, MemoryLimits, MemoryRecord, REFLECTION_ACTION};

/// Errors from memory persistence
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("could not read memory record for '{name}' at {}: {source}", path.display())]
    Read {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("memory record for '{name}' at {} is corrupt: {source}", path.display())]
    Corrupt {
        name: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("memory record at {} belongs to '{stored}', not '{name}'", path.display())]
    OwnerMismatch {
        name: String,
        stored: String,
        path: PathBuf,
    },

    #[error("could not save memory record for '{name}' to {}: {source}", path.display())]
    Write {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Durable file for a character name.
///
/// Names that differ only in case or punctuation map to the same file; the
/// owner stored in the record tells them apart on load.
pub fn record_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    let sanitized = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}_state.json"))
}

/// A character's memory record bound to its durable location
#[derive(Debug, Clone)]
pub struct CharacterMemory {
    name: String,
    path: PathBuf,
    limits: MemoryLimits,
    record: MemoryRecord,
}

impl CharacterMemory {
    /// Loads the record for `name` from `dir`.
    ///
    /// A missing file yields the default record, which is not written until
    /// the first mutation. An unreadable or unparsable file is an error, as
    /// is a record owned by another character.
    pub fn load(
        dir: impl AsRef<Path>,
        name: &str,
        limits: MemoryLimits,
    ) -> Result<Self, MemoryError> {
        let path = record_path(dir, name);

        let mut record = match fs::read(&path) {
            Ok(bytes) => {
                let mut record: MemoryRecord =
                    serde_json::from_slice(&bytes).map_err(|source| MemoryError::Corrupt {
                        name: name.to_string(),
                        path: path.clone(),
                        source,
                    })?;
                if let Some(stored) = record.owner.take() {
                    if stored != name {
                        return Err(MemoryError::OwnerMismatch {
                            name: name.to_string(),
                            stored,
                            path,
                        });
                    }
                }
                if record.enforce_limits(limits) {
                    tracing::debug!("Trimmed oversized memory record for {}", name);
                }
                tracing::debug!(
                    "Loaded memory for {} ({} memories, {} goals)",
                    name,
                    record.long_term.len(),
                    record.goals.len()
                );
                record
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No memory record for {}; starting fresh", name);
                MemoryRecord::default()
            }
            Err(source) => {
                return Err(MemoryError::Read {
                    name: name.to_string(),
                    path,
                    source,
                })
            }
        };
        record.owner = Some(name.to_string());

        Ok(Self {
            name: name.to_string(),
            path,
            limits,
            record,
        })
    }

    /// Wraps an existing record without touching disk
    pub fn with_record(
        dir: impl AsRef<Path>,
        name: &str,
        limits: MemoryLimits,
        mut record: MemoryRecord,
    ) -> Self {
        record.owner = Some(name.to_string());
        Self {
            name: name.to_string(),
            path: record_path(dir, name),
            limits,
            record,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn limits(&self) -> MemoryLimits {
        self.limits
    }

    pub fn record(&self) -> &MemoryRecord {
        &self.record
    }

    pub fn goals(&self) -> &[String] {
        &self.record.goals
    }

    pub fn memories(&self) -> &[MemoryEntry] {
        &self.record.long_term
    }

    /// Short-term events, oldest first
    pub fn recent_events(&self) -> &[String] {
        &self.record.short_term.recent_events
    }

    /// Newest long-term entries as bullet lines, or "No memories yet."
    pub fn summarize(&self) -> String {
        self.record.summarize(self.limits.long_term)
    }

    /// Records what an action led to
    pub fn remember(
        &mut self,
        action: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Result<(), MemoryError> {
        let entry = MemoryEntry::new(action, outcome);
        self.commit(|record, limits| record.push_memory(entry, limits.long_term))
    }

    /// Adds a raw event to the short-term window
    pub fn add_event(&mut self, event: impl Into<String>) -> Result<(), MemoryError> {
        let event = event.into();
        self.commit(|record, limits| record.push_event(event, limits.short_term))
    }

    /// Records a resolved action in both logs with a single save
    pub fn record_resolution(&mut self, action: &str, outcome: &str) -> Result<(), MemoryError> {
        self.commit(|record, limits| {
            record.push_memory(MemoryEntry::new(action, outcome), limits.long_term);
            record.push_event(outcome.to_string(), limits.short_term);
        })
    }

    /// Applies a reflection.
    ///
    /// Goals are replaced only by a non-empty list of non-blank goals; the
    /// reflection text is always logged.
    pub fn reflect(
        &mut self,
        new_goals: Option<Vec<String>>,
        reflection: Option<&str>,
    ) -> Result<(), MemoryError> {
        let goals = match new_goals {
            Some(goals) if is_well_formed(&goals) => Some(goals),
            Some(goals) => {
                tracing::warn!("Ignoring malformed goal list for {}: {:?}", self.name, goals);
                None
            }
            None => None,
        };
        let entry = MemoryEntry::new(REFLECTION_ACTION, reflection.unwrap_or_default());

        self.commit(|record, limits| {
            if let Some(goals) = goals {
                record.goals = goals;
            }
            record.push_memory(entry, limits.long_term);
        })
    }

    /// Writes the record atomically: temp file first, then rename.
    pub fn save(&self) -> Result<(), MemoryError> {
        self.write(&self.record)
    }

    /// Applies `change` to a copy, saves it, and keeps it only if the save
    /// succeeded.
    fn commit(
        &mut self,
        change: impl FnOnce(&mut MemoryRecord, MemoryLimits),
    ) -> Result<(), MemoryError> {
        let mut next = self.record.clone();
        change(&mut next, self.limits);
        self.write(&next)?;
        self.record = next;
        Ok(())
    }

    fn write(&self, record: &MemoryRecord) -> Result<(), MemoryError> {
        let write_err = |source: io::Error| MemoryError::Write {
            name: self.name.clone(),
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;

        tracing::trace!("Saved memory for {} to {}", self.name, self.path.display());
        Ok(())
    }
}

fn is_well_formed(goals: &[String]) -> bool {
    !goals.is_empty() && goals.iter().all(|g| !g.trim().is_empty())
}
