//! Action Resolution
//!
//! Turns a chosen action into a concrete outcome: draws the primary outcome,
//! draws a secondary one when the primary triggers it, applies both effects
//! to the character and records the result in memory.

use rand::Rng;
use thiserror::Error;

use crate::character::CharacterState;
use crate::memory::{MemoryError, OUTCOME_SEPARATOR};
use crate::outcomes::{Outcome, OutcomeTable, SampleError};

/// Errors from resolving an action
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("could not draw an outcome for '{action}': {source}")]
    Sample {
        action: String,
        #[source]
        source: SampleError,
    },

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// What happened when an action was taken
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub action: String,
    pub primary: Outcome,
    pub secondary: Option<Outcome>,
    /// `"primary"` or `"primary → secondary"`
    pub text: String,
}

impl Resolution {
    pub fn is_chained(&self) -> bool {
        self.secondary.is_some()
    }
}

/// Resolves actions against an outcome table
#[derive(Debug, Clone, Copy)]
pub struct ActionResolver<'t> {
    table: &'t OutcomeTable,
}

impl<'t> ActionResolver<'t> {
    pub fn new(table: &'t OutcomeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t OutcomeTable {
        self.table
    }

    /// Draws and applies the outcome of `action`.
    ///
    /// Both draws happen first. The memory entry and short-term event are then
    /// saved together, and the effects are applied only once that save
    /// succeeds, so a storage failure leaves the character unchanged.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        character: &mut CharacterState,
        action: &str,
        rng: &mut R,
    ) -> Result<Resolution, ResolveError> {
        let spec = self
            .table
            .action(action)
            .ok_or_else(|| ResolveError::UnknownAction(action.to_string()))?;
        let sample_err = |source| ResolveError::Sample {
            action: action.to_string(),
            source,
        };

        let primary = spec.lottery.draw(rng).map_err(sample_err)?.clone();
        let secondary = match self.table.secondary(&primary.text) {
            Some(lottery) => Some(lottery.draw(rng).map_err(sample_err)?.clone()),
            None => None,
        };

        let text = match &secondary {
            Some(outcome) => format!("{}{}{}", primary.text, OUTCOME_SEPARATOR, outcome.text),
            None => primary.text.clone(),
        };

        character.memory_mut().record_resolution(action, &text)?;

        character.apply_effect(&primary.effect);
        if let Some(outcome) = &secondary {
            character.apply_effect(&outcome.effect);
        }

        tracing::debug!(
            "{} chose '{}' -> '{}' (health {:.1}, money {:.1}, mood {:.1})",
            character.name(),
            action,
            text,
            character.health(),
            character.money(),
            character.mood()
        );

        Ok(Resolution {
            action: action.to_string(),
            primary,
            secondary,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterProfile;
    use crate::memory::{CharacterMemory, MemoryEntry, MemoryLimits};
    use crate::outcomes::{ActionSpec, Lottery, Requirement};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn forced(texts: &[&str], pick: usize) -> Lottery {
        Lottery::from_pairs(texts.iter().enumerate().map(|(i, text)| {
            (Outcome::tagged(*text), if i == pick { 1.0 } else { 0.0 })
        }))
        .unwrap()
    }

    fn gift_table() -> OutcomeTable {
        OutcomeTable::new(
            vec![ActionSpec::new(
                "Chat with Keeper",
                Requirement::none(),
                forced(
                    &["Keeper encourages you (+10 mood)", "Receive a gift from Keeper"],
                    1,
                ),
            )],
            vec![(
                "Receive a gift from Keeper".to_string(),
                forced(&["+20 money", "Health potion +10 health"], 0),
            )],
        )
        .unwrap()
    }

    #[test]
    fn test_chained_outcome() {
        let dir = tempdir().unwrap();
        let profile = CharacterProfile::default();
        let memory = CharacterMemory::load(dir.path(), &profile.name, MemoryLimits::default()).unwrap();
        let mut npc = CharacterState::new(&profile, memory);
        let table = gift_table();
        let mut rng = SmallRng::seed_from_u64(7);

        let resolution = ActionResolver::new(&table)
            .resolve(&mut npc, "Chat with Keeper", &mut rng)
            .unwrap();

        assert!(resolution.is_chained());
        assert_eq!(resolution.text, "Receive a gift from Keeper → +20 money");
        assert_eq!(npc.money(), 40.0);
        assert_eq!(
            npc.memory().memories(),
            &[MemoryEntry::new(
                "Chat with Keeper",
                "Receive a gift from Keeper → +20 money"
            )]
        );
        assert_eq!(
            npc.memory().recent_events(),
            &["Receive a gift from Keeper → +20 money".to_string()]
        );
    }

    #[test]
    fn test_unknown_action() {
        let dir = tempdir().unwrap();
        let profile = CharacterProfile::default();
        let memory = CharacterMemory::load(dir.path(), &profile.name, MemoryLimits::default()).unwrap();
        let mut npc = CharacterState::new(&profile, memory);
        let table = gift_table();
        let mut rng = SmallRng::seed_from_u64(7);

        let err = ActionResolver::new(&table)
            .resolve(&mut npc, "Dance", &mut rng)
            .unwrap_err();

        assert!(matches!(err, ResolveError::UnknownAction(ref name) if name == "Dance"));
        assert!(npc.memory().memories().is_empty());
        assert_eq!(npc.money(), 20.0);
    }

    #[test]
    fn test_storage_failure_propagates() {
        let dir = tempdir().unwrap();
        let profile = CharacterProfile::default();
        let memory = CharacterMemory::load(
            dir.path().join("missing"),
            &profile.name,
            MemoryLimits::default(),
        )
        .unwrap();
        let mut npc = CharacterState::new(&profile, memory);
        let table = gift_table();
        let mut rng = SmallRng::seed_from_u64(7);

        let err = ActionResolver::new(&table)
            .resolve(&mut npc, "Chat with Keeper", &mut rng)
            .unwrap_err();

        assert!(matches!(err, ResolveError::Memory(MemoryError::Write { .. })));
        assert_eq!(npc.money(), 20.0);
        assert_eq!(npc.health(), 100.0);
        assert!(npc.memory().memories().is_empty());
        assert!(npc.memory().recent_events().is_empty());
    }
}
