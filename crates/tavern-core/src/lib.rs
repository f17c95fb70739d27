//! Core simulation logic: outcome tables, character state, memory, resolution.

pub mod character;
pub mod config;
pub mod memory;
pub mod outcomes;
pub mod resolver;
pub mod setup;

pub use character::{CharacterProfile, CharacterState};
pub use config::{ConfigError, SimConfig};
pub use memory::{CharacterMemory, MemoryError};
pub use outcomes::{Effect, Outcome, OutcomeTable};
pub use resolver::{ActionResolver, Resolution, ResolveError};
pub use setup::WorldSetting;
