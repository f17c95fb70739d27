//! Memory System
//!
//! Durable per-character memory: traits, goals, a bounded long-term log and a
//! bounded short-term window.

pub mod record;
pub mod store;

pub use record::{
    MemoryEntry, MemoryLimits, MemoryRecord, ShortTermWindow, NO_MEMORIES, OUTCOME_SEPARATOR,
    REFLECTION_ACTION,
};
pub use store::{record_path, CharacterMemory, MemoryError};
