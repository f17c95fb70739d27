//! Outcome Definitions
//!
//! Effects, weighted sampling, and the two-level outcome table.

pub mod effect;
pub mod sample;
pub mod table;

pub use effect::{Effect, EffectRule, Resource, EFFECT_RULES};
pub use sample::{sample, validate_weights, SampleError};
pub use table::{
    ActionDef, ActionSpec, Lottery, Outcome, OutcomeDef, OutcomeTable, Requirement, SecondaryDef,
    TableError,
};
