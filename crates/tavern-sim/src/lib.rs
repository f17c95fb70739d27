//! Tavern simulation driver.
//!
//! Wires the core engine, the narrator and an advice source into a day loop.
//! The `tavern_sim` binary is a thin CLI over [`Simulation`].

pub mod advice;
pub mod simulation;

pub use advice::{AdviceSource, ConsoleAdvice, NoAdvice, ScriptedAdvice};
pub use simulation::{publish_summary, AppConfig, RunOptions, SimError, Simulation};
