//! Integration tests for full runs of the day loop.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

use narrator::testing::ScriptedOracle;
use narrator::{Narrator, NarratorConfig, OfflineOracle};
use tavern_core::memory::{CharacterMemory, MemoryLimits};
use tavern_core::SimConfig;
use tavern_events::{fixtures, RunOutcome, RunSummary};
use tavern_sim::{publish_summary, NoAdvice, RunOptions, ScriptedAdvice, Simulation};

const BAR_TABLE: &str = r#"
[character]
name = "Tess"
money = 100.0

[rules]
reflect_every = 2

[[actions]]
name = "Get Drunk"
outcomes = [{ text = "Lose 0.5 money", weight = 1.0 }]

[[actions]]
name = "Work the Bar"
outcomes = [{ text = "Tips +20 money", weight = 1.0 }]
"#;

fn config_in(dir: &Path, toml: &str) -> SimConfig {
    let mut config = SimConfig::from_str(toml).unwrap();
    config.memory.directory = dir.to_path_buf();
    config
}

fn options(days: u32) -> RunOptions {
    RunOptions {
        days,
        delay: Duration::ZERO,
    }
}

/// Three scripted days of bar work reach the victory threshold.
#[test]
fn test_scripted_run_to_victory() {
    let dir = tempdir().unwrap();
    let oracle = ScriptedOracle::with_replies([
        // day 1
        "0",
        "REASONING: Coin first.\nACTION: Work the Bar",
        "Good tips tonight.",
        // day 2, then reflection
        "1",
        "ACTION: Work the Bar",
        "More tips.",
        r#"{"goals": ["buy the tavern"], "reflection": "Saving up."}"#,
        // day 3
        "-1",
        "ACTION: Work the Bar",
        "Rich at last.",
    ]);
    let narrator = Narrator::new(oracle, NarratorConfig::default());
    let advice = ScriptedAdvice::new([Some("work hard"), None]);

    let mut sim = Simulation::new(
        &config_in(dir.path(), BAR_TABLE),
        narrator,
        advice,
        SmallRng::seed_from_u64(1),
        options(10),
    )
    .unwrap();
    let summary = sim.run().unwrap();

    assert_eq!(summary.outcome, RunOutcome::Victory);
    assert_eq!(summary.days_played, 3);
    assert_eq!(summary.final_state.money, 160.0);
    assert_eq!(summary.final_state.mood, 50.0);
    assert_eq!(summary.final_state.trust, 5.0);

    let decisions = &summary.decisions;
    assert_eq!(decisions[0].human_advice.as_deref(), Some(""));
    assert_eq!(decisions[0].reasoning.as_deref(), Some("Coin first."));
    assert_eq!(decisions[1].human_advice.as_deref(), Some("work hard"));
    assert_eq!(decisions[2].human_advice, None);
    assert_eq!(decisions[2].outcome, "Tips +20 money");

    let prompts = sim.narrator().oracle().prompts();
    assert!(prompts[4].contains("\"work hard\""));
    assert!(prompts[4].contains("Yesterday's journal: Good tips tonight."));
    assert_eq!(sim.narrator().oracle().remaining(), 0);
    assert_eq!(sim.character().last_report(), "Rich at last.");

    let memory = CharacterMemory::load(dir.path(), "Tess", MemoryLimits::default()).unwrap();
    assert_eq!(memory.goals(), &["buy the tavern".to_string()]);
    assert_eq!(memory.memories().len(), 4);
    assert!(memory.memories()[2].is_reflection());
}

/// A fatal outcome ends the run on the day it happens.
#[test]
fn test_offline_run_to_death() {
    let dir = tempdir().unwrap();
    let config = config_in(
        dir.path(),
        r#"
        [[actions]]
        name = "Get Drunk"
        outcomes = [{ text = "Die of drink", weight = 1.0 }]
        "#,
    );
    let narrator = Narrator::new(OfflineOracle, NarratorConfig::default());

    let mut sim = Simulation::new(
        &config,
        narrator,
        NoAdvice,
        SmallRng::seed_from_u64(1),
        options(10),
    )
    .unwrap();
    let summary = sim.run().unwrap();

    assert_eq!(summary.outcome, RunOutcome::Death);
    assert_eq!(summary.days_played, 1);
    assert_eq!(summary.final_state.health, 0.0);
    assert_eq!(
        summary.decisions[0].state.health,
        0.0,
        "the day record holds the post-outcome state"
    );
    assert_eq!(
        sim.character().last_report(),
        "Today I chose to Get Drunk. Die of drink."
    );
}

/// Surviving every day exports a summary and leaves memory for the next run.
#[test]
fn test_survival_export_and_restart() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), BAR_TABLE);
    let export = dir.path().join("run.json");

    let mut first = Simulation::new(
        &config,
        Narrator::new(OfflineOracle, NarratorConfig::default()),
        NoAdvice,
        SmallRng::seed_from_u64(1),
        options(2),
    )
    .unwrap();
    let summary = first.run().unwrap();

    assert_eq!(summary.outcome, RunOutcome::Survived);
    assert_eq!(summary.days_played, 2);
    assert_eq!(summary.final_state.money, 25.0);
    assert!(summary.decisions.iter().all(|d| d.action == "Get Drunk"));
    assert_eq!(summary.decisions[1].human_advice, None);

    publish_summary(&summary, Some(export.as_path())).unwrap();
    let exported = RunSummary::from_json(&std::fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(exported, summary);

    // Offline reflection on day 2 was skipped
    let second = Simulation::new(
        &config,
        Narrator::new(OfflineOracle, NarratorConfig::default()),
        NoAdvice,
        SmallRng::seed_from_u64(2),
        options(1),
    )
    .unwrap();
    let memory = second.character().memory();
    assert_eq!(memory.memories().len(), 2);
    assert_eq!(
        memory.recent_events(),
        &["Lose 0.5 money".to_string(), "Lose 0.5 money".to_string()]
    );
    assert_eq!(second.character().money(), 100.0);
    assert_eq!(second.character().decision_log().len(), 0);
}

/// Seeded runs against the built-in tavern table repeat exactly.
#[test]
fn test_seeded_offline_runs_repeat() {
    let play = |seed: u64| {
        let dir = tempdir().unwrap();
        let mut config = SimConfig::default();
        config.memory.directory = dir.path().to_path_buf();
        let mut sim = Simulation::new(
            &config,
            Narrator::new(OfflineOracle, NarratorConfig::default()),
            NoAdvice,
            SmallRng::seed_from_u64(seed),
            options(5),
        )
        .unwrap();
        let summary = sim.run().unwrap();
        summary
            .decisions
            .into_iter()
            .map(|d| (d.outcome, d.state.money, d.state.health))
            .collect::<Vec<_>>()
    };

    assert_eq!(play(11), play(11));
}

/// The shared fixture describes a winning run.
#[test]
fn test_fixture_summary() {
    let summary = fixtures::sample_summary();

    assert_eq!(summary.outcome, RunOutcome::Victory);
    assert!(summary.final_state.money >= 150.0);
    assert_eq!(summary.decisions, fixtures::sample_day_records());
}
