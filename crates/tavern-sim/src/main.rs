//! Tavern Simulation
//!
//! One NPC, one tavern, one day at a time. A local LLM picks the actions and
//! writes the journal; the dice decide what happens.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use narrator::{Narrator, OfflineOracle, OllamaOracle, Oracle};
use tavern_core::config::DEFAULT_CONFIG_PATH;
use tavern_sim::{
    publish_summary, AdviceSource, AppConfig, ConsoleAdvice, NoAdvice, RunOptions, SimError,
    Simulation,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "tavern_sim")]
#[command(about = "A turn-based tavern life simulation narrated by a local LLM")]
struct Args {
    /// Number of days to simulate
    #[arg(long, default_value_t = 10)]
    days: u32,

    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Character name (overrides the config file)
    #[arg(long)]
    name: Option<String>,

    /// Random seed for reproducibility (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for memory records (overrides the config file)
    #[arg(long)]
    memory_dir: Option<PathBuf>,

    /// Oracle model name (overrides the config file)
    #[arg(long)]
    model: Option<String>,

    /// Never contact the oracle; every call takes its fallback
    #[arg(long)]
    offline: bool,

    /// Do not ask for advice
    #[arg(long)]
    no_advice: bool,

    /// Pause between days, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Also write the run summary to this file
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,tavern_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let mut config = AppConfig::load_or_default(&args.config)?;
    if let Some(name) = args.name {
        config.sim.character.name = name;
    }
    if let Some(dir) = args.memory_dir {
        config.sim.memory.directory = dir;
    }
    if let Some(model) = args.model {
        config.narrator.model = model;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Seed: {}", seed);

    let oracle: Box<dyn Oracle> = if args.offline {
        Box::new(OfflineOracle)
    } else {
        match OllamaOracle::new(&config.narrator) {
            Ok(oracle) => Box::new(oracle),
            Err(e) => {
                tracing::warn!("Could not build oracle client ({}); running offline", e);
                Box::new(OfflineOracle)
            }
        }
    };

    let advice: Box<dyn AdviceSource> = if args.no_advice {
        Box::new(NoAdvice)
    } else {
        Box::new(ConsoleAdvice::stdin())
    };

    let options = RunOptions {
        days: args.days,
        delay: Duration::from_millis(args.delay_ms),
    };

    let narrator = Narrator::new(oracle, config.narrator.clone());
    let mut sim = Simulation::new(
        &config.sim,
        narrator,
        advice,
        SmallRng::seed_from_u64(seed),
        options,
    )?;

    let summary = sim.run()?;
    publish_summary(&summary, args.export.as_deref())
}
