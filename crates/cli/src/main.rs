mod sweep;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use tankduel_shared::*;
use tankduel_sim::opponents::{RammerPolicy, SniperPolicy, SpinnerPolicy};
use tankduel_sim::{run_round, CombatAgent, DoNothingPolicy, Policy};

pub(crate) const OPPONENT_NAMES: &[&str] = &["do_nothing", "spinner", "sniper", "rammer"];

#[derive(Parser)]
#[command(name = "tankduel", about = "Tank duel simulator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one round of the agent against a scripted opponent
    Run {
        /// Opponent (do_nothing, spinner, sniper, rammer)
        #[arg(long)]
        opponent: String,

        /// Random seed for the round
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// JSON round configuration; flags override its seed and opponent
        #[arg(long)]
        config: Option<PathBuf>,

        /// Randomize spawn points
        #[arg(long)]
        randomize: bool,

        /// Output path for replay JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run many seeded rounds in parallel and tabulate results
    Sweep {
        /// Comma-separated list of opponent names
        #[arg(long, default_value = "do_nothing,spinner,sniper,rammer")]
        opponents: String,

        /// Number of seeds per opponent
        #[arg(long, default_value_t = 20)]
        seeds: u32,

        /// Randomize spawn points
        #[arg(long)]
        randomize: bool,

        /// Output path for a per-round CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Resolve an opponent name to a boxed policy.
pub(crate) fn resolve_opponent(name: &str) -> Result<Box<dyn Policy>> {
    Ok(match name {
        "do_nothing" => Box::new(DoNothingPolicy),
        "spinner" => Box::new(SpinnerPolicy),
        "sniper" => Box::new(SniperPolicy),
        "rammer" => Box::new(RammerPolicy),
        other => bail!(
            "unknown opponent '{other}'. Valid options: {}",
            OPPONENT_NAMES.join(", ")
        ),
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            opponent,
            seed,
            config,
            randomize,
            output,
        } => cmd_run(&opponent, seed, config.as_deref(), randomize, output.as_deref()),

        Commands::Sweep {
            opponents,
            seeds,
            randomize,
            output,
        } => sweep::cmd_sweep(&opponents, seeds, randomize, output.as_deref()),
    }
}

fn load_config(path: &Path) -> Result<RoundConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn cmd_run(
    opponent_name: &str,
    seed: u64,
    config_path: Option<&Path>,
    randomize: bool,
    output: Option<&Path>,
) -> Result<()> {
    let mut opponent = resolve_opponent(opponent_name)?;
    let mut agent = CombatAgent::new(seed);

    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => RoundConfig::default(),
    };
    config.seed = seed;
    config.agent_name = agent.name().to_string();
    config.opponent_name = opponent.name().to_string();
    config.randomize_spawns |= randomize;

    info!(
        "running round: {} vs {} (seed={})",
        config.agent_name, config.opponent_name, seed
    );

    let replay = run_round(&config, &mut agent, opponent.as_mut());
    let result = &replay.result;
    let stats = &result.stats;

    println!();
    println!("=== Round Result ===");
    println!("Outcome:    {:?}", result.outcome);
    println!("Reason:     {:?}", result.reason);
    println!("Final tick: {}", result.final_tick);
    println!("Points:     {}", result.outcome.points(result.reason));
    println!();
    println!("--- Stats ---");
    println!(
        "  {} (agent): Energy={:.1}, Hits={}, Shots={}, Scans={}, Wall hits={}",
        config.agent_name,
        stats.agent_energy,
        stats.agent_hits,
        stats.agent_shots,
        stats.scans,
        stats.wall_hits
    );
    println!(
        "  {} (opponent): Energy={:.1}, Hits={}, Shots={}",
        config.opponent_name, stats.opponent_energy, stats.opponent_hits, stats.opponent_shots
    );
    println!("  Collisions: {}", stats.robot_hits);
    println!("  Final enemy motion: {:?}", agent.state().motion_class);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&replay).context("serializing replay")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("\nReplay written to {}", path.display());
    }
    Ok(())
}
