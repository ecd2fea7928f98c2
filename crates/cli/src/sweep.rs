use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::info;
use rayon::prelude::*;

use tankduel_shared::*;
use tankduel_sim::{run_round, CombatAgent};

use crate::resolve_opponent;

/// A single round to be run in parallel.
struct RoundJob {
    opponent: String,
    seed: u64,
    randomize: bool,
}

/// What one finished round contributes to the table.
struct RoundRecord {
    opponent: String,
    seed: u64,
    outcome: RoundOutcome,
    reason: EndReason,
    final_tick: u32,
    agent_energy: f64,
    points: u32,
}

/// Win/draw/loss totals against one opponent.
#[derive(Debug, Default, PartialEq)]
struct Tally {
    wins: u32,
    draws: u32,
    losses: u32,
    points: u32,
    energy_sum: f64,
}

impl Tally {
    fn add(&mut self, record: &RoundRecord) {
        match record.outcome {
            RoundOutcome::AgentWin => self.wins += 1,
            RoundOutcome::Draw => self.draws += 1,
            RoundOutcome::OpponentWin => self.losses += 1,
        }
        self.points += record.points;
        self.energy_sum += record.agent_energy;
    }

    fn rounds(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

fn run_job(job: &RoundJob) -> Result<RoundRecord> {
    let mut opponent = resolve_opponent(&job.opponent)?;
    let mut agent = CombatAgent::new(job.seed);
    let config = RoundConfig {
        seed: job.seed,
        agent_name: agent.name().to_string(),
        opponent_name: job.opponent.clone(),
        randomize_spawns: job.randomize,
        ..Default::default()
    };

    let replay = run_round(&config, &mut agent, opponent.as_mut());
    let result = replay.result;
    Ok(RoundRecord {
        opponent: job.opponent.clone(),
        seed: job.seed,
        outcome: result.outcome,
        reason: result.reason,
        final_tick: result.final_tick,
        agent_energy: result.stats.agent_energy,
        points: result.outcome.points(result.reason),
    })
}

fn tally<'a>(names: &[&'a str], records: &[RoundRecord]) -> Vec<(&'a str, Tally)> {
    names
        .iter()
        .map(|&name| {
            let mut t = Tally::default();
            for r in records.iter().filter(|r| r.opponent == name) {
                t.add(r);
            }
            (name, t)
        })
        .collect()
}

fn write_csv(path: &Path, records: &[RoundRecord]) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "opponent,seed,outcome,reason,final_tick,agent_energy,points")?;
    for r in records {
        writeln!(
            file,
            "{},{},{:?},{:?},{},{:.1},{}",
            r.opponent, r.seed, r.outcome, r.reason, r.final_tick, r.agent_energy, r.points
        )?;
    }
    println!("\nCSV written to {}", path.display());
    Ok(())
}

pub fn cmd_sweep(opponents_str: &str, seeds: u32, randomize: bool, output: Option<&Path>) -> Result<()> {
    let names: Vec<&str> = opponents_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        bail!("sweep requires at least one opponent");
    }
    // fail before spending time on any rounds
    for name in &names {
        resolve_opponent(name)?;
    }

    let jobs: Vec<RoundJob> = names
        .iter()
        .flat_map(|name| {
            (0..seeds).map(move |s| RoundJob {
                opponent: name.to_string(),
                seed: s as u64,
                randomize,
            })
        })
        .collect();

    info!(
        "sweeping {} opponents x {} seeds ({} rounds, randomize={})",
        names.len(),
        seeds,
        jobs.len(),
        randomize
    );
    let start = Instant::now();

    let records: Vec<RoundRecord> = jobs.par_iter().map(run_job).collect::<Result<_>>()?;

    println!("\n=== Sweep ({:.1}s) ===", start.elapsed().as_secs_f32());
    println!(
        "{:<12} {:>6} {:>6} {:>6} {:>8} {:>10}",
        "Opponent", "Win", "Draw", "Loss", "Points", "Energy"
    );
    println!("{:-<53}", "");
    for (name, t) in tally(&names, &records) {
        let mean_energy = if t.rounds() > 0 {
            t.energy_sum / t.rounds() as f64
        } else {
            0.0
        };
        println!(
            "{:<12} {:>6} {:>6} {:>6} {:>8} {:>10.1}",
            name, t.wins, t.draws, t.losses, t.points, mean_energy
        );
    }

    if let Some(path) = output {
        write_csv(path, &records)?;
    }
    Ok(())
}
