use log::debug;
use tankduel_shared::*;

use crate::agent::CombatAgent;
use crate::arena::Arena;
use crate::policy::Policy;

/// Run a deterministic round of the agent against a scripted opponent.
pub fn run_round(config: &RoundConfig, agent: &mut CombatAgent, opponent: &mut dyn Policy) -> Replay {
    let mut arena = Arena::new(config, opponent);

    if let Err(stop) = agent.run(&mut arena) {
        debug!("{} stopped at tick {}: {stop}", agent.name(), arena.tick);
    }

    arena.into_replay(config)
}
