use tankduel_shared::*;

use crate::opponents::tactics::*;
use crate::policy::Policy;

/// Medium opponent: never moves, keeps the gun on the agent and fires
/// medium shots at any range once aligned.
pub struct SniperPolicy;

impl Policy for SniperPolicy {
    fn name(&self) -> &str {
        "sniper"
    }

    fn act(&mut self, obs: &Observation) -> Action {
        let ts = extract_tactical_state(obs);
        Action {
            gun_turn: turn_toward(ts.angle_off_gun, GUN_TURN_RATE),
            fire: fire_if_aligned(&ts, FirePower::Medium),
            ..Action::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Arena, OPPONENT};
    use crate::policy::DoNothingPolicy;

    #[test]
    fn test_sniper_holds_position_and_fires_when_aligned() {
        let mut idle = DoNothingPolicy;
        let mut arena = Arena::new(&RoundConfig::default(), &mut idle);
        let mut obs = arena.observe(OPPONENT);

        let action = SniperPolicy.act(&obs);
        assert_eq!(action.velocity, 0.0);
        assert_eq!(action.turn, 0.0);
        assert!(action.gun_turn.abs() <= GUN_TURN_RATE);

        // opponent at (700, 500) looking straight at the agent on (100, 100)
        arena.tanks[OPPONENT].gun_heat = 0.0;
        obs = arena.observe(OPPONENT);
        obs.gun_heading = crate::geometry::compass_bearing(obs.position, obs.enemy_position);
        let action = SniperPolicy.act(&obs);
        assert_eq!(action.fire, Some(FirePower::Medium));
    }
}
