use tankduel_shared::*;

use crate::opponents::tactics::*;
use crate::policy::Policy;

/// Easy opponent: drives in a fixed circle and fires light shots whenever
/// the gun, which it keeps pointed at the agent, lines up.
pub struct SpinnerPolicy;

impl Policy for SpinnerPolicy {
    fn name(&self) -> &str {
        "spinner"
    }

    fn act(&mut self, obs: &Observation) -> Action {
        let ts = extract_tactical_state(obs);

        Action {
            turn: CHASSIS_TURN_RATE / 2.0,
            velocity: MAX_SPEED / 2.0,
            gun_turn: turn_toward(ts.angle_off_gun, GUN_TURN_RATE),
            fire: fire_if_aligned(&ts, FirePower::Light),
        }
    }
}
