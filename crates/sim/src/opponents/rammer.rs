use tankduel_shared::*;

use crate::opponents::tactics::*;
use crate::policy::Policy;

/// Range inside which the rammer starts shooting.
const CLOSE_RANGE: f64 = 150.0;

/// Hard opponent: charges the agent at full speed and fires heavy shots
/// once close.
pub struct RammerPolicy;

impl Policy for RammerPolicy {
    fn name(&self) -> &str {
        "rammer"
    }

    fn act(&mut self, obs: &Observation) -> Action {
        let ts = extract_tactical_state(obs);

        // only accelerate once roughly pointed at the target
        let velocity = if ts.angle_off_nose.abs() < 45.0 {
            MAX_SPEED
        } else {
            0.0
        };
        let fire = if ts.distance < CLOSE_RANGE {
            fire_if_aligned(&ts, FirePower::Heavy)
        } else {
            None
        };

        Action {
            turn: turn_toward(ts.angle_off_nose, CHASSIS_TURN_RATE),
            velocity,
            // the chassis turn already carries the gun
            gun_turn: turn_toward(ts.angle_off_gun - ts.angle_off_nose, GUN_TURN_RATE),
            fire,
        }
    }
}
