use tankduel_shared::*;

use crate::geometry::{compass_bearing, normalize};

/// Situation summary derived from an opponent's observation.
pub struct TacticalState {
    pub distance: f64,
    /// Absolute compass bearing from me to the enemy.
    pub bearing_to_enemy: f64,
    /// How far off my chassis heading the enemy is (signed).
    pub angle_off_nose: f64,
    /// How far off my gun the enemy is (signed).
    pub angle_off_gun: f64,
    pub gun_ready: bool,
    pub energy: f64,
}

pub fn extract_tactical_state(obs: &Observation) -> TacticalState {
    let bearing_to_enemy = compass_bearing(obs.position, obs.enemy_position);
    TacticalState {
        distance: obs.position.distance(obs.enemy_position),
        bearing_to_enemy,
        angle_off_nose: normalize(bearing_to_enemy - obs.heading),
        angle_off_gun: normalize(bearing_to_enemy - obs.gun_heading),
        gun_ready: obs.gun_heat <= 0.0,
        energy: obs.energy,
    }
}

/// Turn by `diff` degrees, limited to `rate` per tick.
pub fn turn_toward(diff: f64, rate: f64) -> f64 {
    diff.clamp(-rate, rate)
}

/// True when a bullet fired now would pass through the enemy's hull.
pub fn gun_aligned(angle_off_gun: f64, distance: f64) -> bool {
    if distance <= TANK_RADIUS {
        return true;
    }
    let tolerance = (TANK_RADIUS / distance).asin().to_degrees();
    angle_off_gun.abs() <= tolerance
}

/// Fire `power` if the gun is cool, aligned, and the shot is affordable.
pub fn fire_if_aligned(ts: &TacticalState, power: FirePower) -> Option<FirePower> {
    (ts.gun_ready && ts.energy > power.value() && gun_aligned(ts.angle_off_gun, ts.distance))
        .then_some(power)
}
