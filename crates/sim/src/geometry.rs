use glam::DVec2;
use tankduel_shared::{Battlefield, Command, HOME_OFFSET_X, HOME_OFFSET_Y};

use crate::agent::CombatAgent;
use crate::host::{Host, HostError};

/// Map an angle in degrees onto [-180, 180).
pub fn normalize(angle: f64) -> f64 {
    if (-180.0..180.0).contains(&angle) {
        return angle;
    }
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid may round up to the modulus itself
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Compass bearing from `from` to `to`: 0 = north (+y), 90 = east (+x).
pub fn compass_bearing(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.x.atan2(d.y).to_degrees()
}

/// Unit vector for a compass heading.
pub fn heading_vector(heading: f64) -> DVec2 {
    let rad = heading.to_radians();
    DVec2::new(rad.sin(), rad.cos())
}

/// Where the agent parks itself at the start of a round and after wall hits.
pub fn home_position(battlefield: Battlefield) -> DVec2 {
    DVec2::new(
        battlefield.width / 2.0 - HOME_OFFSET_X,
        battlefield.height / 2.0 - HOME_OFFSET_Y,
    )
}

impl CombatAgent {
    /// Turn the chassis to an absolute compass heading by the shortest way.
    pub fn look_at<H: Host + ?Sized>(&mut self, host: &mut H, heading: f64) -> Result<(), HostError> {
        let turn = normalize(heading - host.status().heading);
        self.maneuver(host, Command::TurnChassis(turn))
    }

    /// Face the target point, then drive straight to it. Obstacles are not
    /// considered; a wall hit on the way is handled by the wall handler.
    pub fn move_to<H: Host + ?Sized>(&mut self, host: &mut H, target: DVec2) -> Result<(), HostError> {
        let here = host.status().position();
        let d = target - here;
        self.look_at(host, compass_bearing(here, target))?;
        self.maneuver(host, Command::Ahead(d.x.hypot(d.y)))
    }
}
