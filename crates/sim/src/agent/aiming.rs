use tankduel_shared::{
    FirePower, HEAVY_FIRE_RANGE, LEAD_OFFSET, LIGHT_FIRE_RANGE, MEDIUM_FIRE_RANGE,
};

use super::classifier::MotionClass;
use crate::geometry::normalize;

/// Gun rotation that puts the barrel on a target seen at `bearing` from the
/// chassis.
pub fn gun_adjust(bearing: f64, heading: f64, gun_heading: f64) -> f64 {
    normalize(bearing + heading - gun_heading)
}

/// Signed gun turn (positive = right) for a motion class, with the lead
/// offset applied for moving targets.
pub fn gun_turn(class: MotionClass, adjust: f64) -> f64 {
    match class {
        MotionClass::Stationary => adjust,
        MotionClass::Retreating => -(adjust + LEAD_OFFSET),
        MotionClass::Approaching => adjust + LEAD_OFFSET,
    }
}

/// Bullet power by range; `None` past the longest band.
pub fn fire_power(distance: f64) -> Option<FirePower> {
    if distance < HEAVY_FIRE_RANGE {
        Some(FirePower::Heavy)
    } else if distance < MEDIUM_FIRE_RANGE {
        Some(FirePower::Medium)
    } else if distance < LIGHT_FIRE_RANGE {
        Some(FirePower::Light)
    } else {
        None
    }
}
