use tankduel_shared::{Command, TRACK_SHUFFLE, TRACK_SWEEP};

use super::CombatAgent;
use crate::host::{Host, HostError};

impl CombatAgent {
    /// Sweep, shuffle back and forth, sweep again: two looks at the enemy from
    /// slightly different spots so the classifier has a pair of bearings.
    pub fn track<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), HostError> {
        self.maneuver(host, Command::TurnGun(TRACK_SWEEP))?;
        self.maneuver(host, Command::Back(TRACK_SHUFFLE))?;
        self.maneuver(host, Command::Ahead(TRACK_SHUFFLE))?;
        self.maneuver(host, Command::TurnGun(TRACK_SWEEP))
    }
}
