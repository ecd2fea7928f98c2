use tankduel_shared::{Action, Observation};

/// Per-tick controller for the scripted opponent tank.
pub trait Policy: Send {
    fn name(&self) -> &str;
    fn act(&mut self, obs: &Observation) -> Action;
}

/// Sits still with the gun idle. The baseline opponent for arena tests and
/// sweeps.
pub struct DoNothingPolicy;

impl Policy for DoNothingPolicy {
    fn name(&self) -> &str {
        "do_nothing"
    }

    fn act(&mut self, _obs: &Observation) -> Action {
        Action::none()
    }
}
