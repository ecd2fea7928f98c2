use std::collections::VecDeque;

use tankduel_shared::{Battlefield, Command, Event, TankStatus};
use thiserror::Error;

/// Why the host stopped accepting commands. Either variant ends the agent's
/// main loop; neither requires cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("round is over")]
    RoundOver,
    #[error("tank destroyed")]
    Destroyed,
}

/// The simulator's agent API.
///
/// `execute` blocks until the host has finished the action, consuming at
/// least one tick. Sensor events raised while the action ran are buffered
/// by the host and handed out by `drain_events` once control returns.
pub trait Host {
    fn execute(&mut self, command: Command) -> Result<(), HostError>;
    fn drain_events(&mut self) -> Vec<Event>;
    fn status(&self) -> TankStatus;
    fn battlefield(&self) -> Battlefield;
}

#[derive(Debug, Clone, Copy)]
enum Cue {
    Event(Event),
    Energy(f64),
}

/// Host that applies every command instantly and exactly, records it, and
/// replays scheduled cues. Useful for testing agent logic without physics.
///
/// Turns move the chassis and gun together the way the real host does; fire
/// and radar commands only get recorded. After `budget` commands the round
/// ends.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    pub status: TankStatus,
    pub battlefield: Battlefield,
    pub commands: Vec<Command>,
    budget: usize,
    cues: Vec<(usize, Cue)>,
    ready: VecDeque<Event>,
}

impl ScriptedHost {
    pub fn new(battlefield: Battlefield, x: f64, y: f64) -> Self {
        Self {
            status: TankStatus {
                x,
                y,
                heading: 0.0,
                gun_heading: 0.0,
                energy: tankduel_shared::START_ENERGY,
            },
            battlefield,
            commands: Vec::new(),
            budget: usize::MAX,
            cues: Vec::new(),
            ready: VecDeque::new(),
        }
    }

    /// End the round once this many commands have run.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Raise `event` once the `after`-th command (1-based, counted over the
    /// whole session) has completed.
    pub fn schedule_event(&mut self, after: usize, event: Event) {
        self.cues.push((after, Cue::Event(event)));
    }

    /// Set own energy once the `after`-th command has completed.
    pub fn schedule_energy(&mut self, after: usize, energy: f64) {
        self.cues.push((after, Cue::Energy(energy)));
    }

    /// Commands issued since `start`.
    pub fn commands_since(&self, start: usize) -> &[Command] {
        &self.commands[start.min(self.commands.len())..]
    }
}

fn wrap_heading(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl Host for ScriptedHost {
    fn execute(&mut self, command: Command) -> Result<(), HostError> {
        if self.commands.len() >= self.budget {
            return Err(HostError::RoundOver);
        }
        self.commands.push(command);

        let s = &mut self.status;
        match command {
            Command::TurnChassis(deg) => {
                s.heading = wrap_heading(s.heading + deg);
                s.gun_heading = wrap_heading(s.gun_heading + deg);
            }
            Command::TurnGun(deg) => s.gun_heading = wrap_heading(s.gun_heading + deg),
            Command::Ahead(d) | Command::Back(d) => {
                let signed = if matches!(command, Command::Back(_)) { -d } else { d };
                let rad = s.heading.to_radians();
                s.x += rad.sin() * signed;
                s.y += rad.cos() * signed;
            }
            Command::TurnRadar(_) | Command::Fire(_) | Command::Idle => {}
        }

        let count = self.commands.len();
        for (_, cue) in self.cues.iter().filter(|(after, _)| *after == count) {
            match *cue {
                Cue::Event(event) => self.ready.push_back(event),
                Cue::Energy(energy) => self.status.energy = energy,
            }
        }
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<Event> {
        self.ready.drain(..).collect()
    }

    fn status(&self) -> TankStatus {
        self.status
    }

    fn battlefield(&self) -> Battlefield {
        self.battlefield
    }
}
