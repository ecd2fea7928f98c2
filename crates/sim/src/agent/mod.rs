//! The combat agent: a movement-and-aiming state machine keyed on the
//! inferred enemy motion class, a latched low-energy panic mode, and a
//! close-range pin-down mode.

pub mod aiming;
pub mod classifier;
mod tracking;

use std::collections::VecDeque;

use glam::DVec2;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tankduel_shared::*;

use crate::geometry::home_position;
use crate::host::{Host, HostError};

pub use classifier::{BearingHistory, MotionClass};

/// Everything the agent knows during a round.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    /// Range of the latest radar contact.
    pub distance: f64,
    /// Set once the agent has first parked at home.
    pub initial_placed: bool,
    pub motion_class: MotionClass,
    pub bearings: BearingHistory,
    /// Latched for the rest of the round once set.
    pub panic: bool,
    /// While set, the agent holds position and fires at full power.
    pub pin_down: bool,
    /// Resolved from the battlefield size on the first `run`.
    pub home: Option<DVec2>,
}

pub struct CombatAgent {
    state: AgentState,
    rng: Pcg64,
    pending: VecDeque<Event>,
    dispatching: bool,
}

impl CombatAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            state: AgentState::default(),
            rng: Pcg64::seed_from_u64(seed),
            pending: VecDeque::new(),
            dispatching: false,
        }
    }

    pub fn name(&self) -> &str {
        "pinner"
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Round entry point. Parks at home, takes two sightings, then loops on
    /// the policy until the host ends the round.
    pub fn run<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), HostError> {
        let home = self.home(host);
        if !self.state.pin_down {
            self.move_to(host, home)?;
            self.look_at(host, 0.0)?;
            self.state.initial_placed = true;
            self.track(host)?;
            if !self.state.pin_down {
                self.classify();
            }
        }

        loop {
            self.step(host)?;
        }
    }

    /// One pass of the policy loop. Always issues at least one command.
    pub fn step<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), HostError> {
        if self.state.pin_down {
            // the pinning volley owns the actuators
            return self.perform(host, Command::Fire(FirePower::Heavy));
        }

        if self.state.panic {
            let turn = self.rng.gen::<f64>() * PANIC_TURN_SPAN;
            self.maneuver(host, Command::TurnChassis(turn))?;
            self.maneuver(host, Command::Ahead(PANIC_ADVANCE))?;
        } else {
            match self.state.motion_class {
                MotionClass::Approaching => {
                    self.maneuver(host, Command::Ahead(APPROACH_ADVANCE))?;
                    self.maneuver(host, Command::TurnChassis(APPROACH_TURN))?;
                    self.maneuver(host, Command::TurnGun(-APPROACH_GUN_TURN))?;
                }
                MotionClass::Retreating => {
                    self.maneuver(host, Command::Back(RETREAT_REVERSE))?;
                    self.maneuver(host, Command::TurnChassis(-RETREAT_TURN))?;
                    self.maneuver(host, Command::TurnGun(RETREAT_GUN_TURN))?;
                }
                MotionClass::Stationary => {
                    self.maneuver(host, Command::Ahead(STATIONARY_ADVANCE))?;
                    self.maneuver(host, Command::TurnChassis(STATIONARY_TURN))?;
                    self.maneuver(host, Command::TurnGun(-STATIONARY_GUN_TURN))?;
                }
            }
        }

        // Exact comparison on the real-valued energy; holds only at exact
        // multiples such as the starting 100.
        let energy = host.status().energy;
        if !self.state.pin_down
            && self.state.initial_placed
            && energy % RECLASSIFY_ENERGY_MODULUS == 0.0
        {
            self.track(host)?;
            self.classify();
        }
        Ok(())
    }

    /// Queue a sensor event and deliver it unless a handler is already
    /// running, in which case it waits for the next main-loop command.
    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: Event) -> Result<(), HostError> {
        self.enqueue(event);
        if self.dispatching {
            return Ok(());
        }
        self.dispatch(host)
    }

    /// Run one actuator command and deliver whatever it raised.
    pub(crate) fn perform<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        command: Command,
    ) -> Result<(), HostError> {
        trace!("{command:?}");
        host.execute(command)?;
        for event in host.drain_events() {
            self.enqueue(event);
        }
        if self.dispatching {
            return Ok(());
        }
        self.dispatch(host)
    }

    /// Like `perform`, but a no-op once pin-down has latched. Multi-command
    /// maneuvers go through here so a close contact raised by an earlier
    /// command stops the rest of the sequence.
    pub(crate) fn maneuver<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        command: Command,
    ) -> Result<(), HostError> {
        if self.state.pin_down {
            trace!("pinned, dropping {command:?}");
            return Ok(());
        }
        self.perform(host, command)
    }

    fn enqueue(&mut self, event: Event) {
        // Only the freshest radar contact is worth acting on.
        if matches!(event, Event::Scanned(_)) {
            self.pending.retain(|e| !matches!(e, Event::Scanned(_)));
        }
        self.pending.push_back(event);
    }

    /// Deliver the events pending right now. Anything raised by the handlers
    /// themselves is held for the next main-loop command.
    fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), HostError> {
        let batch: Vec<Event> = self.pending.drain(..).collect();
        self.dispatching = true;
        let result = batch
            .into_iter()
            .try_for_each(|event| self.on_event(host, event));
        self.dispatching = false;
        result
    }

    fn on_event<H: Host + ?Sized>(&mut self, host: &mut H, event: Event) -> Result<(), HostError> {
        match event {
            Event::Scanned(scan) => self.on_scanned(host, scan),
            Event::HitRobot(_) => self.on_hit_robot(host),
            Event::HitWall(_) => self.on_hit_wall(host),
        }
    }

    fn on_scanned<H: Host + ?Sized>(&mut self, host: &mut H, scan: ScanEvent) -> Result<(), HostError> {
        self.state.distance = scan.distance;

        if scan.distance < PIN_DOWN_RANGE {
            return self.pin_down(host);
        }
        if self.state.pin_down {
            debug!("target broke away at {:.1}, releasing pin-down", scan.distance);
            self.state.pin_down = false;
        }
        if self.state.panic {
            return Ok(());
        }

        let status = host.status();
        let adjust = aiming::gun_adjust(scan.bearing, status.heading, status.gun_heading);
        let turn = aiming::gun_turn(self.state.motion_class, adjust);
        self.perform(host, Command::TurnGun(turn))?;
        if let Some(power) = aiming::fire_power(self.state.distance) {
            self.perform(host, Command::Fire(power))?;
        }

        if self.state.initial_placed {
            let status = host.status();
            self.state.bearings.record(status.heading + scan.bearing);
            if status.energy < PANIC_ENERGY {
                debug!("energy {:.1} below {PANIC_ENERGY}, panicking", status.energy);
                self.state.panic = true;
            }
        }
        Ok(())
    }

    fn on_hit_robot<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), HostError> {
        if !self.state.panic {
            return Ok(());
        }
        self.state.motion_class = MotionClass::Stationary;
        self.perform(host, Command::TurnRadar(PANIC_RADAR_SWEEP))
    }

    fn on_hit_wall<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), HostError> {
        if self.state.pin_down {
            return Ok(());
        }
        let home = self.home(host);
        debug!("hit wall, returning to ({:.0}, {:.0})", home.x, home.y);
        self.move_to(host, home)
    }

    /// Latch pin-down and open fire. The main loop keeps firing until a scan
    /// reports the target out of range.
    fn pin_down<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), HostError> {
        if !self.state.pin_down {
            debug!("target at {:.1}, pinning down", self.state.distance);
            self.state.pin_down = true;
        }
        self.perform(host, Command::Fire(FirePower::Heavy))
    }

    fn classify(&mut self) {
        if let Some(class) = classifier::classify(&self.state.bearings) {
            if class != self.state.motion_class {
                debug!("enemy motion {:?} -> {:?}", self.state.motion_class, class);
            }
            self.state.motion_class = class;
        }
    }

    fn home<H: Host + ?Sized>(&mut self, host: &H) -> DVec2 {
        *self
            .state
            .home
            .get_or_insert_with(|| home_position(host.battlefield()))
    }
}
