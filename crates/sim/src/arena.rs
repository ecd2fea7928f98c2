use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tankduel_shared::*;

use crate::geometry::{compass_bearing, heading_vector, normalize};
use crate::host::{Host, HostError};
use crate::policy::Policy;

pub const AGENT: usize = 0;
pub const OPPONENT: usize = 1;

/// Reference host: a deterministic tick simulation of one agent tank against
/// one scripted opponent.
///
/// Agent commands are split into per-tick slices. Every tick the opponent
/// acts, bullets fly, guns cool and the agent's radar sweeps; events raised
/// along the way are buffered until the command completes.
pub struct Arena<'a> {
    pub battlefield: Battlefield,
    pub max_ticks: u32,
    pub tanks: [TankState; 2],
    pub bullets: Vec<Bullet>,
    pub tick: u32,
    pub stats: RoundStats,
    opponent: &'a mut dyn Policy,
    events: Vec<Event>,
    frames: Vec<ReplayFrame>,
}

/// What is left of the agent's current command.
#[derive(Debug, Clone, Copy)]
enum Motion {
    Chassis(f64),
    Gun(f64),
    Radar(f64),
    Drive(f64),
    Fire(FirePower),
    Idle,
}

impl From<Command> for Motion {
    fn from(command: Command) -> Self {
        match command {
            Command::TurnChassis(deg) => Motion::Chassis(deg),
            Command::TurnGun(deg) => Motion::Gun(deg),
            Command::TurnRadar(deg) => Motion::Radar(deg),
            Command::Ahead(d) => Motion::Drive(d),
            Command::Back(d) => Motion::Drive(-d),
            Command::Fire(power) => Motion::Fire(power),
            Command::Idle => Motion::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drive {
    Clear,
    Blocked,
}

impl<'a> Arena<'a> {
    pub fn new(config: &RoundConfig, opponent: &'a mut dyn Policy) -> Self {
        let bf = config.battlefield;
        let (agent, enemy) = if config.randomize_spawns {
            random_spawns(config.seed, bf)
        } else {
            (
                TankState::spawn(DVec2::new(AGENT_SPAWN_X, AGENT_SPAWN_Y), 0.0),
                TankState::spawn(
                    DVec2::new(bf.width - AGENT_SPAWN_X, bf.height - AGENT_SPAWN_Y),
                    180.0,
                ),
            )
        };

        let mut arena = Self {
            battlefield: bf,
            max_ticks: config.max_ticks,
            tanks: [agent, enemy],
            bullets: Vec::new(),
            tick: 0,
            stats: RoundStats::default(),
            opponent,
            events: Vec::new(),
            frames: Vec::new(),
        };
        arena.sync_stats();
        arena.frames.push(arena.snapshot());
        arena
    }

    pub fn is_terminal(&self) -> bool {
        self.tick >= self.max_ticks || !self.tanks[AGENT].alive || !self.tanks[OPPONENT].alive
    }

    pub fn outcome(&self) -> (RoundOutcome, EndReason) {
        let agent_alive = self.tanks[AGENT].alive;
        let opponent_alive = self.tanks[OPPONENT].alive;

        if !agent_alive && !opponent_alive {
            (RoundOutcome::Draw, EndReason::Elimination)
        } else if !opponent_alive {
            (RoundOutcome::AgentWin, EndReason::Elimination)
        } else if !agent_alive {
            (RoundOutcome::OpponentWin, EndReason::Elimination)
        } else {
            let mine = self.tanks[AGENT].energy;
            let theirs = self.tanks[OPPONENT].energy;
            if mine > theirs {
                (RoundOutcome::AgentWin, EndReason::Timeout)
            } else if theirs > mine {
                (RoundOutcome::OpponentWin, EndReason::Timeout)
            } else {
                (RoundOutcome::Draw, EndReason::Timeout)
            }
        }
    }

    pub fn snapshot(&self) -> ReplayFrame {
        ReplayFrame {
            tick: self.tick,
            tanks: [
                TankSnapshot::from(&self.tanks[AGENT]),
                TankSnapshot::from(&self.tanks[OPPONENT]),
            ],
            bullets: self.bullets.iter().map(BulletSnapshot::from).collect(),
        }
    }

    pub fn observe(&self, idx: usize) -> Observation {
        let me = &self.tanks[idx];
        let enemy = &self.tanks[1 - idx];
        Observation {
            tick: self.tick,
            battlefield: self.battlefield,
            position: me.position,
            heading: me.heading,
            gun_heading: me.gun_heading,
            energy: me.energy,
            gun_heat: me.gun_heat,
            enemy_position: enemy.position,
            enemy_heading: enemy.heading,
            enemy_energy: enemy.energy,
        }
    }

    /// Close out the round and package the replay.
    pub fn into_replay(mut self, config: &RoundConfig) -> Replay {
        if self.frames.last().map(|f| f.tick) != Some(self.tick) {
            self.frames.push(self.snapshot());
        }
        let (outcome, reason) = self.outcome();
        Replay {
            config: config.clone(),
            frames: self.frames,
            result: RoundResult {
                outcome,
                reason,
                final_tick: self.tick,
                stats: self.stats,
            },
        }
    }

    fn check_running(&self) -> Result<(), HostError> {
        if !self.tanks[AGENT].alive {
            Err(HostError::Destroyed)
        } else if self.is_terminal() {
            Err(HostError::RoundOver)
        } else {
            Ok(())
        }
    }

    /// Advance one tick with the agent working on `motion`. Returns true once
    /// the command is complete or cancelled.
    fn step(&mut self, motion: &mut Motion) -> bool {
        let radar_start = self.tanks[AGENT].radar_heading;
        let mut swept = 0.0;

        let done = match motion {
            Motion::Chassis(remaining) => {
                let s = remaining.clamp(-CHASSIS_TURN_RATE, CHASSIS_TURN_RATE);
                self.turn_chassis(AGENT, s);
                swept = s;
                *remaining -= s;
                *remaining == 0.0
            }
            Motion::Gun(remaining) => {
                let s = remaining.clamp(-GUN_TURN_RATE, GUN_TURN_RATE);
                self.turn_gun(AGENT, s);
                swept = s;
                *remaining -= s;
                *remaining == 0.0
            }
            Motion::Radar(remaining) => {
                let s = remaining.clamp(-RADAR_TURN_RATE, RADAR_TURN_RATE);
                let tank = &mut self.tanks[AGENT];
                tank.radar_heading = wrap_heading(tank.radar_heading + s);
                swept = s;
                *remaining -= s;
                *remaining == 0.0
            }
            Motion::Drive(remaining) => {
                let s = remaining.clamp(-MAX_SPEED, MAX_SPEED);
                match self.drive(AGENT, s) {
                    Drive::Blocked => true,
                    Drive::Clear => {
                        *remaining -= s;
                        *remaining == 0.0
                    }
                }
            }
            Motion::Fire(power) => {
                self.fire(AGENT, *power);
                true
            }
            Motion::Idle => true,
        };

        if self.tanks[OPPONENT].alive {
            let obs = self.observe(OPPONENT);
            let action = self.opponent.act(&obs);
            self.apply_action(OPPONENT, &action);
        }

        self.step_bullets();
        for tank in &mut self.tanks {
            tank.gun_heat = (tank.gun_heat - GUN_COOLING_RATE).max(0.0);
        }
        self.scan(radar_start, swept);
        self.sync_stats();

        self.tick += 1;
        if self.tick % FRAME_INTERVAL == 0 {
            self.frames.push(self.snapshot());
        }
        done
    }

    fn turn_chassis(&mut self, idx: usize, deg: f64) {
        let tank = &mut self.tanks[idx];
        tank.heading = wrap_heading(tank.heading + deg);
        tank.gun_heading = wrap_heading(tank.gun_heading + deg);
        tank.radar_heading = wrap_heading(tank.radar_heading + deg);
    }

    fn turn_gun(&mut self, idx: usize, deg: f64) {
        let tank = &mut self.tanks[idx];
        tank.gun_heading = wrap_heading(tank.gun_heading + deg);
        tank.radar_heading = wrap_heading(tank.radar_heading + deg);
    }

    /// Move a tank along its heading, stopping at walls and at the other tank.
    fn drive(&mut self, idx: usize, distance: f64) -> Drive {
        let bf = self.battlefield;
        let (position, heading) = (self.tanks[idx].position, self.tanks[idx].heading);
        let target = position + heading_vector(heading) * distance;
        let clamped = DVec2::new(
            target.x.clamp(TANK_RADIUS, bf.width - TANK_RADIUS),
            target.y.clamp(TANK_RADIUS, bf.height - TANK_RADIUS),
        );

        let other = &self.tanks[1 - idx];
        if other.alive {
            let gap = clamped.distance(other.position);
            // moving apart is always allowed so overlapping spawns can separate
            if gap < 2.0 * TANK_RADIUS && gap < position.distance(other.position) {
                let other_position = other.position;
                self.damage(AGENT, RAM_DAMAGE);
                self.damage(OPPONENT, RAM_DAMAGE);
                self.stats.robot_hits += 1;
                let agent = &self.tanks[AGENT];
                let toward = if idx == AGENT {
                    other_position
                } else {
                    position
                };
                self.events.push(Event::HitRobot(HitRobotEvent {
                    bearing: normalize(compass_bearing(agent.position, toward) - agent.heading),
                }));
                return Drive::Blocked;
            }
        }

        self.tanks[idx].position = clamped;
        if clamped != target {
            if idx == AGENT {
                self.stats.wall_hits += 1;
                let bearing = if distance >= 0.0 { 0.0 } else { -180.0 };
                self.events.push(Event::HitWall(HitWallEvent { bearing }));
            }
            return Drive::Blocked;
        }
        Drive::Clear
    }

    /// Fire if the gun is cool and the tank can afford the shot; otherwise
    /// the request is silently dropped.
    fn fire(&mut self, idx: usize, power: FirePower) {
        let tank = &mut self.tanks[idx];
        if !tank.alive || tank.gun_heat > 0.0 || tank.energy <= power.value() {
            return;
        }
        tank.energy -= power.value();
        tank.gun_heat = power.gun_heat();
        self.bullets.push(Bullet {
            position: tank.position,
            heading: tank.gun_heading,
            power,
            owner: idx,
        });
        match idx {
            AGENT => self.stats.agent_shots += 1,
            _ => self.stats.opponent_shots += 1,
        }
    }

    fn apply_action(&mut self, idx: usize, action: &Action) {
        self.turn_chassis(idx, action.turn.clamp(-CHASSIS_TURN_RATE, CHASSIS_TURN_RATE));
        self.turn_gun(idx, action.gun_turn.clamp(-GUN_TURN_RATE, GUN_TURN_RATE));
        let velocity = action.velocity.clamp(-MAX_SPEED, MAX_SPEED);
        if velocity != 0.0 {
            self.drive(idx, velocity);
        }
        if let Some(power) = action.fire {
            self.fire(idx, power);
        }
    }

    fn step_bullets(&mut self) {
        for bullet in &mut self.bullets {
            bullet.position += heading_vector(bullet.heading) * bullet.power.bullet_speed();
        }

        let bf = self.battlefield;
        let tanks = &self.tanks;
        let mut landed = Vec::new();
        self.bullets.retain(|b| {
            let target = &tanks[1 - b.owner];
            if target.alive && b.position.distance(target.position) < TANK_RADIUS {
                landed.push((b.owner, b.power));
                return false;
            }
            (0.0..=bf.width).contains(&b.position.x) && (0.0..=bf.height).contains(&b.position.y)
        });

        for (owner, power) in landed {
            self.damage(1 - owner, power.damage());
            self.tanks[owner].energy += power.energy_bonus();
            match owner {
                AGENT => self.stats.agent_hits += 1,
                _ => self.stats.opponent_hits += 1,
            }
        }
    }

    /// Detect the opponent if it lies inside the arc the radar swept this
    /// tick, widened by the target's angular half-width. A radar that did not
    /// move still sees along its line.
    fn scan(&mut self, radar_start: f64, swept: f64) {
        let me = &self.tanks[AGENT];
        let enemy = &self.tanks[OPPONENT];
        if !me.alive || !enemy.alive {
            return;
        }
        let distance = me.position.distance(enemy.position);
        if distance > RADAR_RANGE {
            return;
        }

        let bearing = compass_bearing(me.position, enemy.position);
        let half_width = if distance <= TANK_RADIUS {
            180.0
        } else {
            (TANK_RADIUS / distance).asin().to_degrees()
        };
        let offset = normalize(bearing - radar_start);
        let (lo, hi) = if swept >= 0.0 { (0.0, swept) } else { (swept, 0.0) };

        if offset >= lo - half_width && offset <= hi + half_width {
            let event = ScanEvent {
                bearing: normalize(bearing - me.heading),
                distance,
                energy: enemy.energy,
            };
            self.events.push(Event::Scanned(event));
            self.stats.scans += 1;
        }
    }

    fn damage(&mut self, idx: usize, amount: f64) {
        let tank = &mut self.tanks[idx];
        tank.energy -= amount;
        if tank.energy <= 0.0 {
            tank.energy = 0.0;
            tank.alive = false;
        }
    }

    fn sync_stats(&mut self) {
        self.stats.agent_energy = self.tanks[AGENT].energy;
        self.stats.opponent_energy = self.tanks[OPPONENT].energy;
    }
}

impl Host for Arena<'_> {
    fn execute(&mut self, command: Command) -> Result<(), HostError> {
        self.check_running()?;
        let mut motion = Motion::from(command);
        loop {
            let done = self.step(&mut motion);
            self.check_running()?;
            if done {
                return Ok(());
            }
        }
    }

    fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn status(&self) -> TankStatus {
        self.tanks[AGENT].status()
    }

    fn battlefield(&self) -> Battlefield {
        self.battlefield
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

/// Seeded spawn points at least four tank widths apart.
fn random_spawns(seed: u64, bf: Battlefield) -> (TankState, TankState) {
    let mut rng = Pcg64::seed_from_u64(seed);
    let point = |rng: &mut Pcg64| {
        DVec2::new(
            rng.gen_range(TANK_RADIUS..bf.width - TANK_RADIUS),
            rng.gen_range(TANK_RADIUS..bf.height - TANK_RADIUS),
        )
    };

    let agent = point(&mut rng);
    let mut enemy = point(&mut rng);
    for _ in 0..100 {
        if agent.distance(enemy) > 8.0 * TANK_RADIUS {
            break;
        }
        enemy = point(&mut rng);
    }
    (
        TankState::spawn(agent, rng.gen_range(0.0..360.0)),
        TankState::spawn(enemy, rng.gen_range(0.0..360.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DoNothingPolicy;

    fn config(max_ticks: u32) -> RoundConfig {
        RoundConfig {
            max_ticks,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let mut opponent = DoNothingPolicy;
        let arena = Arena::new(&config(100), &mut opponent);
        assert!(arena.tanks.iter().all(|t| t.alive));
        assert_eq!(arena.tanks[AGENT].position, DVec2::new(100.0, 100.0));
        assert_eq!(arena.tanks[OPPONENT].position, DVec2::new(700.0, 500.0));
        assert_eq!(arena.tanks[AGENT].energy, START_ENERGY);
        assert_eq!(arena.tick, 0);
        assert_eq!(arena.status().heading, 0.0);
    }

    #[test]
    fn test_chassis_turn_carries_gun_and_radar() {
        let mut opponent = DoNothingPolicy;
        let mut arena = Arena::new(&config(100), &mut opponent);

        arena.execute(Command::TurnChassis(25.0)).unwrap();

        assert_eq!(arena.tick, 3);
        let tank = &arena.tanks[AGENT];
        assert_eq!(tank.heading, 25.0);
        assert_eq!(tank.gun_heading, 25.0);
        assert_eq!(tank.radar_heading, 25.0);

        arena.execute(Command::TurnGun(-40.0)).unwrap();
        let tank = &arena.tanks[AGENT];
        assert_eq!(tank.heading, 25.0);
        assert_eq!(tank.gun_heading, 345.0);
        assert_eq!(tank.radar_heading, 345.0);
    }

    #[test]
    fn test_every_command_takes_a_tick() {
        let mut opponent = DoNothingPolicy;
        let mut arena = Arena::new(&config(100), &mut opponent);

        arena.execute(Command::TurnChassis(0.0)).unwrap();
        arena.execute(Command::Ahead(0.0)).unwrap();
        arena.execute(Command::Idle).unwrap();

        assert_eq!(arena.tick, 3);
    }

    #[test]
    fn test_drive_stops_at_wall() {
        let mut opponent = DoNothingPolicy;
        let mut arena = Arena::new(&config(100), &mut opponent);
        arena.tanks[AGENT].position = DVec2::new(40.0, 300.0);
        arena.tanks[AGENT].heading = 270.0;

        arena.execute(Command::Ahead(100.0)).unwrap();

        assert_eq!(arena.tanks[AGENT].position.x, TANK_RADIUS);
        assert!(arena.tick < 5, "move should be cancelled at the wall");
        assert_eq!(
            arena.drain_events(),
            vec![Event::HitWall(HitWallEvent { bearing: 0.0 })]
        );
        assert_eq!(arena.stats.wall_hits, 1);
    }

    #[test]
    fn test_ram_blocks_and_damages() {
        let mut opponent = DoNothingPolicy;
        let mut arena = Arena::new(&config(100), &mut opponent);
        arena.tanks[AGENT].position = DVec2::new(400.0, 300.0);
        arena.tanks[OPPONENT].position = DVec2::new(400.0, 340.0);

        arena.execute(Command::Ahead(20.0)).unwrap();

        assert_eq!(arena.tanks[AGENT].position, DVec2::new(400.0, 300.0));
        assert!((arena.tanks[AGENT].energy - (START_ENERGY - RAM_DAMAGE)).abs() < 1e-12);
        assert!((arena.tanks[OPPONENT].energy - (START_ENERGY - RAM_DAMAGE)).abs() < 1e-12);
        let events = arena.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::HitRobot(hit) if hit.bearing.abs() < 1e-9
        )));

        // backing away is fine
        arena.execute(Command::Back(20.0)).unwrap();
        assert!((arena.tanks[AGENT].position.y - 280.0).abs() < 1e-9);
    }

    #[test]
    fn test_fire_respects_gun_heat() {
        let mut opponent = DoNothingPolicy;
        let mut arena = Arena::new(&config(200), &mut opponent);

        arena.execute(Command::Fire(FirePower::Light)).unwrap();
        assert!(arena.bullets.is_empty(), "gun starts hot");

        while arena.tanks[AGENT].gun_heat > 0.0 {
            arena.execute(Command::Idle).unwrap();
        }
        arena.execute(Command::Fire(FirePower::Light)).unwrap();
        assert_eq!(arena.bullets.len(), 1);
        assert_eq!(arena.stats.agent_shots, 1);
        assert_eq!(arena.tanks[AGENT].energy, START_ENERGY - 1.0);
        assert!(arena.tanks[AGENT].gun_heat > 0.0);
    }

    #[test]
    fn test_bullet_hit_transfers_energy() {
        let mut opponent = DoNothingPolicy;
        let mut arena = Arena::new(&config(200), &mut opponent);
        arena.tanks[AGENT].position = DVec2::new(400.0, 200.0);
        arena.tanks[OPPONENT].position = DVec2::new(400.0, 300.0);
        arena.tanks[AGENT].gun_heat = 0.0;

        arena.execute(Command::Fire(FirePower::Heavy)).unwrap();
        for _ in 0..20 {
            arena.execute(Command::Idle).unwrap();
        }

        assert_eq!(arena.stats.agent_hits, 1);
        assert!(arena.bullets.is_empty());
        let opponent_energy = START_ENERGY - FirePower::Heavy.damage();
        assert!((arena.tanks[OPPONENT].energy - opponent_energy).abs() < 1e-9);
        let agent_energy = START_ENERGY - 3.0 + FirePower::Heavy.energy_bonus();
        assert!((arena.tanks[AGENT].energy - agent_energy).abs() < 1e-9);
    }

    #[test]
    fn test_radar_sweep_reports_contact() {
        let mut opponent = DoNothingPolicy;
        let mut arena = Arena::new(&config(200), &mut opponent);
        arena.tanks[AGENT].position = DVec2::new(400.0, 100.0);
        arena.tanks[AGENT].radar_heading = 90.0;
        arena.tanks[OPPONENT].position = DVec2::new(400.0, 400.0);

        arena.execute(Command::TurnRadar(-180.0)).unwrap();

        let scans: Vec<ScanEvent> = arena
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Scanned(s) => Some(s),
                _ => None,
            })
            .collect();
        assert!(!scans.is_empty());
        assert!(scans[0].bearing.abs() < 1e-9);
        assert!((scans[0].distance - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_over_after_tick_limit() {
        let mut opponent = DoNothingPolicy;
        let mut arena = Arena::new(&config(10), &mut opponent);

        let mut result = Ok(());
        for _ in 0..20 {
            result = arena.execute(Command::Idle);
            if result.is_err() {
                break;
            }
        }

        assert_eq!(result, Err(HostError::RoundOver));
        assert_eq!(arena.tick, 10);
        assert_eq!(arena.outcome(), (RoundOutcome::Draw, EndReason::Timeout));
    }

    #[test]
    fn test_random_spawns_are_seeded_and_apart() {
        let bf = Battlefield::default();
        for seed in 0..20 {
            let (a, b) = random_spawns(seed, bf);
            let (a2, _) = random_spawns(seed, bf);
            assert_eq!(a.position, a2.position);
            assert!(a.position.distance(b.position) > 2.0 * TANK_RADIUS);
            assert!((0.0..360.0).contains(&a.heading));
        }
    }
}
