use glam::DVec2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Firing
// ---------------------------------------------------------------------------

/// Bullet power accepted by the host's fire primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirePower {
    Light = 1,
    Medium = 2,
    Heavy = 3,
}

impl FirePower {
    pub fn value(self) -> f64 {
        self as u8 as f64
    }

    pub fn bullet_speed(self) -> f64 {
        20.0 - 3.0 * self.value()
    }

    /// Energy removed from the tank that gets hit.
    pub fn damage(self) -> f64 {
        let p = self.value();
        4.0 * p + 2.0 * (p - 1.0).max(0.0)
    }

    /// Energy returned to the shooter on a hit.
    pub fn energy_bonus(self) -> f64 {
        3.0 * self.value()
    }

    pub fn gun_heat(self) -> f64 {
        1.0 + self.value() / 5.0
    }
}

// ---------------------------------------------------------------------------
// Agent <-> host interface
// ---------------------------------------------------------------------------

/// A single blocking actuator request. Angles are in degrees, positive turns
/// to the right (clockwise); distances are in battlefield units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    TurnChassis(f64),
    TurnGun(f64),
    TurnRadar(f64),
    Ahead(f64),
    Back(f64),
    Fire(FirePower),
    /// Let one tick pass without acting.
    Idle,
}

/// Radar contact. `bearing` is relative to the chassis heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub bearing: f64,
    pub distance: f64,
    pub energy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRobotEvent {
    pub bearing: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitWallEvent {
    pub bearing: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Scanned(ScanEvent),
    HitRobot(HitRobotEvent),
    HitWall(HitWallEvent),
}

/// Instantaneous readings of the agent's own tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankStatus {
    pub x: f64,
    pub y: f64,
    /// Compass degrees, 0 = north, clockwise.
    pub heading: f64,
    pub gun_heading: f64,
    pub energy: f64,
}

impl TankStatus {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Battlefield {
    pub width: f64,
    pub height: f64,
}

impl Default for Battlefield {
    fn default() -> Self {
        Self {
            width: crate::DEFAULT_BATTLEFIELD_WIDTH,
            height: crate::DEFAULT_BATTLEFIELD_HEIGHT,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankState {
    pub position: DVec2,
    /// Compass degrees in [0, 360).
    pub heading: f64,
    pub gun_heading: f64,
    pub radar_heading: f64,
    pub energy: f64,
    pub gun_heat: f64,
    pub alive: bool,
}

impl TankState {
    pub fn spawn(position: DVec2, heading: f64) -> Self {
        Self {
            position,
            heading,
            gun_heading: heading,
            radar_heading: heading,
            energy: crate::START_ENERGY,
            gun_heat: crate::INITIAL_GUN_HEAT,
            alive: true,
        }
    }

    pub fn status(&self) -> TankStatus {
        TankStatus {
            x: self.position.x,
            y: self.position.y,
            heading: self.heading,
            gun_heading: self.gun_heading,
            energy: self.energy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub position: DVec2,
    pub heading: f64,
    pub power: FirePower,
    pub owner: usize,
}

/// Per-tick control for scripted opponents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Chassis turn this tick, degrees (clamped by the host).
    pub turn: f64,
    /// Signed velocity this tick, units (clamped by the host).
    pub velocity: f64,
    /// Gun turn this tick, degrees (clamped by the host).
    pub gun_turn: f64,
    pub fire: Option<FirePower>,
}

impl Action {
    pub fn none() -> Self {
        Self {
            turn: 0.0,
            velocity: 0.0,
            gun_turn: 0.0,
            fire: None,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::none()
    }
}

/// Full-information view handed to scripted opponents each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub tick: u32,
    pub battlefield: Battlefield,
    pub position: DVec2,
    pub heading: f64,
    pub gun_heading: f64,
    pub energy: f64,
    pub gun_heat: f64,
    pub enemy_position: DVec2,
    pub enemy_heading: f64,
    pub enemy_energy: f64,
}

// ---------------------------------------------------------------------------
// Replays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub gun_heading: f64,
    pub radar_heading: f64,
    pub energy: f64,
    pub alive: bool,
}

impl From<&TankState> for TankSnapshot {
    fn from(s: &TankState) -> Self {
        Self {
            x: s.position.x,
            y: s.position.y,
            heading: s.heading,
            gun_heading: s.gun_heading,
            radar_heading: s.radar_heading,
            energy: s.energy,
            alive: s.alive,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BulletSnapshot {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub power: FirePower,
    pub owner: usize,
}

impl From<&Bullet> for BulletSnapshot {
    fn from(b: &Bullet) -> Self {
        Self {
            x: b.position.x,
            y: b.position.y,
            heading: b.heading,
            power: b.power,
            owner: b.owner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub tick: u32,
    pub tanks: [TankSnapshot; 2],
    pub bullets: Vec<BulletSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replay {
    pub config: RoundConfig,
    pub frames: Vec<ReplayFrame>,
    pub result: RoundResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub seed: u64,
    pub agent_name: String,
    pub opponent_name: String,
    pub battlefield: Battlefield,
    pub max_ticks: u32,
    pub randomize_spawns: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            agent_name: "agent".into(),
            opponent_name: "opponent".into(),
            battlefield: Battlefield::default(),
            max_ticks: crate::MAX_TICKS,
            randomize_spawns: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResult {
    pub outcome: RoundOutcome,
    pub reason: EndReason,
    pub final_tick: u32,
    pub stats: RoundStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    AgentWin,
    OpponentWin,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Elimination,
    Timeout,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RoundStats {
    pub agent_energy: f64,
    pub opponent_energy: f64,
    pub agent_shots: u32,
    pub opponent_shots: u32,
    pub agent_hits: u32,
    pub opponent_hits: u32,
    pub scans: u32,
    pub wall_hits: u32,
    pub robot_hits: u32,
}

impl RoundOutcome {
    /// The agent's tournament points: 3 for an elimination win, 2 for a win
    /// on energy at timeout, 1 for a draw, 0 for a loss.
    pub fn points(&self, reason: EndReason) -> u32 {
        match (self, reason) {
            (RoundOutcome::AgentWin, EndReason::Elimination) => 3,
            (RoundOutcome::AgentWin, EndReason::Timeout) => 2,
            (RoundOutcome::Draw, _) => 1,
            (RoundOutcome::OpponentWin, _) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_power_rules() {
        assert_eq!(FirePower::Light.value(), 1.0);
        assert_eq!(FirePower::Heavy.bullet_speed(), 11.0);
        assert_eq!(FirePower::Light.damage(), 4.0);
        assert_eq!(FirePower::Heavy.damage(), 16.0);
        assert_eq!(FirePower::Medium.energy_bonus(), 6.0);
        assert!((FirePower::Heavy.gun_heat() - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_round_config_partial_json() {
        let config: RoundConfig =
            serde_json::from_str(r#"{"seed": 7, "max_ticks": 500}"#).expect("config should parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_ticks, 500);
        assert_eq!(config.battlefield, Battlefield::default());
        assert!(!config.randomize_spawns);
    }

    #[test]
    fn test_points() {
        assert_eq!(RoundOutcome::AgentWin.points(EndReason::Elimination), 3);
        assert_eq!(RoundOutcome::AgentWin.points(EndReason::Timeout), 2);
        assert_eq!(RoundOutcome::Draw.points(EndReason::Timeout), 1);
        assert_eq!(RoundOutcome::OpponentWin.points(EndReason::Elimination), 0);
        assert_eq!(RoundOutcome::OpponentWin.points(EndReason::Timeout), 0);
    }
}
