// Battlefield
pub const DEFAULT_BATTLEFIELD_WIDTH: f64 = 800.0;
pub const DEFAULT_BATTLEFIELD_HEIGHT: f64 = 600.0;

// Round
pub const MAX_TICKS: u32 = 6000;
pub const FRAME_INTERVAL: u32 = 4; // record every 4th tick

// Tank body (36x36 in the host, collision treated as a circle)
pub const TANK_RADIUS: f64 = 18.0;
pub const START_ENERGY: f64 = 100.0;
pub const MAX_SPEED: f64 = 8.0; // units per tick
pub const CHASSIS_TURN_RATE: f64 = 10.0; // degrees per tick
pub const GUN_TURN_RATE: f64 = 20.0;
pub const RADAR_TURN_RATE: f64 = 45.0;
pub const RADAR_RANGE: f64 = 1200.0;
pub const RAM_DAMAGE: f64 = 0.6;

// Gun
pub const GUN_COOLING_RATE: f64 = 0.1; // heat removed per tick
pub const INITIAL_GUN_HEAT: f64 = 3.0;

// Agent: default spawn used when spawns are not randomized
pub const AGENT_SPAWN_X: f64 = 100.0;
pub const AGENT_SPAWN_Y: f64 = 100.0;

// Agent: home position relative to the battlefield center
pub const HOME_OFFSET_X: f64 = 180.0;
pub const HOME_OFFSET_Y: f64 = 90.0;

// Agent: close-range pin-down
pub const PIN_DOWN_RANGE: f64 = 20.0;

// Agent: panic mode
pub const PANIC_ENERGY: f64 = 25.0;
pub const PANIC_TURN_SPAN: f64 = 90.0; // random turn in [0, span)
pub const PANIC_ADVANCE: f64 = 200.0;

// Agent: aiming
pub const LEAD_OFFSET: f64 = 30.0;
pub const HEAVY_FIRE_RANGE: f64 = 100.0;
pub const MEDIUM_FIRE_RANGE: f64 = 300.0;
pub const LIGHT_FIRE_RANGE: f64 = 600.0;

// Agent: tracking sweep
pub const TRACK_SWEEP: f64 = 360.0;
pub const TRACK_SHUFFLE: f64 = 100.0;

// Agent: per-class movement pattern (translate, chassis turn, gun turn)
pub const APPROACH_ADVANCE: f64 = 150.0;
pub const APPROACH_TURN: f64 = 40.0;
pub const APPROACH_GUN_TURN: f64 = 50.0;
pub const RETREAT_REVERSE: f64 = 150.0;
pub const RETREAT_TURN: f64 = 40.0;
pub const RETREAT_GUN_TURN: f64 = 50.0;
pub const STATIONARY_ADVANCE: f64 = 200.0;
pub const STATIONARY_TURN: f64 = 45.0;
pub const STATIONARY_GUN_TURN: f64 = 360.0;

// Agent: reclassify when energy is an exact multiple of this
pub const RECLASSIFY_ENERGY_MODULUS: f64 = 25.0;

// Radar sweep issued when rammed while panicking
pub const PANIC_RADAR_SWEEP: f64 = 360.0;
