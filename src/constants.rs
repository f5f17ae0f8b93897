//! Physical constants and default tuning values shared across the movement
//! systems.
//!
//! The unit conversion constants define the velocity contract of the crate and
//! are not configurable. Values that only shape game feel have a matching
//! field on [`crate::config::Tuning`] and are listed here as defaults.

/// Height of a single z-level in metres.
pub const TILE_HEIGHT: f64 = 4.0;
/// Gravitational acceleration in m/s².
pub const GRAVITY: f64 = 9.8;
/// Miles per hour in one metre per second.
pub const MPS_TO_MIPH: f64 = 2.236_94;
/// Internal velocity units (vmiph) per mile per hour.
pub const MI_TO_VMI: f64 = 100.0;
/// Metres per second in one vmiph.
pub const VELOCITY_CONSTANT: f64 = 0.004_470_4;
/// Damage points per N·s of collision impulse.
pub const IMPULSE_TO_DAMAGE: f64 = 0.1;
/// N·s of collision impulse per damage point.
pub const DAMAGE_TO_IMPULSE: f64 = 10.0;

/// Constant part of the rolling resistance term, expressed in m/s.
pub const ROLLING_CONSTANT_TO_VARIABLE: f64 = 33.33;
/// Velocity at which a vehicle covers exactly one tile per turn budget.
pub const VMIPH_PER_TILE: f64 = 400.0;
/// Speeds below this many vmiph are treated as stationary by the orchestrator.
pub const MIN_MOVING_VELOCITY: i32 = 20;
/// Turn budget spent by an idle vehicle that skips its movement pass.
pub const IDLE_TURN_PENALTY: f64 = 0.321;
/// Traction below this value cannot move the vehicle at all.
pub const MIN_TRACTION: f64 = 0.001;
/// Traction below this value is reported as being stuck.
pub const STUCK_TRACTION: f64 = 0.01;
/// Tip speed of a rotor blade in vmiph, used for rotor strikes.
pub const ROTOR_TIP_VELOCITY: i32 = 45_600;
/// Acceleration below which a towing vehicle cannot pull its load.
pub const MIN_TOWING_ACCELERATION: i32 = 200;
/// Multiple of a harnessed animal's speed it can sustain while pulling.
pub const HARNESS_SPEED_MULTIPLIER: i32 = 12;
/// Highest z-level a vehicle may ascend to.
pub const MAX_Z_LEVEL: i32 = 10;
/// Lowest z-level; nothing falls below it.
pub const MIN_Z_LEVEL: i32 = -10;

/// Default multiplier of rolling drag when skidding at a right angle.
pub const DEFAULT_SKID_DRAG_MULTIPLIER: f64 = 25.0;
/// Default cap on the heading change caused by a single collision, in degrees.
pub const DEFAULT_MAX_COLLISION_TURN: f64 = 120.0;
/// Default odds (one in N) of the uncontrolled skid check firing each tick.
pub const DEFAULT_SKID_CHECK_ONE_IN: u32 = 10;
/// Default odds (one in N) of a skidding vehicle drifting 15° each tick.
pub const DEFAULT_SKID_DRIFT_ONE_IN: u32 = 4;
/// Default permitted disagreement between the two collision impulses, in N·s.
pub const DEFAULT_MOMENTUM_TOLERANCE: f64 = 5.0;
/// Default cap on momentum exchange passes against a single obstacle.
pub const DEFAULT_MAX_COLLISION_PASSES: u32 = 100;
/// Default braking deceleration in vmiph per turn.
pub const DEFAULT_MAX_BRAKE: i32 = 2000;
/// Default fraction of forward acceleration available in reverse gear.
pub const DEFAULT_REVERSE_THRUST_FACTOR: f64 = 0.6;
/// Default number of collision rounds a single displacement may take.
pub const DEFAULT_MAX_DISPLACE_ATTEMPTS: u32 = 10;
/// Default number of vehicle actions the fleet runs per turn.
pub const DEFAULT_MAX_FLEET_STEPS: u32 = 100;

/// Heading increments used by steering, in degrees.
pub const TURN_STEP: f64 = 15.0;
/// Rail geometry is aligned to multiples of this angle, in degrees.
pub const RAIL_ANGLE_STEP: i32 = 45;
