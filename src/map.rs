//! The tile map as seen by the movement systems.
//!
//! Vehicles never own terrain. Everything they need from the world grid is
//! expressed by the [`GameMap`] trait: terrain queries, bashing, fields, traps
//! and the vehicle occupancy index. [`crate::sandbox::TileMap`] provides an
//! in-memory implementation for tests and the demo binary.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::traps::TrapId;
use crate::vehicle::VehicleId;

/// Terrain or furniture flags consulted by vehicle movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerrainFlag {
    /// Rail track usable by rail wheels.
    Rail,
    /// High end of an upward ramp; entering it climbs one level.
    RampUp,
    /// Low end of a downward ramp; entering it descends one level.
    RampDown,
    /// Open air with nothing to stand on.
    NoFloor,
    /// Water deep enough to float in.
    DeepWater,
    /// Any water a creature can swim in.
    Swimmable,
    /// Small objects that only matter to wheels.
    Tiny,
    /// Low terrain that protrusions pass over.
    Short,
    /// Bashable objects that never collide with vehicles.
    NoCollide,
    /// Smooth, level ground such as pavement.
    Flat,
}

/// Map field effects a vehicle can leave behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Engine exhaust.
    Smoke,
    /// Debris left by a wheel-less vehicle scraping the ground.
    Rubble,
}

/// Occupant of a tile from the vehicle index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VehicleAt {
    /// Vehicle occupying the tile.
    pub vehicle: VehicleId,
    /// Index of the part at that tile.
    pub part: usize,
}

/// Result of bashing a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BashOutcome {
    /// Whether the obstacle was destroyed.
    pub success: bool,
}

/// Query and mutation interface onto the tile grid.
pub trait GameMap {
    /// Whether `p` lies inside the loaded region.
    fn inbounds(&self, p: IVec3) -> bool;

    /// Whether the map simulates more than one z-level.
    fn has_zlevels(&self) -> bool {
        true
    }

    /// Whether `z` is a valid level of the loaded region.
    fn inbounds_z(&self, z: i32) -> bool;

    /// Movement cost of terrain and furniture at `p`; zero means impassable.
    fn move_cost(&self, p: IVec3) -> i32;

    /// Force needed to start damaging the obstacle at `p`.
    ///
    /// With `floor` set, the floor of the tile is consulted instead of its
    /// contents.
    fn bash_resistance(&self, p: IVec3, floor: bool) -> i32;

    /// Force at which the obstacle at `p` is certain to break.
    fn bash_strength(&self, p: IVec3, floor: bool) -> i32;

    /// Whether the terrain or furniture at `p` can be bashed.
    fn is_bashable(&self, p: IVec3, floor: bool) -> bool;

    /// Whether terrain or furniture at `p` blocks movement outright.
    fn impassable(&self, p: IVec3) -> bool;

    /// Whether terrain or furniture at `p` carries `flag`.
    fn has_flag(&self, flag: TerrainFlag, p: IVec3) -> bool;

    /// Whether the tile at `p` holds up whatever stands on the level above.
    fn supports_above(&self, p: IVec3) -> bool;

    /// Display name of whatever occupies `p`.
    fn name_at(&self, p: IVec3) -> String;

    /// Vehicle part occupying `p`, if any.
    fn veh_at(&self, p: IVec3) -> Option<VehicleAt>;

    /// Hit the obstacle at `p` with `force`.
    fn bash(&mut self, p: IVec3, force: f64) -> BashOutcome;

    /// Spawn a field at `p`.
    fn add_field(&mut self, p: IVec3, kind: FieldKind, intensity: i32, duration: u32);

    /// Trap at `p`; [`TrapId::NULL`] when there is none.
    fn trap_at(&self, p: IVec3) -> TrapId;

    /// Place a trap at `p`.
    fn set_trap(&mut self, p: IVec3, trap: TrapId);

    /// Remove any trap at `p`.
    fn remove_trap(&mut self, p: IVec3);

    /// Drop `count` items of kind `item` at `p`.
    fn spawn_item(&mut self, p: IVec3, item: &str, count: u32);

    /// Detonate an explosion of `power` at `p`.
    fn explosion(&mut self, p: IVec3, power: i32, shrapnel: i32);

    /// Replace the occupancy index entries of a vehicle.
    fn set_vehicle_footprint(&mut self, vehicle: VehicleId, parts: &[(IVec3, usize)]);

    /// Drop a vehicle from the occupancy index.
    fn clear_vehicle_footprint(&mut self, vehicle: VehicleId);

    /// Mark cached visibility of `p` as stale after a vehicle changed it.
    fn invalidate_cache(&mut self, _p: IVec3) {}
}
