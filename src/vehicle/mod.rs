//! The vehicle aggregate.
//!
//! A [`Vehicle`] exclusively owns its [`VehiclePart`]s and the scalar motion
//! state the movement systems read and write each turn. Everything that lives
//! outside the vehicle (terrain, creatures, other vehicles) is reached through
//! [`crate::world::World`] and referred to by id.

mod damage;
mod engine;
pub mod part;
pub mod stats;

use glam::{IVec2, IVec3};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::creature::{CreatureId, Creatures};
use crate::tileray::{coord_translate, TileRay};

pub use part::{
    FuelType, PartCatalog, PartFlag, PartInfo, PartLocation, TerrainMod, VehiclePart,
};

/// Stable handle for a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

impl From<u32> for VehicleId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl VehicleId {
    /// Raw numeric id.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

/// What is holding the vehicle up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Support {
    /// Resting on floor or wheels.
    #[default]
    Grounded,
    /// Nothing underneath; dropping a z-level per turn.
    Falling,
    /// Carried by deep water.
    Floating,
    /// Held aloft by rotors.
    Flying,
}

/// Velocity component a collision acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Travel across the map.
    Horizontal,
    /// Climbing or falling between z-levels.
    Vertical,
    /// A spinning rotor, which hits at blade speed regardless of travel.
    Rotor,
}

/// Mount that the vehicle turns around.
pub const PIVOT: IVec2 = IVec2::ZERO;

/// Motion state that must survive a save and reload unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    /// Forward velocity in vmiph.
    pub velocity: i32,
    /// Vertical velocity in vmiph; negative is down.
    pub vertical_velocity: i32,
    /// Cruise control target in vmiph.
    pub cruise_velocity: i32,
    /// Whether cruise control is engaged.
    pub cruise_on: bool,
    /// Whether the engines are running.
    pub engine_on: bool,
    /// Heading the vehicle points along.
    pub face_dir: f64,
    /// Heading the vehicle travels along.
    pub move_dir: f64,
    /// Heading the driver is steering towards.
    pub turn_dir: f64,
    /// Last steering input in degrees.
    pub last_turn: f64,
    /// Whether the vehicle is sliding.
    pub skidding: bool,
    /// Support state.
    pub support: Support,
    /// Whether the vehicle sits in swimmable water.
    pub in_water: bool,
    /// Turn budget carried over from the previous turn.
    pub of_turn_carry: f64,
    /// Pending climb or descent.
    pub requested_z_change: i32,
}

/// A vehicle on the map.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Identifier.
    pub id: VehicleId,
    /// Display name.
    pub name: String,
    /// Map position of the pivot mount.
    pub pos: IVec3,
    /// Installed parts; destroyed parts stay until [`Self::cleanup_removed_parts`].
    pub parts: Vec<VehiclePart>,
    /// Forward velocity in vmiph; negative values mean reversing.
    pub velocity: i32,
    /// Vertical velocity in vmiph; negative values mean descending.
    pub vertical_velocity: i32,
    /// Cruise control target in vmiph.
    pub cruise_velocity: i32,
    /// Whether cruise control is engaged.
    pub cruise_on: bool,
    /// Whether the engines are running.
    pub engine_on: bool,
    /// Whether the movement vector has come loose from the facing.
    pub skidding: bool,
    /// What is holding the vehicle up.
    pub support: Support,
    /// Whether at least half of the vehicle sits in swimmable water.
    pub in_water: bool,
    /// Ray along the facing.
    pub face: TileRay,
    /// Ray along the direction of travel.
    pub movement: TileRay,
    /// Heading the driver is steering towards.
    pub turn_dir: f64,
    /// Last steering input in degrees.
    pub last_turn: f64,
    /// Remaining turn budget.
    pub of_turn: f64,
    /// Turn budget carried into the next turn.
    pub of_turn_carry: f64,
    /// Pending climb (+1) or descent (-1).
    pub requested_z_change: i32,
    /// Vehicle being towed.
    pub tow: Option<VehicleId>,
    /// Whether this vehicle is being towed by another.
    pub towed: bool,
    /// Turns until a summoned vehicle disappears.
    pub summon_timer: Option<u32>,
    /// Whether the player steers it remotely.
    pub remote_controlled: bool,
    /// Fuel on board per fuel type.
    pub fuel: HashMap<FuelType, f64>,
}

impl Vehicle {
    /// Create a stationary vehicle facing east.
    #[must_use]
    pub fn new(id: VehicleId, name: impl Into<String>, pos: IVec3, parts: Vec<VehiclePart>) -> Self {
        let mut vehicle = Self {
            id,
            name: name.into(),
            pos,
            parts,
            velocity: 0,
            vertical_velocity: 0,
            cruise_velocity: 0,
            cruise_on: false,
            engine_on: false,
            skidding: false,
            support: Support::Grounded,
            in_water: false,
            face: TileRay::new(0.0),
            movement: TileRay::new(0.0),
            turn_dir: 0.0,
            last_turn: 0.0,
            of_turn: 0.0,
            of_turn_carry: 0.0,
            requested_z_change: 0,
            tow: None,
            towed: false,
            summon_timer: None,
            remote_controlled: false,
            fuel: HashMap::new(),
        };
        vehicle.refresh_mounts();
        vehicle
    }

    /// Build a vehicle from `(mount, part id)` pairs looked up in `catalog`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a part id is unknown or a tile
    /// lacks a structure part.
    ///
    /// # Examples
    /// ```
    /// use glam::{IVec2, IVec3};
    /// use trundle::vehicle::{PartCatalog, Vehicle, VehicleId};
    /// let cart = Vehicle::from_layout(
    ///     VehicleId(1),
    ///     "cart",
    ///     IVec3::ZERO,
    ///     PartCatalog::builtin(),
    ///     &[(IVec2::ZERO, "frame"), (IVec2::ZERO, "wheel")],
    /// )
    /// .unwrap();
    /// assert_eq!(cart.parts.len(), 2);
    /// ```
    pub fn from_layout(
        id: VehicleId,
        name: &str,
        pos: IVec3,
        catalog: &PartCatalog,
        layout: &[(IVec2, &str)],
    ) -> Result<Self, ConfigError> {
        let mut parts = Vec::with_capacity(layout.len());
        for &(mount, part_id) in layout {
            let info = catalog.get(part_id).ok_or_else(|| {
                ConfigError::invalid("vehicle layout", format!("{name}: unknown part {part_id}"))
            })?;
            parts.push(VehiclePart::new(info, mount));
        }
        for part in &parts {
            let framed = parts
                .iter()
                .any(|other| other.mount == part.mount && other.is_structure());
            if !framed {
                return Err(ConfigError::invalid(
                    "vehicle layout",
                    format!("{name}: {} at {} has no frame", part.name(), part.mount),
                ));
            }
        }
        Ok(Self::new(id, name, pos, parts))
    }

    /// Point the vehicle along `dir` without moving it.
    pub fn set_facing(&mut self, dir: f64) {
        self.face.init(dir);
        self.movement.init(dir);
        self.turn_dir = self.face.dir();
        self.refresh_mounts();
    }

    /// Recompute both precalculated offsets for the current facing.
    pub fn refresh_mounts(&mut self) {
        let dir = self.face.dir();
        self.precalc_mounts(0, dir, PIVOT);
        self.precalc_mounts(1, dir, PIVOT);
    }

    /// Translate every live part's mount into a grid offset for heading
    /// `dir`, storing it in slot `idx`.
    pub fn precalc_mounts(&mut self, idx: usize, dir: f64, pivot: IVec2) {
        if idx > 1 {
            return;
        }
        let mut cache: HashMap<IVec2, IVec2> = HashMap::new();
        for part in self.parts.iter_mut().filter(|p| !p.removed) {
            let mount = part.mount;
            let offset = *cache
                .entry(mount)
                .or_insert_with(|| coord_translate(dir, pivot, mount));
            part.precalc[idx] = offset.extend(0);
        }
    }

    /// Map position of part `p` under the current facing.
    #[must_use]
    pub fn global_part_pos(&self, p: usize) -> IVec3 {
        self.parts
            .get(p)
            .map_or(self.pos, |part| self.pos + part.precalc[0])
    }

    /// Distinct tiles covered by live parts, in part order.
    #[must_use]
    pub fn occupied_points(&self) -> Vec<IVec3> {
        let mut points = Vec::new();
        for part in self.parts.iter().filter(|p| !p.removed) {
            let point = self.pos + part.precalc[0];
            if !points.contains(&point) {
                points.push(point);
            }
        }
        points
    }

    /// Live parts sharing a mount with part `p`, including `p` itself.
    pub fn parts_on_mount(&self, p: usize) -> impl Iterator<Item = usize> + '_ {
        let mount = self.parts.get(p).map(|part| part.mount);
        self.parts
            .iter()
            .enumerate()
            .filter(move |(_, part)| Some(part.mount) == mount && !part.removed)
            .map(|(i, _)| i)
    }

    /// First part on the same mount as `p` carrying `flag`.
    ///
    /// With `unbroken` set, broken parts are skipped.
    #[must_use]
    pub fn part_with_feature(&self, p: usize, flag: PartFlag, unbroken: bool) -> Option<usize> {
        self.parts_on_mount(p).find(|&i| {
            let part = &self.parts[i];
            part.has_flag(flag) && (!unbroken || !part.is_broken())
        })
    }

    /// Structure part at `mount`.
    #[must_use]
    pub fn part_at(&self, mount: IVec2) -> Option<usize> {
        self.parts
            .iter()
            .position(|part| part.mount == mount && part.is_structure() && !part.removed)
    }

    /// Indices of live parts carrying `flag`.
    pub fn parts_with(&self, flag: PartFlag) -> impl Iterator<Item = usize> + '_ {
        self.parts
            .iter()
            .enumerate()
            .filter(move |(_, part)| !part.removed && part.has_flag(flag))
            .map(|(i, _)| i)
    }

    /// Parts with someone in them, paired with the occupant.
    #[must_use]
    pub fn riders(&self) -> Vec<(usize, CreatureId)> {
        self.parts
            .iter()
            .enumerate()
            .filter(|(_, part)| !part.removed)
            .filter_map(|(i, part)| part.occupant.map(|who| (i, who)))
            .collect()
    }

    /// Part occupied by `who`.
    #[must_use]
    pub fn seat_of(&self, who: CreatureId) -> Option<usize> {
        self.riders()
            .into_iter()
            .find_map(|(i, rider)| (rider == who).then_some(i))
    }

    /// Seat `who` in part `p` and mark them as riding.
    ///
    /// Returns `false` when the part cannot be boarded or is already taken.
    pub fn board(&mut self, p: usize, who: CreatureId, creatures: &mut dyn Creatures) -> bool {
        let Some(part) = self.parts.get_mut(p) else {
            return false;
        };
        if part.removed || part.occupant.is_some() || !part.has_flag(PartFlag::Boardable) {
            return false;
        }
        part.occupant = Some(who);
        creatures.set_in_vehicle(who, true);
        creatures.set_position(who, self.pos + part.precalc[0]);
        true
    }

    /// Character steering the vehicle from a working control seat.
    #[must_use]
    pub fn driver(&self, creatures: &dyn Creatures) -> Option<CreatureId> {
        self.riders().into_iter().find_map(|(i, who)| {
            let at_controls = self.part_with_feature(i, PartFlag::Controls, true).is_some();
            (at_controls && creatures.kind(who).is_character()).then_some(who)
        })
    }

    /// Whether the player is steering, in person or by remote.
    #[must_use]
    pub fn player_in_control(&self, creatures: &dyn Creatures) -> bool {
        if self.remote_controlled {
            return true;
        }
        let Some(player) = creatures.player() else {
            return false;
        };
        self.driver(creatures) == Some(player)
    }

    /// Whether the vehicle is moving horizontally.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.velocity != 0
    }

    /// Whether nothing holds the vehicle up.
    #[must_use]
    pub fn is_falling(&self) -> bool {
        self.support == Support::Falling
    }

    /// Whether deep water carries the vehicle.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        self.support == Support::Floating
    }

    /// Whether rotors hold the vehicle aloft.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.support == Support::Flying
    }

    /// Start or stop falling.
    pub fn set_falling(&mut self, falling: bool) {
        if falling {
            self.support = Support::Falling;
        } else if self.is_falling() {
            self.support = Support::Grounded;
        }
    }

    /// Take off or land.
    pub fn set_flying(&mut self, flying: bool) {
        if flying {
            self.support = Support::Flying;
        } else if self.is_flying() {
            self.support = Support::Grounded;
        }
    }

    /// Velocity along `axis`, in vmiph.
    #[must_use]
    pub const fn axis_velocity(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.velocity,
            Axis::Vertical => self.vertical_velocity,
            Axis::Rotor => crate::constants::ROTOR_TIP_VELOCITY,
        }
    }

    /// Overwrite the velocity along `axis`; rotor speed is fixed.
    pub fn set_axis_velocity(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::Horizontal => self.velocity = value,
            Axis::Vertical => self.vertical_velocity = value,
            Axis::Rotor => {}
        }
    }

    /// Snapshot of the persistent motion state.
    #[must_use]
    pub fn motion_state(&self) -> MotionState {
        MotionState {
            velocity: self.velocity,
            vertical_velocity: self.vertical_velocity,
            cruise_velocity: self.cruise_velocity,
            cruise_on: self.cruise_on,
            engine_on: self.engine_on,
            face_dir: self.face.dir(),
            move_dir: self.movement.dir(),
            turn_dir: self.turn_dir,
            last_turn: self.last_turn,
            skidding: self.skidding,
            support: self.support,
            in_water: self.in_water,
            of_turn_carry: self.of_turn_carry,
            requested_z_change: self.requested_z_change,
        }
    }

    /// Restore motion state saved by [`Self::motion_state`].
    pub fn restore_motion(&mut self, state: &MotionState) {
        self.velocity = state.velocity;
        self.vertical_velocity = state.vertical_velocity;
        self.cruise_velocity = state.cruise_velocity;
        self.cruise_on = state.cruise_on;
        self.engine_on = state.engine_on;
        self.face.init(state.face_dir);
        self.movement.init(state.move_dir);
        self.turn_dir = state.turn_dir;
        self.last_turn = state.last_turn;
        self.skidding = state.skidding;
        self.support = state.support;
        self.in_water = state.in_water;
        self.of_turn_carry = state.of_turn_carry;
        self.requested_z_change = state.requested_z_change;
        self.refresh_mounts();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Vehicle {
        Vehicle::from_layout(
            VehicleId(1),
            "cart",
            IVec3::new(10, 10, 0),
            PartCatalog::builtin(),
            &[
                (IVec2::new(0, 0), "frame"),
                (IVec2::new(0, 0), "seat"),
                (IVec2::new(1, 0), "frame"),
                (IVec2::new(1, 0), "wheel"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn facing_south_rotates_mounts() {
        let mut veh = cart();
        veh.set_facing(90.0);
        assert_eq!(veh.global_part_pos(2), IVec3::new(10, 11, 0));
        assert_eq!(veh.occupied_points().len(), 2);
    }

    #[test]
    fn features_are_found_on_the_same_mount() {
        let veh = cart();
        assert_eq!(veh.part_with_feature(2, PartFlag::Wheel, true), Some(3));
        assert_eq!(veh.part_with_feature(0, PartFlag::Wheel, true), None);
        assert_eq!(veh.part_at(IVec2::ZERO), Some(0));
    }

    #[test]
    fn unframed_parts_are_rejected() {
        let result = Vehicle::from_layout(
            VehicleId(2),
            "floating wheel",
            IVec3::ZERO,
            PartCatalog::builtin(),
            &[(IVec2::ZERO, "wheel")],
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn motion_state_survives_json() {
        let mut veh = cart();
        veh.set_facing(45.0);
        veh.velocity = 1234;
        veh.skidding = true;
        veh.movement.init(90.0);
        veh.support = Support::Floating;
        let state = veh.motion_state();
        let text = serde_json::to_string(&state).unwrap();
        let back: MotionState = serde_json::from_str(&text).unwrap();
        let mut copy = cart();
        copy.restore_motion(&back);
        assert_eq!(copy.motion_state(), state);
    }
}
