//! Moving a vehicle one step across the map.

use glam::{IVec2, IVec3};
use log::debug;

use crate::map::{FieldKind, TerrainFlag};
use crate::messages::SoundKind;
use crate::numeric::{trunc_to_i32, trunc_to_u32};
use crate::tileray::TileRay;
use crate::vehicle::{Axis, Vehicle, VehicleId, PIVOT};
use crate::world::World;

use super::collision::{Collision, CollisionKind};

/// Speed a vehicle without enough wheels loses scraping along, in vmiph.
const SCRAPE_SLOWDOWN: i32 = 2000;
/// Turns the debris from a scrape lingers.
const SCRAPE_DEBRIS_DURATION: u32 = 600;
/// Loudest crash a collision can make.
const MAX_CRASH_VOLUME: u32 = 100;

impl Vehicle {
    /// Move the vehicle by `dp` with `facing` as the heading of travel,
    /// resolving whatever lies in the way.
    ///
    /// A move that is both horizontal and vertical is made as two steps.
    /// Collisions that stop the vehicle or reverse it cancel the move, and a
    /// collision with another vehicle always does. Returns whether the
    /// vehicle moved.
    pub fn displace_vehicle(&mut self, world: &mut World<'_>, dp: IVec3, facing: &TileRay) -> bool {
        if dp.z != 0 && dp.truncate() != IVec2::ZERO {
            let moved_across = self.displace_vehicle(world, dp.truncate().extend(0), facing);
            if self.is_wrecked() {
                return moved_across;
            }
            let moved_down = self.displace_vehicle(world, IVec3::new(0, 0, dp.z), facing);
            return moved_across || moved_down;
        }
        if dp == IVec3::ZERO {
            self.check_falling_or_floating(&*world.map);
            return false;
        }

        let vertical = dp.z != 0;
        if vertical && !world.map.inbounds_z(self.pos.z + dp.z) {
            debug!("{} cannot leave the loaded z-levels", self.name);
            if dp.z < 0 {
                self.vertical_velocity = 0;
                self.set_falling(false);
            }
            return false;
        }
        let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
        let velocity_before = self.axis_velocity(axis);
        if velocity_before == 0 && !self.is_rotorcraft() {
            debug!("{} tried to move with no velocity", self.name);
            return false;
        }

        let heading = if self.skidding { self.turn_dir } else { facing.dir() };
        self.precalc_mounts(1, heading, PIVOT);
        if !vertical {
            self.adjust_zlevel(&*world.map, 1, dp);
        }

        let horizontal_before = self.velocity;
        let mut impulse = 0.0;
        let mut veh_veh_coll = false;
        let mut colls: Vec<Collision> = Vec::new();
        let mut attempts = world.tuning.max_displace_attempts.max(1);
        loop {
            colls.clear();
            self.collision(world, &mut colls, dp, false, false);

            let mut by_target: Vec<(VehicleId, Vec<Collision>)> = Vec::new();
            for coll in &colls {
                let CollisionKind::Vehicle { target, .. } = coll.kind else {
                    continue;
                };
                match by_target.iter_mut().find(|(id, _)| *id == target) {
                    Some((_, group)) => group.push(coll.clone()),
                    None => by_target.push((target, vec![coll.clone()])),
                }
            }
            for (target, group) in &by_target {
                veh_veh_coll = true;
                impulse += self.vehicle_vehicle_collision(world, *target, group);
            }

            for coll in colls.iter().filter(|c| !matches!(c.kind, CollisionKind::Vehicle { .. })) {
                let dmg = trunc_to_i32(coll.imp);
                let Some(part) = self.parts.get(coll.part) else {
                    continue;
                };
                if part.info().is_rotor() {
                    self.damage(coll.part, dmg, world);
                } else {
                    let mount = part.mount;
                    impulse += coll.imp;
                    self.damage(coll.part, dmg, world);
                    self.damage_all(dmg / 2, dmg, mount, world);
                }
            }

            if veh_veh_coll {
                break;
            }
            attempts -= 1;
            let after = self.axis_velocity(axis);
            if attempts == 0 || colls.is_empty() || after == 0 || after.signum() != velocity_before.signum() {
                break;
            }
        }

        let mut coll_turn = 0.0;
        if impulse > 0.0 {
            coll_turn = self.shake_vehicle(world, horizontal_before, facing.dir());
            let volume = trunc_to_u32(impulse.sqrt()).min(MAX_CRASH_VOLUME);
            world.sound(self.pos, i32::try_from(volume).unwrap_or(0), SoundKind::Combat, "crash!");
        }

        if veh_veh_coll {
            return false;
        }

        if !vertical && !self.valid_wheel_config() && !self.in_water && !self.is_flying() {
            self.velocity += if self.velocity < 0 { SCRAPE_SLOWDOWN } else { -SCRAPE_SLOWDOWN };
            for point in self.occupied_points() {
                world.map.add_field(point, FieldKind::Rubble, 1, SCRAPE_DEBRIS_DURATION);
            }
        }

        if self.last_turn > 0.0 {
            self.last_turn = (self.last_turn - 1.0).max(0.0);
        } else if self.last_turn < 0.0 {
            self.last_turn = (self.last_turn + 1.0).min(0.0);
        }

        let velocity_after = self.axis_velocity(axis);
        let mut can_move = velocity_after != 0 && velocity_after.signum() == velocity_before.signum();
        if vertical && self.is_rotorcraft() && colls.is_empty() {
            can_move = true;
        }

        if can_move {
            if self.skidding {
                self.face.init(self.turn_dir);
            } else {
                self.face.init(facing.dir());
            }
            self.movement.init(facing.dir());
            if coll_turn != 0.0 {
                self.skidding = true;
                self.turn(world, coll_turn);
            }
            self.pos += dp;
            for part in &mut self.parts {
                part.precalc[0] = part.precalc[1];
            }
            self.sync_footprint(world);
            self.shift_zlevel(world);
        } else if !vertical {
            self.stop(world, true);
        }

        self.check_falling_or_floating(&*world.map);
        if self.skidding && can_move && self.player_in_control(world.creatures) {
            self.possibly_recover_from_skid(world);
        }

        if !vertical && can_move {
            let wheels: Vec<usize> = self.wheels().collect();
            for w in wheels {
                let pos = self.global_part_pos(w);
                if world.one_in(2) && world.map.has_flag(TerrainFlag::Swimmable, pos) {
                    world.sound(pos, 4, SoundKind::Movement, "splash!");
                }
                self.handle_trap(world, pos, w);
            }
        }
        can_move
    }

    /// Publish the tiles the vehicle covers to the map and keep everyone on
    /// board on their seats.
    pub fn sync_footprint(&self, world: &mut World<'_>) {
        let footprint: Vec<(IVec3, usize)> = self
            .parts
            .iter()
            .enumerate()
            .filter(|(_, part)| !part.removed)
            .map(|(i, part)| (self.pos + part.precalc[0], i))
            .collect();
        world.map.set_vehicle_footprint(self.id, &footprint);
        for (seat, who) in self.riders() {
            world.creatures.set_position(who, self.global_part_pos(seat));
        }
    }
}
