//! Ramps between z-levels and what holds the vehicle up.
//!
//! A part entering the low end of a down ramp or the high end of an up ramp
//! moves a z-level at once. When the centre of the vehicle changes level the
//! whole vehicle shifts, and every other part makes the opposite change
//! relative to it so nothing moves in absolute terms.

use glam::{IVec2, IVec3};
use hashbrown::HashMap;
use log::debug;

use crate::constants::MIN_Z_LEVEL;
use crate::map::{GameMap, TerrainFlag};
use crate::vehicle::{Support, Vehicle};
use crate::world::World;

fn ramp_step(map: &dyn GameMap, p: IVec3) -> i32 {
    if map.has_flag(TerrainFlag::RampDown, p) {
        -1
    } else if map.has_flag(TerrainFlag::RampUp, p) {
        1
    } else {
        0
    }
}

impl Vehicle {
    /// Whether any part would stand on a ramp using precalculated offsets
    /// `idir`, shifted by `offset`.
    #[must_use]
    pub fn check_on_ramp(&self, map: &dyn GameMap, idir: usize, offset: IVec3) -> bool {
        self.parts
            .iter()
            .filter(|part| !part.removed)
            .filter_map(|part| part.precalc.get(idir))
            .any(|&precalc| ramp_step(map, self.pos + offset + precalc) != 0)
    }

    /// Set the z component of precalculated offsets `idir` for a move by
    /// `offset`, following ramps outward from the new centre.
    pub fn adjust_zlevel(&mut self, map: &dyn GameMap, idir: usize, offset: IVec3) {
        if idir > 1 {
            return;
        }
        if self.part_at(IVec2::ZERO).is_some() && !self.check_on_ramp(map, idir, offset) {
            return;
        }

        let origin = self.pos;
        let mut new_center = origin + offset;
        new_center.z += ramp_step(map, new_center);

        let mut z_cache: HashMap<IVec2, i32> = HashMap::new();
        for part in self.parts.iter_mut().filter(|part| !part.removed) {
            let part_point = origin + offset + part.precalc[idir];
            let key = part_point.truncate();
            if let Some(&z) = z_cache.get(&key) {
                part.precalc[idir].z = z;
                continue;
            }
            let mut line = new_center;
            while line.truncate() != key {
                line.x += (key.x - line.x).signum();
                line.y += (key.y - line.y).signum();
                if map.has_flag(TerrainFlag::RampUp, line) {
                    line.z += 1;
                }
                if map.has_flag(TerrainFlag::RampDown, line) {
                    line.z -= 1;
                }
            }
            let z = line.z - origin.z;
            part.precalc[idir].z = z;
            z_cache.insert(key, z);
        }
    }

    /// Move the whole vehicle to the z-level its centre now stands on.
    pub fn shift_zlevel(&mut self, world: &mut World<'_>) {
        let shift = match self.part_at(IVec2::ZERO) {
            Some(center) => self.parts[center].precalc[0].z,
            None => ramp_step(&*world.map, self.pos),
        };
        if shift == 0 {
            return;
        }
        debug!("{} shifts {shift} z-levels", self.name);
        self.pos.z += shift;
        for part in &mut self.parts {
            part.precalc[0].z -= shift;
            part.precalc[1].z -= shift;
        }
        self.sync_footprint(world);
    }

    /// Work out what holds the vehicle up from the tiles under it.
    ///
    /// The vehicle falls when every tile lacks a floor and nothing below
    /// supports it, unless rotors keep it aloft. It floats when two thirds
    /// of its tiles are deep water and counts as in water when half are
    /// swimmable.
    pub fn check_falling_or_floating(&mut self, map: &dyn GameMap) {
        let points = self.occupied_points();
        if points.is_empty() {
            self.support = Support::Grounded;
            self.in_water = false;
            return;
        }

        let mut flying = self.is_flying() && self.is_rotorcraft();
        let mut falling = map.has_zlevels() && !flying;
        let mut deep_water = 0;
        let mut water = 0;
        for &p in &points {
            if falling {
                let below = p - IVec3::Z;
                falling = map.has_flag(TerrainFlag::NoFloor, p) && p.z > MIN_Z_LEVEL && !map.supports_above(below);
            }
            if map.has_flag(TerrainFlag::DeepWater, p) {
                deep_water += 1;
            }
            if map.has_flag(TerrainFlag::Swimmable, p) {
                water += 1;
            }
        }
        if falling && self.is_rotorcraft() {
            falling = false;
            flying = true;
        }

        let floating = 3 * deep_water >= 2 * points.len();
        self.in_water = 2 * water >= points.len();
        self.support = if flying {
            Support::Flying
        } else if falling {
            Support::Falling
        } else if floating {
            Support::Floating
        } else {
            Support::Grounded
        };
    }
}
