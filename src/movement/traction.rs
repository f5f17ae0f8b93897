//! Wheel contact with the terrain underneath.

use crate::map::{GameMap, TerrainFlag};
use crate::vehicle::{PartFlag, Vehicle};

use super::rails::is_on_rails;

/// Usable wheel contact area in square inches.
///
/// Deep water and open air give no grip; rougher terrain divides a wheel's
/// area by its movement cost, plus the wheel's penalty for terrain it was not
/// built for. On rails every rail wheel grips fully. A submerged vehicle gets
/// 1 if it floats and -1 otherwise.
///
/// With `ignore_modifiers` set every wheel is treated as if on flat road.
#[must_use]
pub fn vehicle_wheel_traction(map: &dyn GameMap, veh: &Vehicle, ignore_modifiers: bool) -> f64 {
    if veh.is_floating() {
        return if veh.can_float() { 1.0 } else { -1.0 };
    }
    if veh.in_water && veh.is_watercraft() && veh.can_float() {
        return 1.0;
    }
    let wheels: Vec<usize> = veh.wheels().collect();
    if wheels.is_empty() {
        return 0.0;
    }
    if is_on_rails(map, veh) {
        return wheels
            .iter()
            .filter(|&&w| veh.parts[w].has_flag(PartFlag::Rail))
            .map(|&w| f64::from(veh.parts[w].wheel_area()))
            .sum();
    }
    let mut area = 0.0;
    for w in wheels {
        let pos = veh.global_part_pos(w);
        if map.has_flag(TerrainFlag::DeepWater, pos) || map.has_flag(TerrainFlag::NoFloor, pos) {
            continue;
        }
        let mut move_mod = map.move_cost(pos);
        if move_mod <= 0 {
            return 0.0;
        }
        let part = &veh.parts[w];
        if let Some(terrain_mod) = part
            .info()
            .wheel_terrain_mod
            .iter()
            .find(|m| !map.has_flag(m.flag, pos))
        {
            move_mod += terrain_mod.penalty;
        }
        if ignore_modifiers {
            move_mod = 2;
        }
        area += 2.0 * f64::from(part.wheel_area()) / f64::from(move_mod);
    }
    area
}

impl Vehicle {
    /// Traction multiplier on the terrain under the wheels right now.
    #[must_use]
    pub fn traction(&self, map: &dyn GameMap) -> f64 {
        self.k_traction(vehicle_wheel_traction(map, self, false))
    }
}
