//! Per-turn speed loss from air, water and rolling resistance.

use hashbrown::HashSet;
use log::{debug, warn};

use crate::constants::ROLLING_CONSTANT_TO_VARIABLE;
use crate::units::{mps_to_vmiph, vmiph_to_mps};
use crate::vehicle::{Vehicle, VehicleId};
use crate::world::World;

use super::rails::is_on_rails;

impl Vehicle {
    /// Speed lost this turn at `at_velocity`, in vmiph; never less than 1.
    ///
    /// Vehicles in tow add their own slowdown. The tow chain is walked once,
    /// so a cycle only counts each vehicle a single time.
    #[must_use]
    pub fn slowdown(&self, world: &World<'_>, at_velocity: i32) -> i32 {
        let mut chain: Vec<&Vehicle> = vec![self];
        let mut visited: HashSet<VehicleId> = HashSet::new();
        visited.insert(self.id);
        let mut next = self.tow;
        while let Some(id) = next {
            if !visited.insert(id) {
                warn!("{} is part of a tow cycle", self.name);
                break;
            }
            let Some(towed) = world.vehicles.vehicle(id) else {
                break;
            };
            chain.push(towed);
            next = towed.tow;
        }
        chain.iter().rev().fold(0, |towed, veh| {
            let drag = veh.drag_slowdown(world, at_velocity);
            let mut slowdown = drag + towed;
            if !(veh.is_falling() || veh.is_floating() || veh.is_flying()) {
                slowdown -= veh.static_drag();
            }
            slowdown.max(1)
        })
    }

    /// Deceleration from drag forces alone, in vmiph per turn.
    fn drag_slowdown(&self, world: &World<'_>, at_velocity: i32) -> i32 {
        let mass = self.total_mass_kg();
        if mass <= 0.0 {
            return 0;
        }
        let mps = vmiph_to_mps(at_velocity.abs());
        let mut force = self.coeff_air_drag() * mps * mps;
        if self.is_watercraft() {
            force += self.coeff_water_drag() * mps * mps;
        } else if !self.is_falling() && !(self.is_flying() && self.is_rotorcraft()) {
            let rolling = self.coeff_rolling_drag() * (ROLLING_CONSTANT_TO_VARIABLE + mps);
            let skid = if is_on_rails(&*world.map, self) {
                1.0
            } else {
                let angle = (self.face.dir() - self.movement.dir()).to_radians();
                1.0 + (world.tuning.skid_drag_multiplier - 1.0) * angle.sin().abs()
            };
            force += rolling * skid;
        }
        let slowdown = mps_to_vmiph(force / mass);
        debug!(
            "{} at {at_velocity} vmiph, drag force {force:.2} N, drag accel {slowdown} vmiph, extra drag {}",
            self.name,
            self.static_drag()
        );
        if slowdown < 0 {
            warn!("{} has negative drag slowdown {slowdown}", self.name);
            return 0;
        }
        slowdown
    }
}
