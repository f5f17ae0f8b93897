//! Derived physical statistics.
//!
//! Everything here is computed from the installed parts on demand. The drag
//! coefficients follow the usual quadratic air and water drag model with a
//! rolling term that has a constant and a velocity-proportional part:
//!
//! ```text
//! F_air     = c_air * v²
//! F_water   = c_water * v²
//! F_rolling = c_rolling * (33.33 + v)
//! ```

use glam::{DVec2, IVec2};
use log::debug;

use crate::constants::{GRAVITY, ROLLING_CONSTANT_TO_VARIABLE};
use crate::numeric::{count_to_f64, round_to_i32};
use crate::units::{mps_to_vmiph, vmiph_to_mps};

use super::{FuelType, PartFlag, Vehicle, PIVOT};

/// Density of air in kg/m³.
const AIR_DENSITY: f64 = 1.29;
/// Density of water in kg/m³.
const WATER_DENSITY: f64 = 1000.0;
/// Shape factor shared by every hull.
const DRAG_COEFFICIENT: f64 = 0.5;
/// Frontal area of one tile of vehicle width, in m².
const TILE_FRONTAL_AREA: f64 = 2.0;
/// Submerged cross-section of one tile of hull width, in m².
const TILE_DRAFT_AREA: f64 = 0.12;
/// Mass a square metre of rotor disc keeps aloft, in kg.
const ROTOR_LIFT_PER_AREA: f64 = 30.0;
/// Drag applied by the parking brake while the engine is off, in vmiph.
const PARKING_BRAKE_DRAG: i32 = 1500;
/// Speed at which ground acceleration is rated, in vmiph.
const ACCELERATION_REFERENCE: i32 = 1000;
/// Upper bound for the top speed search, in m/s.
const MAX_SEARCH_SPEED: f64 = 400.0;

impl Vehicle {
    /// Mass of every part still attached, in kilograms.
    #[must_use]
    pub fn total_mass_kg(&self) -> f64 {
        self.parts
            .iter()
            .filter(|p| !p.removed)
            .map(|p| p.info().mass_kg)
            .sum()
    }

    /// Mass-weighted centre of the mounts, rounded to a mount.
    #[must_use]
    pub fn local_center_of_mass(&self) -> IVec2 {
        let mut weighted = DVec2::ZERO;
        let mut total = 0.0;
        for part in self.parts.iter().filter(|p| !p.removed) {
            let mass = part.info().mass_kg;
            weighted += part.mount.as_dvec2() * mass;
            total += mass;
        }
        if total <= 0.0 {
            return PIVOT;
        }
        let center = weighted / total;
        IVec2::new(round_to_i32(center.x), round_to_i32(center.y))
    }

    /// Combined engine output in watts.
    ///
    /// With `fueled` set only engines that have fuel, a pedalling driver or a
    /// harnessed animal count.
    #[must_use]
    pub fn total_power_w(&self, fueled: bool) -> i32 {
        self.engines()
            .filter(|&e| !fueled || self.is_engine_fueled(e))
            .map(|e| self.parts[e].info().power_w)
            .sum()
    }

    /// Acceleration at the current speed for the current movement mode, in
    /// vmiph per turn.
    #[must_use]
    pub fn current_acceleration(&self, fueled: bool) -> i32 {
        self.acceleration(fueled, self.velocity.abs())
    }

    /// Acceleration at `at_velocity` for the current movement mode.
    ///
    /// Power is rated at a reference speed so a standing start does not
    /// divide by zero.
    #[must_use]
    pub fn acceleration(&self, fueled: bool, at_velocity: i32) -> i32 {
        let mass = self.total_mass_kg();
        let power = f64::from(self.total_power_w(fueled));
        if mass <= 0.0 || power <= 0.0 {
            return 0;
        }
        let reference = at_velocity.max(ACCELERATION_REFERENCE.max(self.max_velocity(fueled) / 4));
        let speed = vmiph_to_mps(reference);
        if speed <= 0.0 {
            return 0;
        }
        mps_to_vmiph(power / (mass * speed))
    }

    /// Top speed for the current movement mode, in vmiph.
    #[must_use]
    pub fn max_velocity(&self, fueled: bool) -> i32 {
        let power = f64::from(self.total_power_w(fueled));
        if power <= 0.0 {
            return 0;
        }
        let c_air = self.coeff_air_drag();
        let top = if self.is_watercraft() {
            (power / (c_air + self.coeff_water_drag())).cbrt()
        } else if self.is_rotorcraft() && self.is_flying() {
            (power / c_air).cbrt()
        } else {
            let c_rolling = self.coeff_rolling_drag();
            top_speed(|v| (c_air * v * v + c_rolling * (ROLLING_CONSTANT_TO_VARIABLE + v)) * v, power)
        };
        mps_to_vmiph(top)
    }

    /// Top speed in reverse, in vmiph; always zero or negative.
    ///
    /// Electric motors reverse at full speed; everything else manages a
    /// quarter of it.
    #[must_use]
    pub fn max_reverse_velocity(&self, fueled: bool) -> i32 {
        let max = self.max_velocity(fueled);
        if self.has_engine_type(FuelType::Battery) {
            -max
        } else {
            -max / 4
        }
    }

    /// Speed the engines sustain without strain, in vmiph.
    #[must_use]
    pub fn safe_velocity(&self, fueled: bool) -> i32 {
        self.max_velocity(fueled) * 4 / 5
    }

    /// How far above safe speed the vehicle runs, as a fraction of the gap
    /// between safe and top speed.
    #[must_use]
    pub fn strain(&self) -> f64 {
        if self.velocity == 0 {
            return 0.0;
        }
        let safe = self.safe_velocity(true);
        let max = self.max_velocity(true).max(safe + 1);
        if self.velocity.abs() < safe {
            return 0.0;
        }
        f64::from(self.velocity.abs() - safe) / f64::from(max - safe)
    }

    /// Number of distinct lateral mounts carrying structure.
    fn width_tiles(&self) -> usize {
        let mut rows: Vec<i32> = self
            .parts
            .iter()
            .filter(|p| !p.removed && p.is_structure())
            .map(|p| p.mount.y)
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows.len()
    }

    /// Air drag coefficient in kg/m.
    #[must_use]
    pub fn coeff_air_drag(&self) -> f64 {
        0.5 * AIR_DENSITY * DRAG_COEFFICIENT * TILE_FRONTAL_AREA * count_to_f64(self.width_tiles())
    }

    /// Rolling drag coefficient in kg/s; zero without working wheels.
    #[must_use]
    pub fn coeff_rolling_drag(&self) -> f64 {
        let wheels: Vec<f64> = self
            .wheels()
            .map(|w| self.parts[w].info().rolling_resistance)
            .collect();
        if wheels.is_empty() {
            return 0.0;
        }
        let average = wheels.iter().sum::<f64>() / count_to_f64(wheels.len());
        average * self.total_mass_kg() * GRAVITY / ROLLING_CONSTANT_TO_VARIABLE
    }

    /// Water drag coefficient in kg/m.
    #[must_use]
    pub fn coeff_water_drag(&self) -> f64 {
        0.5 * WATER_DENSITY * DRAG_COEFFICIENT * TILE_DRAFT_AREA * count_to_f64(self.width_tiles())
    }

    /// Drag from parts other than wheels, as a negative number of vmiph per
    /// turn.
    ///
    /// A parked vehicle with its engine off also has the parking brake on.
    #[must_use]
    pub fn static_drag(&self) -> i32 {
        let parts: i32 = self
            .parts
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.info().drag)
            .sum();
        let brake = if !self.engine_on && !self.is_rotorcraft() {
            PARKING_BRAKE_DRAG
        } else {
            0
        };
        -parts - brake
    }

    /// Working wheel parts.
    pub fn wheels(&self) -> impl Iterator<Item = usize> + '_ {
        self.parts_with(PartFlag::Wheel)
            .filter(move |&w| !self.parts[w].is_broken())
    }

    /// Contact area of every working wheel, in square inches.
    #[must_use]
    pub fn wheel_area(&self) -> i32 {
        self.wheels().map(|w| self.parts[w].wheel_area()).sum()
    }

    /// Traction multiplier for a usable wheel contact area.
    ///
    /// Returns 1 when every wheel grips, less as more of the wheel area loses
    /// contact relative to the mass it carries, and -1 when the vehicle is
    /// submerged or airborne without the means to move there.
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
    ///     &[(IVec2::ZERO, "frame"), (IVec2::ZERO, "wheel"), (IVec2::X, "frame"), (IVec2::X, "wheel")],
    /// )
    /// .unwrap();
    /// let full = f64::from(cart.wheel_area());
    /// assert_eq!(cart.k_traction(full), 1.0);
    /// assert!(cart.k_traction(full / 4.0) < 1.0);
    /// assert_eq!(cart.k_traction(0.0), 0.0);
    /// ```
    #[must_use]
    pub fn k_traction(&self, traction_area: f64) -> f64 {
        if self.is_floating() {
            return if self.can_float() { 1.0 } else { -1.0 };
        }
        if self.is_flying() {
            return if self.is_rotorcraft() { 1.0 } else { -1.0 };
        }
        if self.is_watercraft() && self.can_float() {
            return 1.0;
        }
        let area = f64::from(self.wheel_area());
        if area <= 0.0 {
            return 0.0;
        }
        let without_traction = 1.0 - traction_area / area;
        if without_traction <= 0.0 {
            return 1.0;
        }
        let mass_penalty = without_traction * self.total_mass_kg();
        if mass_penalty <= 0.0 {
            return 1.0;
        }
        let traction = (traction_area / mass_penalty).clamp(0.0, 1.0);
        debug!("{} has traction {traction:.2}", self.name);
        traction
    }

    /// Whether the hull displaces more than the vehicle weighs.
    #[must_use]
    pub fn can_float(&self) -> bool {
        let buoyancy: f64 = self
            .parts_with(PartFlag::Floats)
            .filter(|&p| !self.parts[p].is_broken())
            .map(|p| self.parts[p].info().buoyancy_kg)
            .sum();
        buoyancy > 0.0 && buoyancy >= self.total_mass_kg()
    }

    /// Whether the vehicle is a boat sitting in water.
    #[must_use]
    pub fn is_watercraft(&self) -> bool {
        self.parts_with(PartFlag::Floats).next().is_some() && (self.in_water || self.is_floating())
    }

    /// Disc area of every working rotor, in m².
    #[must_use]
    pub fn total_rotor_area(&self) -> f64 {
        self.parts
            .iter()
            .filter(|p| p.is_available() && p.info().is_rotor())
            .map(|p| {
                let radius = p.info().rotor_diameter / 2.0;
                std::f64::consts::PI * radius * radius
            })
            .sum()
    }

    /// Whether powered rotors can lift the whole vehicle.
    #[must_use]
    pub fn is_rotorcraft(&self) -> bool {
        let area = self.total_rotor_area();
        area > 0.0
            && self.total_power_w(false) > 0
            && area * ROTOR_LIFT_PER_AREA >= self.total_mass_kg()
    }

    /// Whether the wheels can carry the vehicle.
    ///
    /// A single wheel needs a stabiliser and at most three tiles of frame;
    /// otherwise the centre of mass must lie within the wheels' footprint.
    #[must_use]
    pub fn valid_wheel_config(&self) -> bool {
        let wheels: Vec<usize> = self.wheels().collect();
        match wheels.as_slice() {
            [] => return false,
            [only] => {
                let frames = self
                    .parts
                    .iter()
                    .filter(|p| !p.removed && p.is_structure())
                    .count();
                if self.part_with_feature(*only, PartFlag::Stable, true).is_none() || frames > 3 {
                    return false;
                }
            }
            _ => {}
        }
        let mounts = wheels.iter().map(|&w| self.parts[w].mount);
        let (min, max) = mounts.fold((IVec2::MAX, IVec2::MIN), |(lo, hi), m| (lo.min(m), hi.max(m)));
        let com = self.local_center_of_mass();
        com.cmpge(min).all() && com.cmple(max).all()
    }

    /// Whether every wheel runs on rails.
    #[must_use]
    pub fn can_use_rails(&self) -> bool {
        let mut wheels = self.wheels().peekable();
        wheels.peek().is_some() && wheels.all(|w| self.parts[w].has_flag(PartFlag::Rail))
    }

    /// Sorted lateral offsets of the rail wheels relative to the pivot.
    #[must_use]
    pub fn rail_profile(&self) -> Vec<i32> {
        let mut rows: Vec<i32> = self
            .wheels()
            .filter(|&w| self.parts[w].has_flag(PartFlag::Rail))
            .map(|w| self.parts[w].mount.y - PIVOT.y)
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }
}

/// Speed at which `demand(v)` meets `power`, found by bisection.
///
/// `demand` must be non-decreasing in `v`.
fn top_speed(demand: impl Fn(f64) -> f64, power: f64) -> f64 {
    let (mut lo, mut hi) = (0.0, MAX_SEARCH_SPEED);
    if demand(hi) <= power {
        return hi;
    }
    for _ in 0..60 {
        let mid = (lo + hi) / 2.0;
        if demand(mid) < power {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{PartCatalog, VehicleId};
    use approx::assert_relative_eq;
    use glam::IVec3;

    fn build(layout: &[(IVec2, &str)]) -> Vehicle {
        Vehicle::from_layout(VehicleId(1), "test", IVec3::ZERO, PartCatalog::builtin(), layout)
            .unwrap()
    }

    fn car() -> Vehicle {
        let mut layout = Vec::new();
        for x in -1..=1 {
            for y in 0..=1 {
                layout.push((IVec2::new(x, y), "frame"));
            }
        }
        layout.extend([
            (IVec2::new(1, 0), "wheel_steerable"),
            (IVec2::new(1, 1), "wheel_steerable"),
            (IVec2::new(-1, 0), "wheel"),
            (IVec2::new(-1, 1), "wheel"),
            (IVec2::new(0, 0), "seat"),
            (IVec2::new(0, 0), "controls"),
            (IVec2::new(1, 0), "engine_v6"),
        ]);
        let mut veh = build(&layout);
        veh.fuel.insert(FuelType::Gasoline, 100.0);
        veh
    }

    #[test]
    fn top_speed_balances_power_and_drag() {
        let veh = car();
        let max = veh.max_velocity(true);
        assert!(max > 0);
        let v = vmiph_to_mps(max);
        let demand = (veh.coeff_air_drag() * v * v
            + veh.coeff_rolling_drag() * (ROLLING_CONSTANT_TO_VARIABLE + v))
            * v;
        assert_relative_eq!(demand, 60_000.0, max_relative = 0.01);
        assert_eq!(veh.max_reverse_velocity(true), -max / 4);
    }

    #[test]
    fn unfueled_engines_do_not_count() {
        let mut veh = car();
        veh.fuel.clear();
        assert_eq!(veh.total_power_w(true), 0);
        assert_eq!(veh.total_power_w(false), 60_000);
        assert_eq!(veh.max_velocity(true), 0);
        assert_eq!(veh.current_acceleration(true), 0);
    }

    #[test]
    fn strain_is_zero_below_safe_speed() {
        let mut veh = car();
        veh.velocity = veh.safe_velocity(true) - 1;
        assert_relative_eq!(veh.strain(), 0.0);
        veh.velocity = veh.max_velocity(true);
        assert_relative_eq!(veh.strain(), 1.0, epsilon = 0.01);
    }

    #[test]
    fn traction_is_monotonic_in_contact_area() {
        let veh = car();
        let full = f64::from(veh.wheel_area());
        let mut last = -1.0;
        for step in 0..=20 {
            let traction = veh.k_traction(full * f64::from(step) / 20.0);
            assert!(traction >= last);
            last = traction;
        }
        assert_relative_eq!(last, 1.0);
    }

    #[test]
    fn parking_brake_applies_with_engine_off() {
        let mut veh = car();
        assert_eq!(veh.static_drag(), -PARKING_BRAKE_DRAG);
        veh.engine_on = true;
        assert_eq!(veh.static_drag(), 0);
    }

    #[test]
    fn wheel_configurations() {
        assert!(car().valid_wheel_config());
        let unicycle = build(&[(IVec2::ZERO, "frame_light"), (IVec2::ZERO, "wheel_bicycle")]);
        assert!(!unicycle.valid_wheel_config());
        let stable = build(&[
            (IVec2::ZERO, "frame_light"),
            (IVec2::ZERO, "wheel_bicycle"),
            (IVec2::ZERO, "kickstand"),
        ]);
        assert!(stable.valid_wheel_config());
        let lopsided = build(&[
            (IVec2::ZERO, "frame"),
            (IVec2::ZERO, "wheel"),
            (IVec2::X, "frame"),
            (IVec2::X, "wheel"),
            (IVec2::Y, "frame"),
            (IVec2::Y, "engine_diesel"),
        ]);
        assert!(!lopsided.valid_wheel_config());
    }

    #[test]
    fn rail_profile_lists_wheel_rows() {
        let cart = build(&[
            (IVec2::new(0, -1), "frame"),
            (IVec2::new(0, -1), "wheel_rail"),
            (IVec2::new(0, 1), "frame"),
            (IVec2::new(0, 1), "wheel_rail"),
            (IVec2::new(1, 1), "frame"),
            (IVec2::new(1, 1), "wheel_rail"),
        ]);
        assert!(cart.can_use_rails());
        assert_eq!(cart.rail_profile(), vec![-1, 1]);
        assert!(!car().can_use_rails());
    }
}
