//! Throttle, brakes, cruise control and steering input.

use log::debug;

use crate::constants::{HARNESS_SPEED_MULTIPLIER, MIN_TOWING_ACCELERATION, STUCK_TRACTION, TURN_STEP};
use crate::creature::Effect;
use crate::messages::MsgKind;
use crate::numeric::trunc_to_i32;
use crate::vector_math::{normalize_degrees, round_to_multiple};
use crate::vehicle::{FuelType, PartFlag, Vehicle};
use crate::world::World;

use super::traction::vehicle_wheel_traction;

/// Idle load a hovering rotorcraft burns, in tenths of a percent.
const HOVER_LOAD: i32 = 50;
/// Load a climbing rotorcraft burns, in tenths of a percent.
const CLIMB_LOAD: i32 = 200;

impl Vehicle {
    /// Accelerate along `thd` (+1 forward, -1 back) and climb or descend by
    /// `z` levels.
    ///
    /// Thrust against the direction of travel brakes. Refusals (no wheels, a
    /// sinking hull, a dead engine) are reported to a controlling player and
    /// leave the velocity untouched.
    pub fn thrust(&mut self, world: &mut World<'_>, thd: i32, z: i32) {
        if !self.is_moving() && z == 0 {
            self.turn_dir = self.face.dir();
            self.stop(world, true);
        }
        let pl_ctrl = self.player_in_control(world.creatures);

        let afloat = self.in_water && self.can_float();
        let airborne = self.is_rotorcraft() && (z != 0 || self.is_flying());
        if !(afloat || airborne) {
            if self.is_floating() && !self.can_float() {
                self.stop(world, true);
                if pl_ctrl {
                    world.msg(MsgKind::Neutral, format!("The {} is too leaky!", self.name));
                }
                return;
            }
            if !self.valid_wheel_config() && z == 0 {
                self.stop(world, true);
                if pl_ctrl {
                    world.msg(
                        MsgKind::Neutral,
                        format!("The {} doesn't have enough wheels to move!", self.name),
                    );
                }
                return;
            }
        }

        let mut thrusting = self.velocity == 0 || self.velocity.signum() == thd;

        let traction = self.k_traction(vehicle_wheel_traction(&*world.map, self, false));
        let accel = trunc_to_i32(f64::from(self.current_acceleration(true)) * traction);
        if accel < MIN_TOWING_ACCELERATION && self.velocity > 0 {
            if let Some(towed) = self.tow.and_then(|id| world.vehicles.vehicle(id)) {
                if pl_ctrl {
                    let text = format!(
                        "The {} struggles to pull the {} on this surface!",
                        self.name, towed.name
                    );
                    world.msg(MsgKind::Neutral, text);
                }
                return;
            }
        }
        if thrusting && accel == 0 {
            if pl_ctrl {
                world.msg(
                    MsgKind::Neutral,
                    format!("The {} is too heavy for its engine(s)!", self.name),
                );
            }
            return;
        }

        let max_vel = trunc_to_i32(traction * f64::from(self.max_velocity(true)));
        let max_brake = world.tuning.max_brake;
        let mut vel_inc = (accel + if thrusting { 0 } else { max_brake }) * thd;
        if thd == -1 && thrusting && !self.has_engine_type(FuelType::Battery) {
            vel_inc = trunc_to_i32(world.tuning.reverse_thrust_factor * f64::from(vel_inc));
        }

        let mut load = if self.cruise_on && accel != 0 {
            let effective_cruise = self.cruise_velocity.min(max_vel);
            vel_inc = if thd > 0 {
                vel_inc.min(effective_cruise - self.velocity)
            } else {
                vel_inc.max(effective_cruise - self.velocity)
            };
            if thrusting {
                1000 * vel_inc.abs() / accel
            } else {
                1000 * (vel_inc.abs() - max_brake).max(0) / accel
            }
        } else if thrusting {
            1000
        } else {
            0
        };
        if self.is_rotorcraft() && (z > 0 || self.is_flying()) {
            load = load.max(if z > 0 { CLIMB_LOAD } else { HOVER_LOAD });
            thrusting = true;
        }

        if load >= 1 && thrusting {
            if self.total_power_w(true) <= 0 || !self.engine_on || (z == 0 && accel == 0) {
                if pl_ctrl {
                    let (kind, text) = if self.total_power_w(false) <= 0 {
                        (MsgKind::Info, format!("The {} doesn't have an engine!", self.name))
                    } else if self.has_engine_type(FuelType::Muscle) {
                        (MsgKind::Info, format!("The {}'s mechanism is out of reach!", self.name))
                    } else if !self.engine_on {
                        (MsgKind::Neutral, format!("The {}'s engine isn't on!", self.name))
                    } else if traction < STUCK_TRACTION {
                        (MsgKind::Neutral, format!("The {} is stuck.", self.name))
                    } else {
                        (
                            MsgKind::Neutral,
                            format!("The {}'s engine emits a sneezing sound.", self.name),
                        )
                    };
                    world.msg(kind, text);
                }
                self.cruise_velocity = 0;
                return;
            }
            self.noise_and_smoke(load, world);
            self.consume_fuel(load);
            if z != 0 && self.is_rotorcraft() {
                self.requested_z_change = z;
            }
            let strain = self.strain();
            let strain = trunc_to_i32(strain * strain * 100.0);
            let engines: Vec<usize> = self.engines().collect();
            for e in engines {
                self.do_engine_damage(e, strain, world);
            }
        }

        if self.skidding {
            return;
        }

        let crosses_zero = (self.velocity > 0 && self.velocity + vel_inc < 0)
            || (self.velocity < 0 && self.velocity + vel_inc > 0);
        if crosses_zero {
            self.stop(world, true);
        } else if vel_inc > 0 {
            self.velocity = self.velocity.max((self.velocity + vel_inc).min(max_vel));
        } else {
            let min_vel = self.max_reverse_velocity(true);
            self.velocity = self.velocity.min((self.velocity + vel_inc).max(min_vel));
        }
        debug!(
            "{} thrust {thd}: accel {accel}, load {load}, velocity {}",
            self.name, self.velocity
        );

        self.check_harnessed_animals(world);
    }

    /// Harnessed animals that cannot keep up strain their harness.
    ///
    /// An animal that is the only engine sets the pace itself.
    fn check_harnessed_animals(&mut self, world: &mut World<'_>) {
        if self.parts_with(PartFlag::Engine).count() == 1 {
            return;
        }
        let harnesses: Vec<(usize, crate::creature::CreatureId)> = self
            .riders()
            .into_iter()
            .filter(|&(p, _)| self.parts[p].info().fuel_type == Some(FuelType::Animal))
            .collect();
        for (p, pet) in harnesses {
            if !world.creatures.has_effect(pet, Effect::Harnessed) {
                continue;
            }
            if self.velocity > world.creatures.speed(pet) * HARNESS_SPEED_MULTIPLIER {
                let text = format!(
                    "Your {} is not fast enough to keep up with the {}",
                    world.creatures.name(pet),
                    self.name
                );
                world.msg(MsgKind::Bad, text);
                let dmg = world.roll(0, 10);
                self.damage_direct(p, dmg, world);
            }
        }
    }

    /// Nudge the cruise control target by `amount` vmiph.
    ///
    /// The target lands on whole multiples of `amount`, stops at the safe
    /// speed on the way past it and stays within reverse and top speed.
    ///
    /// # Examples
    /// ```
    /// use trundle::sandbox::prefabs;
    /// use trundle::vehicle::VehicleId;
    /// let mut car = prefabs::car(VehicleId(1), glam::IVec3::ZERO).unwrap();
    /// car.cruise_thrust(1000);
    /// car.cruise_thrust(1000);
    /// assert_eq!(car.cruise_velocity, 2000);
    /// car.cruise_thrust(-1000);
    /// assert_eq!(car.cruise_velocity, 1000);
    /// ```
    pub fn cruise_thrust(&mut self, amount: i32) {
        if amount == 0 {
            return;
        }
        let safe_vel = self.safe_velocity(true);
        let max_vel = self.max_velocity(true);
        let max_rev_vel = self.max_reverse_velocity(true);
        let next = self.cruise_velocity + amount;
        let passes_safe = (self.cruise_velocity < safe_vel && safe_vel < next)
            || (self.cruise_velocity > safe_vel && safe_vel > next);
        if passes_safe {
            self.cruise_velocity = safe_vel;
        } else {
            if amount < 0 && (self.cruise_velocity == safe_vel || self.cruise_velocity == max_vel) {
                self.cruise_velocity -= 1;
            } else if amount > 0 && self.cruise_velocity == max_rev_vel {
                self.cruise_velocity += 1;
            } else {
                self.cruise_velocity = next;
            }
            let step = amount.abs();
            self.cruise_velocity = self.cruise_velocity / step * step;
        }
        self.cruise_velocity = self.cruise_velocity.clamp(max_rev_vel.min(max_vel), max_vel);
    }

    /// Steer by `degrees`; positive turns clockwise.
    ///
    /// Reversing mirrors the input unless reverse steering is configured.
    /// The target heading snaps to 15° steps.
    pub fn turn(&mut self, world: &World<'_>, degrees: f64) {
        if degrees == 0.0 {
            return;
        }
        let degrees = if self.velocity < 0 && !world.tuning.reverse_steering {
            -degrees
        } else {
            degrees
        };
        self.last_turn = degrees;
        let target = normalize_degrees(self.turn_dir + degrees);
        self.turn_dir = normalize_degrees(round_to_multiple(target, TURN_STEP));
    }

    /// Halt at once and line the movement back up with the facing.
    ///
    /// With `update_cache` set the map is told the occupied tiles changed.
    pub fn stop(&mut self, world: &mut World<'_>, update_cache: bool) {
        self.velocity = 0;
        self.skidding = false;
        self.movement = self.face.clone();
        self.last_turn = 0.0;
        self.of_turn_carry = 0.0;
        if !update_cache {
            return;
        }
        for point in self.occupied_points() {
            world.map.invalidate_cache(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{IVec2, IVec3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use crate::config::Tuning;
    use crate::creature::Effect;
    use crate::sandbox::{prefabs, Critter, MessageLog, Roster, TileMap};
    use crate::traps::TrapRegistry;
    use crate::vehicle::{FuelType, PartCatalog, PartFlag, VehicleId, VehiclePart};
    use crate::world::{NoVehicles, World};

    #[rstest]
    #[case::animal_alone(false, false)]
    #[case::animal_beside_a_motor(true, true)]
    fn slow_animals_strain_the_harness_only_beside_another_engine(
        #[case] motor: bool,
        #[case] strained: bool,
    ) {
        let mut wagon = prefabs::wagon(VehicleId(1), IVec3::new(5, 5, 0)).expect("wagon");
        if motor {
            let info = PartCatalog::builtin().get("motor_electric").expect("built-in motor");
            wagon.parts.push(VehiclePart::new(info, IVec2::new(0, 1)));
            wagon.refresh_mounts();
        }
        let harness = wagon
            .parts_with(PartFlag::Engine)
            .find(|&p| wagon.parts[p].info().fuel_type == Some(FuelType::Animal))
            .expect("harness");

        let mut roster = Roster::new();
        let mut mule = Critter::animal("mule", wagon.pos, 300.0, 10);
        mule.effects.insert(Effect::Harnessed, 1);
        let mule = roster.spawn(mule);
        assert!(wagon.board(harness, mule, &mut roster));
        wagon.velocity = 1000;

        let mut map = TileMap::new(20, 20);
        let mut log = MessageLog::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tuning = Tuning::default();
        let mut world = World::new(
            &mut map,
            &mut roster,
            &mut log,
            &mut rng,
            &tuning,
            TrapRegistry::builtin(),
            &NoVehicles,
        );
        wagon.check_harnessed_animals(&mut world);
        drop(world);

        assert_eq!(log.contains("is not fast enough to keep up with the wagon"), strained);
    }
}
