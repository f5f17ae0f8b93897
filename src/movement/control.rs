//! Driver input and the handling model behind it.

use glam::{DVec2, IVec2, IVec3};
use log::{debug, error};

use crate::constants::MIN_Z_LEVEL;
use crate::creature::{CreatureId, CreatureKind, Effect};
use crate::map::TerrainFlag;
use crate::messages::MsgKind;
use crate::numeric::trunc_to_i32;
use crate::tileray::coord_translate;
use crate::vector_math::{angle_to_vec, direction_name};
use crate::vehicle::{FuelType, PartFlag, Vehicle, PIVOT};
use crate::world::World;

/// Heading change per unit of steering input, in degrees.
const STEER_STEP: f64 = 15.0;
/// Below this speed each throttle press changes cruise speed by 4 mph.
const FINE_THROTTLE_SPEED: i32 = 2000;
/// Velocity at which a vehicle covers ten tiles per turn; handling
/// difficulty is measured against it.
const TILES_PER_TURN_VELOCITY: f64 = 1000.0;
/// A skid started by a turn sharper than this cannot recover yet.
const RECOVERY_MAX_LAST_TURN: f64 = 13.0;

/// How well the vehicle responds to steering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Steering {
    /// Fraction of full steering available.
    Effective(f64),
    /// Steering parts exist but none works.
    Broken,
    /// Nothing on the vehicle can steer.
    NotInstalled,
    /// Animal-drawn with no animal in the harness.
    NoAnimal,
}

impl Steering {
    /// Steering fraction, zero when the vehicle cannot steer.
    #[must_use]
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Effective(value) => value,
            _ => 0.0,
        }
    }
}

/// Send `text` to the player when `who` is the player.
fn tell_player(world: &mut World<'_>, who: CreatureId, kind: MsgKind, text: String) {
    if world.creatures.kind(who) == CreatureKind::Player {
        world.msg(kind, text);
    }
}

impl Vehicle {
    /// Unit vector along the facing.
    #[must_use]
    pub fn face_vec(&self) -> DVec2 {
        angle_to_vec(self.face.dir())
    }

    /// Unit vector along the direction of travel.
    #[must_use]
    pub fn move_vec(&self) -> DVec2 {
        angle_to_vec(self.movement.dir())
    }

    /// Unit vector along the steering target.
    #[must_use]
    pub fn dir_vec(&self) -> DVec2 {
        angle_to_vec(self.turn_dir)
    }

    /// Velocity as a vector in vmiph; follows the movement heading while
    /// skidding and the facing otherwise.
    #[must_use]
    pub fn velo_vec(&self) -> DVec2 {
        let heading = if self.skidding { self.move_vec() } else { self.face_vec() };
        heading * f64::from(self.velocity)
    }

    /// Component of the velocity along the facing.
    #[must_use]
    pub fn forward_velocity(&self) -> f64 {
        f64::from(self.velocity) * self.move_vec().dot(self.face_vec())
    }

    /// Centre of mass relative to the vehicle position under the current
    /// facing.
    #[must_use]
    pub fn rotated_center_of_mass(&self) -> DVec2 {
        coord_translate(self.face.dir(), PIVOT, self.local_center_of_mass()).as_dvec2()
    }

    /// Whether an animal is tied into one of the animal engines.
    #[must_use]
    pub fn has_harnessed_animal(&self, world: &World<'_>) -> bool {
        self.parts
            .iter()
            .filter(|part| !part.removed && part.info().fuel_type == Some(FuelType::Animal))
            .filter_map(|part| part.occupant)
            .any(|pet| {
                world.creatures.has_effect(pet, Effect::Harnessed) && world.creatures.has_effect(pet, Effect::Pet)
            })
    }

    /// How well the vehicle steers right now.
    ///
    /// Boats steer fully while afloat and rotorcraft while airborne. One
    /// working steerable wheel is enough for full steering on land.
    #[must_use]
    pub fn steering_effectiveness(&self, world: &World<'_>) -> Steering {
        if self.is_floating() || (self.in_water && self.is_watercraft()) {
            return if self.can_float() {
                Steering::Effective(1.0)
            } else {
                Steering::Broken
            };
        }
        if self.is_flying() && self.is_rotorcraft() {
            return Steering::Effective(1.0);
        }
        if self.has_engine_type(FuelType::Animal) {
            return if self.has_harnessed_animal(world) {
                Steering::Effective(1.0)
            } else {
                Steering::NoAnimal
            };
        }
        let mut steerable = self.parts_with(PartFlag::Steerable).peekable();
        if steerable.peek().is_none() {
            return Steering::NotInstalled;
        }
        if steerable.any(|p| self.parts[p].is_available()) {
            Steering::Effective(1.0)
        } else {
            Steering::Broken
        }
    }

    /// Difficulty of keeping the vehicle under control.
    ///
    /// Grows with speed and with missing steering, missing traction and the
    /// gap between facing and steering target. A perfect vehicle at ten
    /// tiles per turn scores zero.
    #[must_use]
    pub fn handling_difficulty(&self, world: &World<'_>) -> f64 {
        let steer = self.steering_effectiveness(world).fraction().max(0.0);
        let ktraction = self.traction(&*world.map);
        let aligned = (1.0 - (self.face_vec() - self.dir_vec()).length()).max(0.0);
        let diff_mod = ((1.0 - steer) + (1.0 - ktraction) + (1.0 - aligned)) * 10.0;
        f64::from(self.velocity.abs()) * diff_mod / TILES_PER_TURN_VELOCITY
    }

    /// Apply a driver's input: `dir.x` steers, `dir.y` works the throttle
    /// (negative is forward) and `z` asks a rotorcraft to climb or descend.
    ///
    /// Steering costs the driver moves according to skill and handling
    /// difficulty, and a clumsy driver may fumble the turn.
    pub fn pldrive(&mut self, world: &mut World<'_>, driver: CreatureId, dir: IVec2, z: i32) {
        if z != 0 && self.is_rotorcraft() {
            let cleared = if z > 0 {
                self.check_heli_ascend(world, driver)
            } else {
                self.check_heli_descend(world, driver)
            };
            if cleared {
                let moves = world.creatures.moves(driver).min(0);
                world.creatures.set_moves(driver, moves);
                self.thrust(world, 0, z);
            }
        }

        let mut turn_delta = STEER_STEP * f64::from(dir.x);
        let handling_diff = self.handling_difficulty(world);
        if dir.x != 0 {
            match self.steering_effectiveness(world) {
                Steering::NoAnimal => {
                    tell_player(
                        world,
                        driver,
                        MsgKind::Info,
                        String::from("You cannot steer an animal-drawn vehicle with no animal harnessed."),
                    );
                    return;
                }
                Steering::NotInstalled => {
                    tell_player(
                        world,
                        driver,
                        MsgKind::Info,
                        String::from("This vehicle has no steering system installed, you can't turn it."),
                    );
                    return;
                }
                Steering::Broken => {
                    tell_player(world, driver, MsgKind::Bad, String::from("The steering is completely broken!"));
                    return;
                }
                Steering::Effective(_) => {}
            }

            let speed = world.creatures.speed(driver);
            let moves = world.creatures.moves(driver).min(speed);
            world.creatures.set_moves(driver, moves);

            let stats = world.creatures.stats(driver).unwrap_or_default();
            let skill = (f64::from(stats.driving) + f64::from(stats.dexterity + stats.perception) / 10.0).min(10.0);
            let penalty = world.roll_float(0.0, handling_diff) - skill;
            let mut cost = if penalty > 0.0 {
                trunc_to_i32(100.0 * (1.0 + penalty / 2.5))
            } else {
                trunc_to_i32(f64::from(speed.max(100)) * (1.0 - (-penalty / 10.0) * 2.0 / 3.0))
            };

            if penalty > skill || cost > 400 {
                tell_player(
                    world,
                    driver,
                    MsgKind::Warning,
                    format!("You fumble with the {}'s controls.", self.name),
                );
                turn_delta *= f64::from(world.roll(0, 2));
                cost = cost.max(world.creatures.moves(driver) + 100);
            } else if world.one_in(10) {
                if f64::from(cost) >= f64::from(speed) * 2.0 {
                    tell_player(
                        world,
                        driver,
                        MsgKind::Warning,
                        String::from("It takes you a very long time to steer that vehicle!"),
                    );
                } else if f64::from(cost) >= f64::from(speed) * 1.5 {
                    tell_player(
                        world,
                        driver,
                        MsgKind::Warning,
                        String::from("It takes you a long time to steer that vehicle!"),
                    );
                }
            }

            self.turn(world, turn_delta);
            let moves = world.creatures.moves(driver) - cost.max(speed / 3 + 1);
            world.creatures.set_moves(driver, moves);
            debug!("{} steering costs {cost} moves at difficulty {handling_diff:.2}", self.name);
        }

        if dir.y != 0 {
            let thr_amount = 100 * if self.velocity.abs() < FINE_THROTTLE_SPEED { 4 } else { 5 };
            if self.cruise_on {
                self.cruise_thrust(-dir.y * thr_amount);
            } else {
                self.thrust(world, -dir.y, 0);
                let moves = world.creatures.moves(driver).min(0);
                world.creatures.set_moves(driver, moves);
            }
        }

        let active = dir.x != 0 || (dir.y != 0 && !self.cruise_on);
        if self.skidding && active && self.valid_wheel_config() {
            let stats = world.creatures.stats(driver).unwrap_or_default();
            let roll = f64::from(world.roll(1, 10));
            if handling_diff * roll < f64::from(stats.dexterity + stats.driving * 2) {
                tell_player(
                    world,
                    driver,
                    MsgKind::Neutral,
                    format!("You regain control of the {}.", self.name),
                );
                world.creatures.practice_driving(driver, self.velocity / 5);
                self.regain_control();
            }
        }
    }

    /// Drive without a character at the wheel, such as a vehicle following
    /// the player.
    ///
    /// Returns `false` when an animal engine has nothing harnessed to it and
    /// the vehicle cannot drive itself.
    pub fn selfdrive(&mut self, world: &mut World<'_>, dir: IVec2) -> bool {
        if !self.towed {
            let harnessed = self
                .parts
                .iter()
                .filter(|part| !part.removed && part.info().fuel_type == Some(FuelType::Animal))
                .all(|part| {
                    part.occupant.is_some_and(|pet| {
                        world.creatures.has_effect(pet, Effect::Harnessed)
                            && world.creatures.has_effect(pet, Effect::Pet)
                    })
                });
            if !harnessed {
                debug!("{} has an empty harness and stops following", self.name);
                return false;
            }
        }

        let handling_diff = self.handling_difficulty(world);
        if dir.x != 0 {
            if !matches!(self.steering_effectiveness(world), Steering::Effective(_)) {
                return true;
            }
            self.turn(world, STEER_STEP * f64::from(dir.x));
        }
        if dir.y != 0 {
            let thr_amount = 100 * if self.velocity.abs() < FINE_THROTTLE_SPEED { 4 } else { 5 };
            if self.cruise_on {
                self.cruise_thrust(-dir.y * thr_amount);
            } else {
                self.thrust(world, -dir.y, 0);
            }
        }
        if self.skidding && self.valid_wheel_config() && handling_diff * f64::from(world.roll(1, 10)) < 15.0 {
            self.regain_control();
        }
        true
    }

    fn regain_control(&mut self) {
        self.velocity = trunc_to_i32(self.forward_velocity());
        self.skidding = false;
        self.movement.init(self.turn_dir);
    }

    /// Chance for a skidding vehicle travelling roughly along its facing to
    /// grip again.
    pub fn possibly_recover_from_skid(&mut self, world: &mut World<'_>) {
        if self.last_turn > RECOVERY_MAX_LAST_TURN {
            return;
        }
        let dot = self.move_vec().dot(self.face_vec());
        let threshold = world.dice(9, 20);
        if dot.abs() * 100.0 > f64::from(threshold) {
            world.msg(MsgKind::Neutral, format!("The {} recovers from its skid.", self.name));
            self.skidding = false;
            self.velocity = trunc_to_i32(f64::from(self.velocity) * dot);
            if dot < -0.8 {
                self.velocity = -self.velocity;
            }
            self.movement = self.face.clone();
        }
    }

    /// Land a rotorcraft that has ground under it.
    ///
    /// Returns whether the vehicle is on the ground.
    pub fn check_is_heli_landed(&mut self, world: &World<'_>) -> bool {
        if self.pos.z == 0 || !world.map.has_flag(TerrainFlag::NoFloor, self.pos) {
            self.set_flying(false);
            return true;
        }
        false
    }

    /// Whether the rotorcraft may descend a level, telling the pilot why
    /// not.
    pub fn check_heli_descend(&self, world: &mut World<'_>, pilot: CreatureId) -> bool {
        if !self.is_rotorcraft() {
            error!("{} is flying without rotors", self.name);
            return true;
        }
        let mut count = 0;
        let mut air_count = 0;
        for pt in self.occupied_points() {
            let below = pt - IVec3::Z;
            if world.map.has_zlevels() && (pt.z < MIN_Z_LEVEL || !world.map.has_flag(TerrainFlag::NoFloor, pt)) {
                tell_player(world, pilot, MsgKind::Neutral, String::from("You are already landed!"));
                return false;
            }
            let blocked = world.map.impassable(below)
                || world.map.has_flag(TerrainFlag::RampDown, below)
                || world.map.veh_at(below).is_some()
                || world.creatures.critter_at(below).is_some();
            if blocked {
                tell_player(
                    world,
                    pilot,
                    MsgKind::Bad,
                    String::from("It would be unsafe to try and land when there are obstacles below you."),
                );
                return false;
            }
            if world.map.has_flag(TerrainFlag::NoFloor, below) {
                air_count += 1;
            }
            count += 1;
        }
        if self.velocity > 0 && air_count != count {
            tell_player(
                world,
                pilot,
                MsgKind::Bad,
                String::from("It would be unsafe to try and land while you are moving."),
            );
            return false;
        }
        true
    }

    /// Whether the rotorcraft may climb a level, telling the pilot what is
    /// in the way.
    pub fn check_heli_ascend(&self, world: &mut World<'_>, pilot: CreatureId) -> bool {
        if !self.is_rotorcraft() {
            error!("{} is flying without rotors", self.name);
            return true;
        }
        if self.velocity > 0 && !self.is_flying() {
            tell_player(
                world,
                pilot,
                MsgKind::Bad,
                String::from("It would be unsafe to try and take off while you are moving."),
            );
            return false;
        }
        if !self.is_flying() && self.check_on_ramp(&*world.map, 0, IVec3::ZERO) {
            tell_player(
                world,
                pilot,
                MsgKind::Bad,
                String::from("It would be unsafe to try and take off from an uneven surface."),
            );
            return false;
        }
        let pilot_pos = world.creatures.position(pilot);
        for pt in self.occupied_points() {
            let above = pt + IVec3::Z;
            if !world.map.inbounds_z(above.z) {
                tell_player(
                    world,
                    pilot,
                    MsgKind::Bad,
                    String::from("It would be unsafe to try and ascend further."),
                );
                return false;
            }
            let blocker = if !world.map.has_flag(TerrainFlag::NoFloor, above) {
                Some(String::from("ceiling"))
            } else if world.map.impassable(above) {
                Some(world.map.name_at(above))
            } else if let Some(at) = world.map.veh_at(above) {
                let lookup = world.vehicles;
                Some(lookup.vehicle(at.vehicle).map_or_else(|| String::from("a vehicle"), |v| v.name.clone()))
            } else {
                world.creatures.critter_at(above).map(|c| world.creatures.name(c))
            };
            if let Some(blocker) = blocker {
                let text = match direction_name((pt - pilot_pos).truncate()) {
                    None => format!("Your ascent is blocked by {blocker} directly above you."),
                    Some(direction) => format!("Your ascent is blocked by {blocker} to your {direction}."),
                };
                tell_player(world, pilot, MsgKind::Bad, text);
                return false;
            }
        }
        true
    }
}
