//! Collision detection and momentum exchange.
//!
//! A moving vehicle checks the tile each structure part (and each rotor) is
//! about to enter. Creatures, bashable terrain and solid obstacles are resolved
//! here with a one-dimensional momentum exchange along the axis of travel,
//! repeated until the obstacle gives way or the vehicle stops. Other vehicles
//! are resolved with a two-dimensional exchange and the struck vehicle's share
//! is queued on the [`World`] as a [`VehicleImpact`].

use glam::{DVec2, IVec2, IVec3};
use log::{debug, warn};

use crate::constants::VELOCITY_CONSTANT;
use crate::creature::{BodyPart, CreatureId, DamageKind, Effect};
use crate::map::{GameMap, TerrainFlag};
use crate::messages::{MsgKind, SoundKind};
use crate::numeric::{round_to_i32, trunc_to_i32, trunc_to_u32};
use crate::tileray::TileRay;
use crate::units::{damage_to_impulse, impulse_to_damage, mps_to_vmiph, vmiph_to_mps};
use crate::vector_math::vec_to_angle;
use crate::vehicle::{Axis, PartFlag, Vehicle, VehicleId, PIVOT};
use crate::world::{VehicleImpact, World};

/// Speed difference in m/s at and above which a collision is fully plastic.
const PLASTIC_COLLISION_SPEED: f64 = 26.8224;
/// Elasticity of a collision with no speed difference at all.
const MAX_ELASTICITY: f64 = 1.0;
/// Elasticity lost between rest and [`PLASTIC_COLLISION_SPEED`].
const ELASTICITY_RANGE: f64 = 0.7;
/// Tiles a swimmer is pushed per nudge attempt.
const NUDGE_STEP: i32 = 2;
/// Attempts to find a free tile for a swimmer in the way.
const MAX_NUDGE_STEPS: u32 = 10;
/// Damage dealt to each vehicle above which it starts to skid.
const SKID_DAMAGE: f64 = 800.0;
/// Per-part damage above which the struck vehicle takes shock damage.
const SHOCK_DAMAGE: i32 = 100;

/// What a vehicle part ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    /// A creature.
    Body(CreatureId),
    /// Another vehicle; resolved by the caller.
    Vehicle {
        /// Vehicle that was hit.
        target: VehicleId,
        /// Part of that vehicle on the struck tile.
        target_part: usize,
    },
    /// Terrain or furniture that can be smashed.
    Bashable,
    /// Anything solid that cannot be smashed, including the ground.
    Other,
}

/// Record of one part's collision during a move.
#[derive(Clone, Debug, PartialEq)]
pub struct Collision {
    /// What was hit.
    pub kind: CollisionKind,
    /// Part that took the hit, after armour redirection.
    pub part: usize,
    /// Display name of whatever was hit.
    pub target_name: String,
    /// Damage equivalent of the impulse the vehicle received.
    pub imp: f64,
    /// Damage dealt to the vehicle part.
    pub part_damage: f64,
    /// Damage dealt to the obstacle.
    pub object_damage: f64,
}

impl Collision {
    fn detected(kind: CollisionKind, part: usize, target_name: String) -> Self {
        Self {
            kind,
            part,
            target_name,
            imp: 0.0,
            part_damage: 0.0,
            object_damage: 0.0,
        }
    }
}

/// Mass, elasticity and density of whatever a part ran into.
#[derive(Clone, Copy, Debug)]
struct Obstacle {
    mass: f64,
    elasticity: f64,
    density: f64,
}

impl Obstacle {
    const SOLID: Self = Self {
        mass: 1000.0,
        elasticity: 0.1,
        density: 80.0,
    };

    const fn body(weight_kg: f64) -> Self {
        Self {
            mass: weight_kg,
            elasticity: 0.3,
            density: 15.0,
        }
    }

    fn terrain(map: &dyn GameMap, p: IVec3, bash_floor: bool) -> Self {
        let resistance = f64::from(map.bash_resistance(p, bash_floor));
        let strength = f64::from(map.bash_strength(p, bash_floor));
        Self {
            mass: (resistance + strength) / 2.0,
            elasticity: 0.3,
            density: resistance,
        }
    }
}

/// Elasticity of a vehicle-vehicle collision at `delta_v` m/s.
///
/// Falls linearly from 1 at rest to 0.3 at 60 mph and stays there.
///
/// # Examples
/// ```
/// use trundle::movement::get_collision_factor;
/// assert_eq!(get_collision_factor(0.0), 1.0);
/// assert!((get_collision_factor(26.8224) - 0.3).abs() < 1e-12);
/// assert_eq!(get_collision_factor(-40.0), 0.3);
/// ```
#[must_use]
pub fn get_collision_factor(delta_v: f64) -> f64 {
    let speed = delta_v.abs();
    if speed <= PLASTIC_COLLISION_SPEED {
        MAX_ELASTICITY - ELASTICITY_RANGE * speed / PLASTIC_COLLISION_SPEED
    } else {
        MAX_ELASTICITY - ELASTICITY_RANGE
    }
}

/// Velocity left after losing `impulse` N·s, if that slows the vehicle
/// without reversing it; otherwise `fallback`.
fn recovered_velocity(vel1: f64, impulse: f64, mass: f64, fallback: f64) -> f64 {
    let recovered = vel1 - vel1.signum() * impulse / mass;
    if recovered.abs() < vel1.abs() && recovered * vel1 >= 0.0 {
        recovered
    } else {
        fallback
    }
}

impl Vehicle {
    /// Check every structure part and rotor against the tiles it would
    /// enter when the vehicle moves by `dp`, appending hits to `colls`.
    ///
    /// Unless `just_detect` is set the hits are resolved, changing the
    /// vehicle's velocity and damaging whatever was struck. With `bash_floor`
    /// set the floor under the vehicle is checked instead of the tile
    /// contents. Returns whether anything was hit.
    pub fn collision(
        &mut self,
        world: &mut World<'_>,
        colls: &mut Vec<Collision>,
        dp: IVec3,
        just_detect: bool,
        bash_floor: bool,
    ) -> bool {
        if dp.z != 0 && (dp.x != 0 || dp.y != 0) {
            let horizontal = self.collision(world, colls, dp.truncate().extend(0), just_detect, bash_floor);
            let vertical = self.collision(world, colls, IVec3::new(0, 0, dp.z), just_detect, bash_floor);
            return horizontal || vertical;
        }
        if dp.z == -1 && !bash_floor && self.collision(world, colls, IVec3::ZERO, just_detect, true) {
            return true;
        }

        let vertical = bash_floor || dp.z != 0;
        let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
        let velocity_before = self.axis_velocity(axis);
        let just_detect = just_detect || (velocity_before == 0 && !self.is_rotorcraft());
        let sign_before = velocity_before.signum();
        let mut lowest = velocity_before;
        let mut empty = true;
        let found_before = colls.len();

        for p in 0..self.parts.len() {
            let part = &self.parts[p];
            if part.removed || !(part.is_structure() || part.info().is_rotor()) {
                continue;
            }
            empty = false;
            let dsp = self.pos + dp + part.precalc[1];
            let Some(coll) = self.part_collision(world, p, dsp, just_detect, bash_floor) else {
                continue;
            };
            colls.push(coll);
            if just_detect {
                break;
            }
            let after = self.axis_velocity(axis);
            if vertical {
                lowest = if velocity_before < 0 { lowest.max(after) } else { lowest.min(after) };
                self.vertical_velocity = velocity_before;
            } else if after.signum() != sign_before {
                break;
            }
        }

        if vertical {
            self.vertical_velocity = lowest;
            if lowest == 0 {
                self.set_falling(false);
            }
        }

        if empty {
            warn!("{} checked collisions with no parts left", self.name);
            colls.push(Collision::detected(CollisionKind::Other, 0, String::from("nothing")));
            self.velocity = 0;
            self.vertical_velocity = 0;
            return true;
        }
        colls.len() > found_before
    }

    /// Resolve part `part` entering tile `p`.
    ///
    /// Returns `None` when nothing is there, or when the hit needs no
    /// resolution (a swimmer nudged aside, one of our own riders).
    #[expect(
        clippy::too_many_lines,
        reason = "The momentum exchange loop reads best as one piece."
    )]
    pub fn part_collision(
        &mut self,
        world: &mut World<'_>,
        part: usize,
        p: IVec3,
        just_detect: bool,
        bash_floor: bool,
    ) -> Option<Collision> {
        let vert_coll = bash_floor || p.z != self.pos.z;
        let pl_ctrl = self.player_in_control(world.creatures);

        if !bash_floor {
            if let Some(at) = world.map.veh_at(p).filter(|at| at.vehicle != self.id) {
                let lookup = world.vehicles;
                let target_name = lookup
                    .vehicle(at.vehicle)
                    .map_or_else(|| String::from("vehicle"), |other| other.name.clone());
                let kind = CollisionKind::Vehicle {
                    target: at.vehicle,
                    target_part: at.part,
                };
                return Some(Collision::detected(kind, part, target_name));
            }
        }

        let is_rotor = self.parts.get(part)?.info().is_rotor();
        let axis = if is_rotor {
            Axis::Rotor
        } else if vert_coll {
            Axis::Vertical
        } else {
            Axis::Horizontal
        };
        let mut coll_velocity = self.axis_velocity(axis);
        if !just_detect && coll_velocity == 0 {
            return None;
        }

        let critter = if bash_floor {
            None
        } else {
            world.creatures.critter_at(p).filter(|&c| {
                !(world.creatures.kind(c).is_character() && world.creatures.in_vehicle(c))
            })
        };
        if let Some(c) = critter {
            if self.seat_of(c).is_some() {
                return None;
            }
            if world.map.has_flag(TerrainFlag::Swimmable, world.creatures.position(c)) {
                self.nudge_swimmer(world, part, c);
                return None;
            }
        }

        let hit_part = self.part_with_feature(part, PartFlag::Armor, true).unwrap_or(part);
        let dmg_mod = (f64::from(self.parts[hit_part].info().dmg_mod) / 100.0).max(1.0);

        let (mut kind, mut target, mut target_name) = if let Some(c) = critter {
            (
                CollisionKind::Body(c),
                Obstacle::body(world.creatures.weight_kg(c)),
                world.creatures.name(c),
            )
        } else if self.hits_bashable(&*world.map, hit_part, p, bash_floor) {
            (
                CollisionKind::Bashable,
                Obstacle::terrain(&*world.map, p, bash_floor),
                world.map.name_at(p),
            )
        } else if world.map.impassable(p) || (bash_floor && !world.map.has_flag(TerrainFlag::NoFloor, p)) {
            (CollisionKind::Other, Obstacle::SOLID, world.map.name_at(p))
        } else {
            return None;
        };

        if just_detect {
            return Some(Collision::detected(kind, hit_part, target_name));
        }

        let mass = if is_rotor {
            self.parts[part].info().mass_kg
        } else {
            self.total_mass_kg()
        };
        if !(mass > 0.0 && mass.is_finite()) {
            warn!("{} has unusable mass {mass} in a collision", self.name);
            return None;
        }

        let part_density = self.parts[hit_part].info().density;
        let density_factor = (target.density - part_density).abs().clamp(0.1, 100.0);
        debug!(
            "{}'s {} hits {target_name}: mass {mass:.1} vs {:.1}, deformation {:.3}",
            self.name,
            self.parts[hit_part].name(),
            target.mass,
            density_factor / 100.0
        );

        let hallucination = critter.is_some_and(|c| world.creatures.is_hallucination(c));
        let sharp = self.parts[hit_part].has_flag(PartFlag::Sharp);
        let tolerance = world.tuning.momentum_tolerance;
        let max_passes = world.tuning.max_collision_passes.max(1);
        let prev_velocity = coll_velocity;
        let vel_sign = coll_velocity.signum();
        let mut vel2 = 0.0;
        let mut smashed;
        let mut part_dmg = 0.0;
        let mut obj_dmg = 0.0;
        let mut impulse_veh = 0.0;
        let mut stunned = 0;
        let mut passes = 0;

        loop {
            passes += 1;
            smashed = false;
            let vel1 = vmiph_to_mps(coll_velocity);
            let e = target.elasticity;
            let mass2 = target.mass;
            let total = mass + mass2;
            let mut vel1_a = (mass * vel1 + mass2 * vel2 + e * mass2 * (vel2 - vel1)) / total;
            let vel2_a = (mass * vel1 + mass2 * vel2 + e * mass * (vel1 - vel2)) / total;
            if !(vel1_a.is_finite() && vel2_a.is_finite()) {
                warn!("{} produced a non-finite collision result", self.name);
                coll_velocity = 0;
                break;
            }
            impulse_veh = (mass * (vel1_a - vel1)).abs();
            let impulse_obj = (mass2 * (vel2_a - vel2)).abs();

            if (impulse_obj - impulse_veh).abs() > tolerance {
                warn!(
                    "{} collision impulses disagree: vehicle {impulse_veh:.2} N·s, object {impulse_obj:.2} N·s",
                    self.name
                );
                if vel1_a.abs() < vel1.abs() {
                    coll_velocity = trunc_to_i32(f64::from(mps_to_vmiph(vel1_a)) * 0.9);
                }
                if vel2_a.abs() > vel2.abs() {
                    vel2 = vel2_a;
                }
                if mass2 <= 0.0 {
                    target.mass = 1.0;
                }
            } else {
                let bash_max = f64::from(world.map.bash_strength(p, bash_floor));
                part_dmg = if hallucination {
                    0.0
                } else {
                    let raw = impulse_to_damage(impulse_veh);
                    if bash_max > 0.0 {
                        raw.min(bash_max / dmg_mod)
                    } else {
                        raw
                    }
                };
                obj_dmg = impulse_to_damage(impulse_obj) * dmg_mod;

                match kind {
                    CollisionKind::Bashable => {
                        smashed = world.map.is_bashable(p, false)
                            && f64::from(world.map.bash_resistance(p, bash_floor)) <= obj_dmg
                            && world.map.bash(p, obj_dmg).success;
                        if smashed {
                            if bash_max > 0.0 {
                                part_dmg = part_dmg.min(bash_max / dmg_mod);
                            }
                            impulse_veh = damage_to_impulse(part_dmg);
                            vel1_a = recovered_velocity(vel1, impulse_veh, mass, vel1_a);
                            if world.map.is_bashable(p, bash_floor) {
                                smashed = false;
                                target = Obstacle::terrain(&*world.map, p, bash_floor);
                                target_name = world.map.name_at(p);
                            } else if world.map.impassable(p) {
                                smashed = false;
                                kind = CollisionKind::Other;
                                target = Obstacle::SOLID;
                                target_name = world.map.name_at(p);
                            }
                        }
                    }
                    CollisionKind::Body(c) => {
                        if !hallucination {
                            let health = f64::from(world.creatures.hp_max(c));
                            let blood = if sharp {
                                trunc_to_i32((20.0 + obj_dmg) * 5.0)
                            } else if obj_dmg > f64::from(world.roll(10, 30)) {
                                trunc_to_i32((10.0 + obj_dmg / 2.0) * 5.0)
                            } else {
                                0
                            };
                            self.parts[hit_part].blood += blood;

                            let roll_cap = trunc_to_i32(obj_dmg);
                            stunned = u32::from(world.roll(0, roll_cap) > 10)
                                + u32::from(world.roll(0, roll_cap) > 40);
                            if stunned > 0 {
                                world.creatures.add_effect(c, Effect::Stunned, stunned);
                            }

                            if world.creatures.kind(c).is_character() {
                                world.creatures.hurt_all(c, trunc_to_i32(obj_dmg));
                            } else {
                                let damage_kind = if sharp { DamageKind::Cut } else { DamageKind::Bash };
                                let armor = f64::from(world.creatures.armor(c, BodyPart::Torso, damage_kind));
                                obj_dmg = (obj_dmg - armor).max(0.0);
                                world.creatures.apply_damage(c, BodyPart::Torso, trunc_to_i32(obj_dmg));
                                part_dmg = part_dmg.min(health / dmg_mod);
                                impulse_veh = damage_to_impulse(part_dmg);
                                vel1_a = recovered_velocity(vel1, impulse_veh, mass, vel1_a);
                            }
                        }

                        if !vert_coll {
                            if vel2_a.abs() > 10.0 || (e * mass * vel1_a).abs() > (mass2 * (10.0 - vel2_a)).abs() {
                                let spread = world.roll_float(-60.0, 60.0);
                                let back = if vel2_a > 0.0 { 0.0 } else { 180.0 };
                                let angle = spread + self.movement.dir() + back;
                                world.creatures.fling(c, angle, vel2_a.abs().max(10.1));
                            } else if vel2_a.abs() > vel2.abs() {
                                vel2 = vel2_a;
                            } else {
                                coll_velocity = 0;
                                break;
                            }
                            smashed = world.creatures.is_dead(c) || world.creatures.position(c) != p;
                        }
                    }
                    CollisionKind::Other | CollisionKind::Vehicle { .. } => {
                        coll_velocity = 0;
                        break;
                    }
                }

                if !hallucination {
                    let keep = if smashed { 1.0 } else { 0.9 };
                    coll_velocity = mps_to_vmiph(vel1_a * keep);
                }
            }

            if smashed || coll_velocity == 0 || coll_velocity.signum() != vel_sign {
                break;
            }
            if passes >= max_passes {
                warn!("{} gave up on a collision with {target_name} after {passes} passes", self.name);
                break;
            }
        }

        self.set_axis_velocity(axis, coll_velocity);

        let veh_name = self.name.clone();
        let part_name = self.parts[hit_part].name().to_owned();
        if let CollisionKind::Body(c) = kind {
            if !hallucination {
                if pl_ctrl {
                    let text = if stunned > 0 {
                        format!("Your {veh_name}'s {part_name} rams into {target_name} and stuns it!")
                    } else {
                        format!("Your {veh_name}'s {part_name} rams into {target_name}!")
                    };
                    world.msg(MsgKind::Warning, text);
                }
                if sharp {
                    world.creatures.bleed(c);
                } else {
                    world.sound(p, 20, SoundKind::Combat, "smash!");
                }
            }
        } else {
            if pl_ctrl {
                world.msg(
                    MsgKind::Warning,
                    format!("Your {veh_name}'s {part_name} rams into {target_name} with a smash!"),
                );
            }
            world.sound(p, if smashed { 80 } else { 50 }, SoundKind::Combat, "smash!");
        }

        if smashed && !vert_coll {
            let raw_turn = trunc_to_i32(f64::from(world.roll(1, 3)) * part_dmg.sqrt());
            let turn_amount = f64::from((raw_turn / 15).max(1) * 15).min(world.tuning.max_collision_turn_deg);
            let turn_roll = f64::from(world.roll(0, 100));
            if turn_roll < (f64::from(prev_velocity - coll_velocity) / 100.0 * 2.0).abs() {
                self.skidding = true;
                let sign = f64::from(world.random_sign());
                self.turn(world, sign * turn_amount);
            }
        }

        Some(Collision {
            kind,
            part: hit_part,
            target_name,
            imp: impulse_to_damage(impulse_veh),
            part_damage: part_dmg,
            object_damage: obj_dmg,
        })
    }

    /// Whether part `part` collides with bashable terrain at `p`.
    ///
    /// Flat floors, tiny obstacles under a wheelless tile, short obstacles
    /// under a protrusion and track under a rail vehicle are driven over.
    fn hits_bashable(&self, map: &dyn GameMap, part: usize, p: IVec3, bash_floor: bool) -> bool {
        if bash_floor && map.is_bashable(p, true) {
            return true;
        }
        map.is_bashable(p, false)
            && map.move_cost(p) != 2
            && (self.part_with_feature(part, PartFlag::Wheel, true).is_some() || !map.has_flag(TerrainFlag::Tiny, p))
            && !(self.part_with_feature(part, PartFlag::Protrusion, true).is_some()
                && map.has_flag(TerrainFlag::Short, p))
            && !map.has_flag(TerrainFlag::NoCollide, p)
            && !(map.has_flag(TerrainFlag::Rail, p) && self.can_use_rails())
    }

    /// Push a swimmer diagonally out of the vehicle's path.
    ///
    /// Parts ahead of the pivot push to the left of travel, the rest to the
    /// right. A swimmer with nowhere free to go stays put.
    fn nudge_swimmer(&self, world: &mut World<'_>, part: usize, swimmer: CreatureId) {
        let side = if self.parts[part].mount.x > PIVOT.x { -45.0 } else { 45.0 };
        let mut ray = TileRay::new(self.movement.dir() + side);
        let points = self.occupied_points();
        let start = world.creatures.position(swimmer);
        let mut offset = IVec2::ZERO;
        for _ in 0..MAX_NUDGE_STEPS {
            ray.advance(NUDGE_STEP);
            offset += ray.last_delta();
            let end = start + offset.extend(0);
            if world.creatures.critter_at(end).is_none() && !points.contains(&end) {
                debug!("{} nudges a swimmer to {end}", self.name);
                world.creatures.set_position(swimmer, end);
                return;
            }
        }
        debug!("{} found nowhere to nudge a swimmer", self.name);
    }

    /// Resolve a collision with vehicle `target` through `colls`, the hits
    /// on it this move.
    ///
    /// This vehicle's velocity, heading and damage are updated in place; the
    /// target's are queued on the world. Returns the damage this vehicle
    /// took.
    pub fn vehicle_vehicle_collision(&mut self, world: &mut World<'_>, target: VehicleId, colls: &[Collision]) -> f64 {
        let lookup = world.vehicles;
        let Some(other) = lookup.vehicle(target) else {
            warn!("{} hit vehicle {} which is gone", self.name, target.into_inner());
            return 0.0;
        };
        let Some(first) = colls.first() else {
            return 0.0;
        };
        if let CollisionKind::Vehicle { target_part, .. } = first.kind {
            let other_part = other.parts.get(target_part).map_or("body", |part| part.name());
            let text = format!(
                "The {}'s {} collides with {}'s {}.",
                self.name,
                self.parts.get(first.part).map_or("body", |part| part.name()),
                other.name,
                other_part
            );
            world.msg(MsgKind::Bad, text);
        }

        let m1 = self.total_mass_kg();
        let m2 = other.total_mass_kg();
        if m1 + m2 <= 0.0 {
            return 0.0;
        }

        let mut other_velocity = other.velocity;
        let mut other_move_dir = other.movement.dir();
        let mut other_of_turn = other.of_turn;
        let dmg = if self.pos.z == other.pos.z {
            let v1 = self.velo_vec();
            let v2 = other.velo_vec();
            let energy_before = 0.5 * m1 * v1.length_squared() + 0.5 * m2 * v2.length_squared();

            let center1 = self.pos.truncate().as_dvec2() + self.rotated_center_of_mass();
            let center2 = other.pos.truncate().as_dvec2() + other.rotated_center_of_mass();
            let axis_y = (center1 - center2).normalize_or_zero();
            let axis_x = axis_y.perp();

            let vel1_x = axis_x.dot(v1);
            let vel1_y = axis_y.dot(v1);
            let vel2_x = axis_x.dot(v2);
            let vel2_y = axis_y.dot(v2);
            let e = get_collision_factor((vel1_y - vel2_y).abs() * VELOCITY_CONSTANT);

            let vel1_y_a = (m2 * vel2_y * (1.0 + e) + vel1_y * (m1 - m2 * e)) / (m1 + m2);
            let vel2_y_a = (m1 * vel1_y * (1.0 + e) + vel2_y * (m2 - m1 * e)) / (m1 + m2);
            let final1 = axis_y * vel1_y_a + axis_x * vel1_x;
            let final2 = axis_y * vel2_y_a + axis_x * vel2_x;

            self.movement.init(vec_to_angle(final1));
            self.velocity = signed_speed(final1, self.face_vec());
            other_move_dir = vec_to_angle(final2);
            other_velocity = signed_speed(final2, other.face_vec());

            let avg_of_turn = ((self.of_turn + other.of_turn) / 2.0).max(0.1);
            self.of_turn = avg_of_turn * 0.9;
            other_of_turn = avg_of_turn * 1.1;

            let energy_after = 0.5 * m1 * final1.length_squared() + 0.5 * m2 * final2.length_squared();
            ((energy_before - energy_after) / 1000.0 / 2000.0).abs()
        } else {
            let dmg = (f64::from(self.vertical_velocity) / 100.0).abs() * m1 / 10.0;
            self.vertical_velocity = 0;
            dmg
        };

        let dmg_veh1 = dmg / 2.0;
        let dmg_veh2 = dmg / 2.0;
        let count = crate::numeric::count_to_f64(colls.len());
        let dmg1_part = round_to_i32(dmg_veh1 / count);
        let dmg2_part = round_to_i32(dmg_veh2 / count);
        debug!(
            "{} and {} collide for {dmg:.1} damage",
            self.name, other.name
        );

        let mut struck = Vec::with_capacity(colls.len());
        for coll in colls {
            if let CollisionKind::Vehicle { target_part, .. } = coll.kind {
                struck.push(target_part);
            }
            self.damage(coll.part, dmg1_part, world);
        }
        if dmg_veh1 > SKID_DAMAGE {
            self.skidding = true;
        }

        world.push_impact(VehicleImpact {
            target,
            parts: struck,
            velocity: other_velocity,
            move_dir: other_move_dir,
            of_turn: other_of_turn,
            skidding: dmg_veh2 > SKID_DAMAGE,
            damage: dmg2_part,
        });
        dmg_veh1
    }

    /// Apply the share of a vehicle-vehicle collision queued for this
    /// vehicle.
    pub fn apply_impact(&mut self, impact: &VehicleImpact, world: &mut World<'_>) {
        self.velocity = impact.velocity;
        self.movement.init(impact.move_dir);
        self.of_turn = impact.of_turn;
        if impact.skidding {
            self.skidding = true;
        }
        let mounts: Vec<IVec2> = impact
            .parts
            .iter()
            .filter_map(|&p| self.parts.get(p).map(|part| part.mount))
            .collect();
        for &p in &impact.parts {
            self.damage(p, impact.damage, world);
        }
        if impact.damage > SHOCK_DAMAGE && !mounts.is_empty() {
            let count = i32::try_from(mounts.len()).unwrap_or(i32::MAX);
            let epicenter = mounts.iter().copied().sum::<IVec2>() / count;
            self.damage_all(impact.damage / 2, impact.damage, epicenter, world);
        }
    }
}

/// Length of `velocity`, negative when it points against `face`.
fn signed_speed(velocity: DVec2, face: DVec2) -> i32 {
    let speed = trunc_to_u32(velocity.length());
    let speed = i32::try_from(speed).unwrap_or(i32::MAX);
    if velocity.dot(face) < 0.0 {
        -speed
    } else {
        speed
    }
}
