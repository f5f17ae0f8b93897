//! One movement step and the per-turn budget that paces it.

use glam::IVec3;
use log::{debug, info};

use crate::constants::{
    GRAVITY, IDLE_TURN_PENALTY, MIN_MOVING_VELOCITY, MIN_TRACTION, TILE_HEIGHT, VMIPH_PER_TILE,
};
use crate::messages::MsgKind;
use crate::tileray::TileRay;
use crate::units::{mps_to_vmiph, vmiph_to_mps};
use crate::vector_math::same_heading;
use crate::vehicle::{PartFlag, Vehicle};
use crate::world::World;

use super::rails::{is_on_rails, process_movement_on_rails, RailAction};
use super::{ActOutcome, RemovalReason};

impl Vehicle {
    /// Take one movement step.
    ///
    /// Spends turn budget in proportion to speed, applies gravity, lets an
    /// uncontrolled vehicle drift into a skid, follows rails and finally
    /// displaces the vehicle one tile. A vehicle that cannot afford the step
    /// carries its budget over to the next turn.
    #[expect(
        clippy::too_many_lines,
        reason = "The step is a fixed sequence of checks that reads best in order."
    )]
    pub fn act_on_map(&mut self, world: &mut World<'_>) -> ActOutcome {
        if !world.map.inbounds(self.pos) {
            info!("{} left the map at {}", self.name, self.pos);
            self.stop(world, false);
            self.of_turn = 0.0;
            self.set_falling(false);
            world.map.clear_vehicle_footprint(self.id);
            return ActOutcome::Removed(RemovalReason::OutOfBounds);
        }
        if self.decrement_summon_timer(world) {
            world.map.clear_vehicle_footprint(self.id);
            return ActOutcome::Removed(RemovalReason::Despawned);
        }
        if self.is_wrecked() {
            world.map.clear_vehicle_footprint(self.id);
            return ActOutcome::Removed(RemovalReason::Wrecked);
        }

        let pl_ctrl = self.player_in_control(world.creatures);
        if self.is_floating() && !self.can_float() {
            world.msg(MsgKind::Bad, format!("Your {} sank.", self.name));
            self.unboard_all(world.creatures);
            self.remote_controlled = false;
            world.map.clear_vehicle_footprint(self.id);
            return ActOutcome::Removed(RemovalReason::Sank);
        }

        let should_fall = self.is_falling() || self.vertical_velocity != 0;
        if should_fall {
            let old_vel = vmiph_to_mps(self.vertical_velocity);
            let new_vel = -(2.0 * TILE_HEIGHT * GRAVITY + old_vel * old_vel).sqrt();
            self.vertical_velocity = mps_to_vmiph(new_vel);
            self.set_falling(true);
        } else {
            self.set_falling(false);
        }

        if !should_fall && self.velocity.abs() < MIN_MOVING_VELOCITY && self.requested_z_change == 0 {
            self.stop(world, true);
            self.of_turn -= IDLE_TURN_PENALTY;
            return ActOutcome::Continue;
        }

        if self.traction(&*world.map) < MIN_TRACTION {
            self.of_turn = 0.0;
            if !should_fall {
                self.stop(world, true);
                let text = if self.parts_with(PartFlag::Floats).next().is_none() {
                    format!("Your {} can't move on this terrain.", self.name)
                } else {
                    format!("Your {} is beached.", self.name)
                };
                world.msg(MsgKind::Info, text);
                return ActOutcome::Continue;
            }
        }

        let turn_cost = VMIPH_PER_TILE / f64::from(self.velocity.abs()).max(0.0001);
        let mut falling_only = false;
        if turn_cost >= self.of_turn
            && ((!self.is_flying() && self.requested_z_change == 0) || !self.is_rotorcraft())
        {
            if !should_fall {
                self.of_turn_carry = self.of_turn;
                self.of_turn = 0.0;
                return ActOutcome::Continue;
            }
            falling_only = true;
        }
        if !falling_only {
            self.of_turn -= turn_cost;
        }

        let on_rails = is_on_rails(&*world.map, self);
        if world.one_in(world.tuning.skid_check_one_in) {
            let mut controlled = false;
            for (seat, who) in self.riders() {
                if self.part_with_feature(seat, PartFlag::Controls, true).is_none() {
                    continue;
                }
                controlled = true;
                if world.creatures.kind(who).is_character() {
                    world.creatures.practice_driving(who, 1);
                }
            }
            if !controlled
                && !pl_ctrl
                && !self.is_floating()
                && !on_rails
                && !self.is_flying()
                && self.requested_z_change == 0
            {
                self.skidding = true;
            }
        }

        if self.skidding && world.one_in(world.tuning.skid_drift_one_in) {
            let drift = if world.one_in(2) { -15.0 } else { 15.0 };
            self.turn(world, drift);
        }
        if should_fall {
            self.skidding = true;
        }

        let rail_action = if self.can_use_rails() && !falling_only {
            process_movement_on_rails(&*world.map, self)
        } else {
            RailAction::None
        };
        if let RailAction::Turn(dir) = rail_action {
            self.turn_dir = dir;
        }

        let mut mdir = if self.skidding || should_fall {
            self.movement.clone()
        } else if !same_heading(self.turn_dir, self.face.dir())
            && (!on_rails || matches!(rail_action, RailAction::Turn(_)))
        {
            TileRay::new(self.turn_dir)
        } else {
            self.face.clone()
        };

        let mut dp = IVec3::ZERO;
        if self.velocity.abs() >= MIN_MOVING_VELOCITY && !falling_only {
            mdir.advance(if self.velocity < 0 { -1 } else { 1 });
            let step = match rail_action {
                RailAction::Shift(shift) => shift.truncate(),
                _ => mdir.last_delta(),
            };
            dp.x = step.x;
            dp.y = step.y;
        }
        if should_fall {
            dp.z = -1;
            self.set_flying(false);
        } else {
            dp.z = self.requested_z_change;
            self.requested_z_change = 0;
            if dp.z > 0 && self.is_rotorcraft() {
                self.set_flying(true);
            }
        }

        debug!("{} steps by {dp} heading {:.0}", self.name, mdir.dir());
        self.displace_vehicle(world, dp, &mdir);
        if self.is_wrecked() {
            world.map.clear_vehicle_footprint(self.id);
            return ActOutcome::Removed(RemovalReason::Wrecked);
        }
        ActOutcome::Continue
    }

    /// Count down a summoned vehicle's lifetime.
    ///
    /// Returns `true` once time is up; everyone on board is put off first.
    pub fn decrement_summon_timer(&mut self, world: &mut World<'_>) -> bool {
        let Some(left) = self.summon_timer else {
            return false;
        };
        if left <= 1 {
            self.unboard_all(world.creatures);
            if world.creatures.player_sees(self.pos) {
                world.msg(MsgKind::Neutral, format!("The {} disappears!", self.name));
            }
            self.summon_timer = Some(0);
            return true;
        }
        self.summon_timer = Some(left - 1);
        false
    }

    /// Grant this turn's movement budget and apply a turn of drag.
    ///
    /// A moving or falling vehicle gets one step's worth of budget plus
    /// whatever it carried over; drag that would stop it does so, except
    /// that a player on cruise control keeps it creeping along. Cruise
    /// control then throttles towards its target.
    pub fn gain_moves(&mut self, world: &mut World<'_>) {
        self.check_falling_or_floating(&*world.map);
        let pl_ctrl = self.player_in_control(world.creatures);
        if self.is_moving() || self.is_falling() {
            self.of_turn = 1.0 + self.of_turn_carry;
            let slowdown = self.slowdown(world, self.velocity);
            if slowdown > self.velocity.abs() {
                if self.cruise_on && self.cruise_velocity != 0 && pl_ctrl {
                    self.velocity = if self.velocity > 0 { 1 } else { -1 };
                } else {
                    self.stop(world, true);
                }
            } else if self.velocity < 0 {
                self.velocity += slowdown;
            } else {
                self.velocity -= slowdown;
            }
        } else {
            self.of_turn = 0.001;
        }
        self.of_turn_carry = 0.0;

        if pl_ctrl && self.cruise_on && self.cruise_velocity != self.velocity {
            let thd = if self.cruise_velocity > self.velocity { 1 } else { -1 };
            self.thrust(world, thd, 0);
        }
    }
}
