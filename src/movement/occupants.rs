//! What a sudden change of speed does to the people and animals on board.

use log::warn;

use crate::creature::{BodyPart, CreatureKind};
use crate::messages::MsgKind;
use crate::numeric::trunc_to_i32;
use crate::vehicle::{PartFlag, Vehicle};
use crate::world::World;

/// Resistance lost on a seat that needs balance, such as a skateboard deck.
const BALANCE_PENALTY: i32 = 500;
/// Balance penalty offset by each of the skater background and deftness.
const BALANCE_MITIGATION: i32 = 150;

fn player_or_npc(kind: CreatureKind, mine: String, theirs: String) -> String {
    if kind == CreatureKind::Player {
        mine
    } else {
        theirs
    }
}

impl Vehicle {
    /// Shake everyone on board after the speed changed from
    /// `velocity_before` while travelling along `direction`.
    ///
    /// Occupants without a seatbelt may be thrown clear and flung; a hard
    /// enough jolt hurts everyone, thrown or not; a shaken driver may lose
    /// control. Returns the heading change caused by lost control, in
    /// degrees.
    pub fn shake_vehicle(&mut self, world: &mut World<'_>, velocity_before: i32, direction: f64) -> f64 {
        let d_vel = (self.velocity - velocity_before).abs() / 100;
        let driver = self.driver(world.creatures);
        let mut coll_turn = 0.0;

        for (seat, who) in self.riders() {
            let part_pos = self.global_part_pos(seat);
            if world.creatures.position(who) != part_pos {
                warn!(
                    "{}'s rider at {} is not on its seat at {part_pos}",
                    self.name,
                    world.creatures.position(who)
                );
                self.unboard_part(seat, world.creatures);
                continue;
            }

            let kind = world.creatures.kind(who);
            let name = world.creatures.name(who);
            let stats = world.creatures.stats(who);
            let move_resist = if let Some(stats) = stats {
                let mut resist = stats.strength * 150 + 500;
                if self.parts[seat].has_flag(PartFlag::SeatRequiresBalance) {
                    let mut penalty = BALANCE_PENALTY;
                    if stats.skater {
                        penalty -= BALANCE_MITIGATION;
                    }
                    if stats.deft {
                        penalty -= BALANCE_MITIGATION;
                    }
                    resist -= penalty;
                }
                resist
            } else {
                trunc_to_i32(world.creatures.weight_kg(who) * 200.0).max(100)
            };

            let belted = self.part_with_feature(seat, PartFlag::Seatbelt, true).is_some();
            let thrown = !belted && d_vel * world.roll(80, 120) > move_resist;

            if 10 * d_vel > 6 * world.roll(50, 100) {
                let dmg = d_vel * world.roll(70, 100) / 400;
                if stats.is_some() {
                    world.creatures.hurt_all(who, dmg);
                    let text = player_or_npc(
                        kind,
                        format!("You take {dmg} damage by the power of the impact!"),
                        format!("{name} takes {dmg} damage by the power of the impact!"),
                    );
                    world.msg(MsgKind::Bad, text);
                } else {
                    world.creatures.apply_damage(who, BodyPart::Torso, dmg);
                }
            }

            if let Some(stats) = stats.filter(|_| driver == Some(who)) {
                let lose_ctrl_roll = world.roll(0, d_vel);
                if lose_ctrl_roll > stats.dexterity * 2 + stats.driving * 3 {
                    let text = player_or_npc(
                        kind,
                        format!("You lose control of the {}.", self.name),
                        format!("{name} loses control of the {}.", self.name),
                    );
                    world.msg(MsgKind::Warning, text);
                    let speed = f64::from(self.velocity.abs()).sqrt();
                    let turn_amount = trunc_to_i32(f64::from(world.roll(1, 3)) * speed / 30.0).max(1);
                    let turn_angle = f64::from(turn_amount * 15).min(world.tuning.max_collision_turn_deg);
                    coll_turn = if world.one_in(2) { turn_angle } else { -turn_angle };
                }
            }

            if thrown {
                let text = if stats.is_some() {
                    player_or_npc(
                        kind,
                        format!("You are hurled from the {}'s seat by the power of the impact!", self.name),
                        format!("{name} is hurled from the {}'s seat by the power of the impact!", self.name),
                    )
                } else {
                    format!("The {name} is hurled from the {}'s seat by the power of the impact!", self.name)
                };
                if stats.is_some() || world.creatures.player_sees(part_pos) {
                    world.msg(MsgKind::Bad, text);
                }
                self.unboard_part(seat, world.creatures);
                let angle = direction + world.roll_float(-30.0, 30.0);
                let force = (d_vel - move_resist / 100).max(10);
                world.creatures.fling(who, angle, f64::from(force));
            }
        }
        coll_turn
    }
}
