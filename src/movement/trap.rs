//! Wheels running over traps.

use glam::IVec3;
use log::debug;

use crate::dice;
use crate::messages::{MsgKind, SoundKind};
use crate::vector_math::direction_name;
use crate::vehicle::{PartFlag, Vehicle};
use crate::world::World;

impl Vehicle {
    /// Trigger the trap at `p` under part `part`, if a wheel sits there.
    ///
    /// Falling traps (pits and holes) are left to the falling logic.
    pub fn handle_trap(&mut self, world: &mut World<'_>, p: IVec3, part: usize) {
        let Some(wheel) = self.part_with_feature(part, PartFlag::Wheel, true) else {
            return;
        };
        let trap_id = world.map.trap_at(p);
        if trap_id.is_null() {
            return;
        }
        let traps = world.traps;
        let trap = traps.get(trap_id);
        let data = &trap.vehicle;
        if data.is_falling {
            return;
        }

        let seen = world.creatures.player_sees(p);
        let known = world.creatures.player_knows_trap(p);
        let part_name = self.parts[part].name().to_owned();
        if seen {
            let text = if known {
                format!("The {}'s {part_name} runs over {}.", self.name, trap.name)
            } else {
                format!("The {}'s {part_name} runs over something.", self.name)
            };
            world.msg(MsgKind::Bad, text);
        }

        if data.chance < world.roll(1, 100) {
            return;
        }
        debug!("{} sets off {} at {p}", self.name, trap.id);
        if data.sound_volume > 0 {
            world.sound(p, data.sound_volume, SoundKind::Combat, &data.sound);
        }
        if data.do_explosion {
            world.map.explosion(p, data.damage, data.shrapnel);
        } else {
            self.damage_direct(wheel, data.damage, world);
        }

        let mut still_has_trap = true;
        if data.remove_trap || data.do_explosion {
            world.map.remove_trap(p);
            still_has_trap = false;
        }
        for entry in &data.spawn_items {
            let (item, chance) = entry.item();
            let count = dice::roll_remainder(world.rng, chance);
            if count > 0 {
                world.map.spawn_item(p, item, count);
            }
        }
        if let Some(replacement) = trap.replacement {
            world.map.set_trap(p, replacement);
            still_has_trap = true;
        }

        if still_has_trap {
            if seen || known {
                world.creatures.player_learn_trap(p);
            }
            if seen && !known {
                let now = traps.get(world.map.trap_at(p));
                let origin = world.creatures.player().map_or(p, |player| world.creatures.position(player));
                let text = match direction_name((p - origin).truncate()) {
                    Some(direction) => format!("You've spotted a {} to the {direction}!", now.name),
                    None => format!("You've spotted a {} right here!", now.name),
                };
                world.msg(MsgKind::Neutral, text);
            }
        }
    }
}
