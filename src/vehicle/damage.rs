//! Part damage and end-of-turn cleanup.
//!
//! Destroyed parts are only flagged as removed so indices stay valid while a
//! collision loop is still walking the part list; [`Vehicle::cleanup_removed_parts`]
//! compacts the list once the turn is over.

use glam::IVec2;
use log::{debug, info};

use crate::creature::Creatures;
use crate::messages::MsgKind;
use crate::vector_math::square_distance;
use crate::world::World;

use super::{PartFlag, Vehicle};

impl Vehicle {
    /// Deal `dmg` to part `p` with no armour or threshold.
    ///
    /// Returns the damage left over once the part's hit points are gone. A
    /// destroyed frame takes every part on its tile with it.
    pub fn damage_direct(&mut self, p: usize, dmg: i32, world: &mut World<'_>) -> i32 {
        let Some(part) = self.parts.get_mut(p) else {
            return dmg;
        };
        if part.removed || dmg <= 0 {
            return dmg.max(0);
        }
        if part.is_broken() {
            return dmg;
        }
        let leftover = (dmg - part.hp).max(0);
        part.hp -= dmg;
        if !part.is_broken() {
            return 0;
        }
        part.hp = 0;
        let destroyed = part.name().to_owned();
        let structure = part.is_structure();
        debug!("{} lost its {destroyed}", self.name);
        if self.player_in_control(world.creatures) {
            world.msg(MsgKind::Bad, format!("The {}'s {destroyed} is destroyed!", self.name));
        }
        if let Some(who) = self.parts[p].occupant.take() {
            world.creatures.set_in_vehicle(who, false);
        }
        if structure {
            let mount: Vec<usize> = self.parts_on_mount(p).collect();
            for i in mount {
                self.remove_part(i, world.creatures);
            }
        }
        leftover
    }

    /// Deal collision damage to part `p`.
    ///
    /// Armour on the same tile takes the hit first, and blows below a tenth
    /// of the target's durability (at most 20) glance off.
    pub fn damage(&mut self, p: usize, dmg: i32, world: &mut World<'_>) -> i32 {
        if dmg < 1 || p >= self.parts.len() {
            return 0;
        }
        let target = self.part_with_feature(p, PartFlag::Armor, true).unwrap_or(p);
        let threshold = (self.parts[target].info().durability / 10).min(20);
        if dmg < threshold {
            return 0;
        }
        self.damage_direct(target, dmg, world)
    }

    /// Shock damage spreading from `impact` across the vehicle.
    ///
    /// Each part takes a roll between `dmg1` and `dmg2` divided by the square
    /// of its distance from the impact plus one; the impact tile itself and
    /// protruding frames are spared.
    pub fn damage_all(&mut self, dmg1: i32, dmg2: i32, impact: IVec2, world: &mut World<'_>) {
        let (lo, hi) = if dmg2 < dmg1 { (dmg2, dmg1) } else { (dmg1, dmg2) };
        if lo < 1 {
            return;
        }
        for p in 0..self.parts.len() {
            let part = &self.parts[p];
            if part.removed || (part.is_structure() && part.has_flag(PartFlag::Protrusion)) {
                continue;
            }
            let distance = 1 + square_distance(part.mount, impact);
            if distance > 1 {
                let net = world.roll(lo, hi) / (distance * distance);
                self.damage_direct(p, net, world);
            }
        }
    }

    /// Flag part `p` as removed, unboarding anyone in it.
    pub fn remove_part(&mut self, p: usize, creatures: &mut dyn Creatures) {
        let Some(part) = self.parts.get_mut(p) else {
            return;
        };
        part.removed = true;
        if let Some(who) = part.occupant.take() {
            creatures.set_in_vehicle(who, false);
        }
    }

    /// Take the occupant out of part `p`.
    pub fn unboard_part(&mut self, p: usize, creatures: &mut dyn Creatures) {
        if let Some(who) = self.parts.get_mut(p).and_then(|part| part.occupant.take()) {
            creatures.set_in_vehicle(who, false);
        }
    }

    /// Take every occupant out of the vehicle.
    pub fn unboard_all(&mut self, creatures: &mut dyn Creatures) {
        for p in 0..self.parts.len() {
            self.unboard_part(p, creatures);
        }
    }

    /// Drop removed parts from the part list.
    ///
    /// Returns `true` when anything was dropped.
    pub fn cleanup_removed_parts(&mut self) -> bool {
        let before = self.parts.len();
        self.parts.retain(|part| !part.removed);
        let changed = self.parts.len() != before;
        if changed {
            info!("{} shed {} destroyed parts", self.name, before - self.parts.len());
        }
        changed
    }

    /// Whether every part is gone.
    #[must_use]
    pub fn is_wrecked(&self) -> bool {
        self.parts.iter().all(|part| part.removed)
    }
}
