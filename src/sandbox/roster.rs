//! Creature roster for the sandbox.

use glam::{DVec2, IVec3};
use hashbrown::{HashMap, HashSet};
use log::debug;

use crate::creature::{BodyPart, CharacterStats, CreatureId, CreatureKind, Creatures, DamageKind, Effect};
use crate::numeric::round_to_i32;
use crate::vector_math::angle_to_vec;

/// Tiles a flung creature travels per ten points of force.
const FLING_TILES_PER_FORCE: f64 = 0.1;
/// Longest distance a creature can be flung.
const MAX_FLING_TILES: f64 = 10.0;

/// A creature in the sandbox.
#[derive(Clone, Debug, PartialEq)]
pub struct Critter {
    /// Display name.
    pub name: String,
    /// Category.
    pub kind: CreatureKind,
    /// Current tile.
    pub pos: IVec3,
    /// Body weight in kilograms.
    pub weight_kg: f64,
    /// Base speed.
    pub speed: i32,
    /// Maximum hit points.
    pub hp_max: i32,
    /// Current hit points.
    pub hp: i32,
    /// Armour against every kind of damage.
    pub armor: i32,
    /// Whether the creature is imaginary.
    pub hallucination: bool,
    /// Whether the creature is riding a vehicle.
    pub in_vehicle: bool,
    /// Active effects and their remaining duration.
    pub effects: HashMap<Effect, u32>,
    /// Character stats; monsters have none.
    pub stats: Option<CharacterStats>,
    /// Remaining action points.
    pub moves: i32,
    /// Driving practice gained so far.
    pub driving_practice: i32,
    /// Times the creature bled.
    pub bleeding: u32,
}

impl Critter {
    /// An average human character.
    #[must_use]
    pub fn human(name: &str, kind: CreatureKind, pos: IVec3) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            pos,
            weight_kg: 80.0,
            speed: 100,
            hp_max: 84,
            hp: 84,
            armor: 0,
            hallucination: false,
            in_vehicle: false,
            effects: HashMap::new(),
            stats: Some(CharacterStats {
                strength: 8,
                dexterity: 8,
                perception: 8,
                driving: 2,
                deft: false,
                skater: false,
            }),
            moves: 100,
            driving_practice: 0,
            bleeding: 0,
        }
    }

    /// An animal of the given weight.
    #[must_use]
    pub fn animal(name: &str, pos: IVec3, weight_kg: f64, speed: i32) -> Self {
        Self {
            kind: CreatureKind::Monster,
            weight_kg,
            speed,
            hp_max: 60,
            hp: 60,
            stats: None,
            ..Self::human(name, CreatureKind::Monster, pos)
        }
    }

    /// Whether the creature has died.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

/// Every creature in the sandbox, indexed by id.
///
/// The player sees tiles within `sight_range`.
#[derive(Clone, Debug)]
pub struct Roster {
    critters: HashMap<CreatureId, Critter>,
    next_id: u32,
    player: Option<CreatureId>,
    known_traps: HashSet<IVec3>,
    /// How far the player can see, in tiles.
    pub sight_range: i32,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            critters: HashMap::new(),
            next_id: 1,
            player: None,
            known_traps: HashSet::new(),
            sight_range: 60,
        }
    }
}

impl Roster {
    /// Empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a creature; a [`CreatureKind::Player`] becomes the player.
    pub fn spawn(&mut self, critter: Critter) -> CreatureId {
        let id = CreatureId(self.next_id);
        self.next_id += 1;
        if critter.kind == CreatureKind::Player {
            self.player = Some(id);
        }
        self.critters.insert(id, critter);
        id
    }

    /// Creature with `id`.
    #[must_use]
    pub fn get(&self, id: CreatureId) -> Option<&Critter> {
        self.critters.get(&id)
    }

    /// Mutable access to the creature with `id`.
    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Critter> {
        self.critters.get_mut(&id)
    }

    /// Number of creatures, dead or alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.critters.len()
    }

    /// Whether there are no creatures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.critters.is_empty()
    }

    fn hurt(&mut self, id: CreatureId, amount: i32) {
        let Some(critter) = self.critters.get_mut(&id) else {
            return;
        };
        critter.hp -= amount.max(0);
        if critter.is_dead() {
            debug!("{} died", critter.name);
        }
    }
}

impl Creatures for Roster {
    fn critter_at(&self, p: IVec3) -> Option<CreatureId> {
        let mut found: Vec<CreatureId> = self
            .critters
            .iter()
            .filter(|(_, c)| c.pos == p && !c.is_dead())
            .map(|(&id, _)| id)
            .collect();
        found.sort_unstable();
        found.first().copied()
    }

    fn kind(&self, id: CreatureId) -> CreatureKind {
        self.get(id).map_or(CreatureKind::Monster, |c| c.kind)
    }

    fn name(&self, id: CreatureId) -> String {
        self.get(id).map_or_else(|| String::from("something"), |c| c.name.clone())
    }

    fn position(&self, id: CreatureId) -> IVec3 {
        self.get(id).map_or(IVec3::ZERO, |c| c.pos)
    }

    fn set_position(&mut self, id: CreatureId, p: IVec3) {
        if let Some(c) = self.get_mut(id) {
            c.pos = p;
        }
    }

    fn weight_kg(&self, id: CreatureId) -> f64 {
        self.get(id).map_or(0.0, |c| c.weight_kg)
    }

    fn speed(&self, id: CreatureId) -> i32 {
        self.get(id).map_or(0, |c| c.speed)
    }

    fn hp_max(&self, id: CreatureId) -> i32 {
        self.get(id).map_or(0, |c| c.hp_max)
    }

    fn is_dead(&self, id: CreatureId) -> bool {
        self.get(id).is_none_or(Critter::is_dead)
    }

    fn is_hallucination(&self, id: CreatureId) -> bool {
        self.get(id).is_some_and(|c| c.hallucination)
    }

    fn in_vehicle(&self, id: CreatureId) -> bool {
        self.get(id).is_some_and(|c| c.in_vehicle)
    }

    fn set_in_vehicle(&mut self, id: CreatureId, riding: bool) {
        if let Some(c) = self.get_mut(id) {
            c.in_vehicle = riding;
        }
    }

    fn armor(&self, id: CreatureId, _part: BodyPart, _kind: DamageKind) -> i32 {
        self.get(id).map_or(0, |c| c.armor)
    }

    fn apply_damage(&mut self, id: CreatureId, _part: BodyPart, amount: i32) {
        self.hurt(id, amount);
    }

    fn hurt_all(&mut self, id: CreatureId, amount: i32) {
        self.hurt(id, amount);
    }

    fn add_effect(&mut self, id: CreatureId, effect: Effect, duration: u32) {
        if let Some(c) = self.get_mut(id) {
            let left = c.effects.entry(effect).or_insert(0);
            *left = (*left).max(duration);
        }
    }

    fn has_effect(&self, id: CreatureId, effect: Effect) -> bool {
        self.get(id).is_some_and(|c| c.effects.contains_key(&effect))
    }

    fn bleed(&mut self, id: CreatureId) {
        if let Some(c) = self.get_mut(id) {
            c.bleeding += 1;
        }
    }

    fn fling(&mut self, id: CreatureId, angle_deg: f64, force: f64) {
        let Some(c) = self.get_mut(id) else {
            return;
        };
        let tiles = (force * FLING_TILES_PER_FORCE).clamp(1.0, MAX_FLING_TILES);
        let offset: DVec2 = angle_to_vec(angle_deg) * tiles;
        c.pos.x += round_to_i32(offset.x);
        c.pos.y += round_to_i32(offset.y);
        debug!("{} flung {tiles:.1} tiles to {}", c.name, c.pos);
    }

    fn stats(&self, id: CreatureId) -> Option<CharacterStats> {
        self.get(id).and_then(|c| c.stats)
    }

    fn practice_driving(&mut self, id: CreatureId, amount: i32) {
        if let Some(c) = self.get_mut(id) {
            c.driving_practice += amount;
        }
    }

    fn moves(&self, id: CreatureId) -> i32 {
        self.get(id).map_or(0, |c| c.moves)
    }

    fn set_moves(&mut self, id: CreatureId, moves: i32) {
        if let Some(c) = self.get_mut(id) {
            c.moves = moves;
        }
    }

    fn player(&self) -> Option<CreatureId> {
        self.player
    }

    fn player_sees(&self, p: IVec3) -> bool {
        let Some(player) = self.player.and_then(|id| self.get(id)) else {
            return false;
        };
        let d = (p - player.pos).abs();
        d.z == 0 && d.x.max(d.y) <= self.sight_range
    }

    fn player_knows_trap(&self, p: IVec3) -> bool {
        self.known_traps.contains(&p)
    }

    fn player_learn_trap(&mut self, p: IVec3) {
        self.known_traps.insert(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_player_spawned_is_the_player() {
        let mut roster = Roster::new();
        let dog = roster.spawn(Critter::animal("dog", IVec3::ZERO, 30.0, 150));
        let you = roster.spawn(Critter::human("you", CreatureKind::Player, IVec3::X));
        assert_eq!(roster.player(), Some(you));
        assert_eq!(roster.critter_at(IVec3::ZERO), Some(dog));
        assert!(roster.stats(dog).is_none());
    }

    #[test]
    fn fling_moves_along_the_angle() {
        let mut roster = Roster::new();
        let who = roster.spawn(Critter::human("bob", CreatureKind::Npc, IVec3::new(5, 5, 0)));
        roster.fling(who, 90.0, 30.0);
        assert_eq!(roster.position(who), IVec3::new(5, 8, 0));
    }

    #[test]
    fn dead_creatures_are_not_found() {
        let mut roster = Roster::new();
        let who = roster.spawn(Critter::human("bob", CreatureKind::Npc, IVec3::ZERO));
        roster.hurt_all(who, 1000);
        assert!(roster.is_dead(who));
        assert!(roster.critter_at(IVec3::ZERO).is_none());
    }
}
