//! Creatures and characters as seen by the movement systems.
//!
//! Vehicles refer to riders and collision victims by [`CreatureId`] and
//! resolve them through the [`Creatures`] trait on every access, so a creature
//! that dies mid-turn never leaves a dangling reference behind.

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Stable handle for a creature owned by the wider simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

/// Broad category of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatureKind {
    /// The player character.
    Player,
    /// A non-player character with the same stats as the player.
    Npc,
    /// An animal or monster.
    Monster,
}

impl CreatureKind {
    /// Whether the creature has character stats and skills.
    #[must_use]
    pub const fn is_character(self) -> bool {
        matches!(self, Self::Player | Self::Npc)
    }
}

/// Body region targeted by a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyPart {
    /// Chest and abdomen; the default target of vehicle impacts.
    Torso,
    /// Head and neck.
    Head,
    /// Both arms.
    Arms,
    /// Both legs.
    Legs,
}

/// Kind of damage used for armour lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageKind {
    /// Blunt impact.
    Bash,
    /// Edged or spiked impact.
    Cut,
}

/// Status effects applied or queried by vehicle code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Cannot act for the duration.
    Stunned,
    /// Tied into a vehicle harness.
    Harnessed,
    /// Tame and following the player.
    Pet,
}

/// Stats consulted when a character drives or rides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CharacterStats {
    /// Current strength.
    pub strength: i32,
    /// Current dexterity.
    pub dexterity: i32,
    /// Current perception.
    pub perception: i32,
    /// Driving skill level.
    pub driving: i32,
    /// Has the nimble-footed trait.
    pub deft: bool,
    /// Has the skateboarding background.
    pub skater: bool,
}

/// Query and mutation interface onto the creature roster.
pub trait Creatures {
    /// Live creature standing at `p`.
    fn critter_at(&self, p: IVec3) -> Option<CreatureId>;

    /// Category of the creature.
    fn kind(&self, id: CreatureId) -> CreatureKind;

    /// Display name used in messages.
    fn name(&self, id: CreatureId) -> String;

    /// Current tile of the creature.
    fn position(&self, id: CreatureId) -> IVec3;

    /// Move the creature to `p` without any checks.
    fn set_position(&mut self, id: CreatureId, p: IVec3);

    /// Body weight in kilograms.
    fn weight_kg(&self, id: CreatureId) -> f64;

    /// Base speed; 100 is a normal human.
    fn speed(&self, id: CreatureId) -> i32;

    /// Maximum hit points.
    fn hp_max(&self, id: CreatureId) -> i32;

    /// Whether the creature has died.
    fn is_dead(&self, id: CreatureId) -> bool;

    /// Whether the creature only exists in the player's imagination.
    fn is_hallucination(&self, id: CreatureId) -> bool;

    /// Whether a character is riding in some vehicle.
    fn in_vehicle(&self, id: CreatureId) -> bool;

    /// Mark a character as riding or not riding.
    fn set_in_vehicle(&mut self, id: CreatureId, riding: bool);

    /// Armour against `kind` damage on `part`.
    fn armor(&self, id: CreatureId, part: BodyPart, kind: DamageKind) -> i32;

    /// Deal `amount` damage to a single body part.
    fn apply_damage(&mut self, id: CreatureId, part: BodyPart, amount: i32);

    /// Spread `amount` of damage over every body part.
    fn hurt_all(&mut self, id: CreatureId, amount: i32);

    /// Apply `effect` for `duration` turns.
    fn add_effect(&mut self, id: CreatureId, effect: Effect, duration: u32);

    /// Whether `effect` is active.
    fn has_effect(&self, id: CreatureId, effect: Effect) -> bool;

    /// Leave blood at the creature's position.
    fn bleed(&mut self, id: CreatureId);

    /// Throw a creature along `angle_deg` with the given force.
    fn fling(&mut self, id: CreatureId, angle_deg: f64, force: f64);

    /// Character stats; `None` for monsters.
    fn stats(&self, id: CreatureId) -> Option<CharacterStats>;

    /// Grant driving practice.
    fn practice_driving(&mut self, id: CreatureId, amount: i32);

    /// Remaining action points of a character this turn.
    fn moves(&self, id: CreatureId) -> i32;

    /// Overwrite the remaining action points of a character.
    fn set_moves(&mut self, id: CreatureId, moves: i32);

    /// The player character, if one exists.
    fn player(&self) -> Option<CreatureId>;

    /// Whether the player can see `p`.
    fn player_sees(&self, p: IVec3) -> bool;

    /// Whether the player already knows of a trap at `p`.
    fn player_knows_trap(&self, p: IVec3) -> bool;

    /// Record that the player knows about a trap at `p`.
    fn player_learn_trap(&mut self, p: IVec3);
}
