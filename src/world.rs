//! Shared context handed to vehicle operations.
//!
//! A [`World`] bundles mutable borrows of every collaborator a vehicle touches
//! while it moves: the tile map, the creature roster, the message sink and the
//! random source. Other vehicles are visible read-only through
//! [`VehicleLookup`]; changes to them are queued as [`VehicleImpact`]s and
//! applied by the owner of those vehicles once the active vehicle is done.

use glam::IVec3;
use hashbrown::HashMap;
use rand::RngCore;

use crate::config::Tuning;
use crate::creature::Creatures;
use crate::dice;
use crate::map::GameMap;
use crate::messages::{MessageSink, MsgKind, SoundKind};
use crate::traps::TrapRegistry;
use crate::vehicle::{Vehicle, VehicleId};

/// Read-only access to vehicles other than the one being moved.
pub trait VehicleLookup {
    /// Vehicle with `id`, if it exists and is not the one currently acting.
    fn vehicle(&self, id: VehicleId) -> Option<&Vehicle>;
}

/// Lookup for worlds containing a single vehicle.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoVehicles;

impl VehicleLookup for NoVehicles {
    fn vehicle(&self, _id: VehicleId) -> Option<&Vehicle> {
        None
    }
}

impl<S: std::hash::BuildHasher> VehicleLookup for HashMap<VehicleId, Vehicle, S> {
    fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.get(&id)
    }
}

/// Outcome of a vehicle-vehicle collision for the vehicle that was hit.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleImpact {
    /// Vehicle that was hit.
    pub target: VehicleId,
    /// Parts of the target that took the blow.
    pub parts: Vec<usize>,
    /// Forward velocity after the collision, in vmiph.
    pub velocity: i32,
    /// Heading of the target's movement after the collision.
    pub move_dir: f64,
    /// Turn budget granted so the target gets to move away first.
    pub of_turn: f64,
    /// Whether the target was knocked into a skid.
    pub skidding: bool,
    /// Damage dealt to each struck part.
    pub damage: i32,
}

/// Collaborators borrowed for the duration of one vehicle operation.
pub struct World<'a> {
    /// Tile map.
    pub map: &'a mut dyn GameMap,
    /// Creature roster.
    pub creatures: &'a mut dyn Creatures,
    /// Player notifications.
    pub messages: &'a mut dyn MessageSink,
    /// Random source for every roll.
    pub rng: &'a mut dyn RngCore,
    /// Handling constants.
    pub tuning: &'a Tuning,
    /// Trap definitions.
    pub traps: &'a TrapRegistry,
    /// Every other vehicle.
    pub vehicles: &'a dyn VehicleLookup,
    impacts: Vec<VehicleImpact>,
}

impl<'a> World<'a> {
    /// Assemble a world from its collaborators.
    pub fn new(
        map: &'a mut dyn GameMap,
        creatures: &'a mut dyn Creatures,
        messages: &'a mut dyn MessageSink,
        rng: &'a mut dyn RngCore,
        tuning: &'a Tuning,
        traps: &'a TrapRegistry,
        vehicles: &'a dyn VehicleLookup,
    ) -> Self {
        Self {
            map,
            creatures,
            messages,
            rng,
            tuning,
            traps,
            vehicles,
            impacts: Vec::new(),
        }
    }

    /// Uniform roll in `lo..=hi`.
    pub fn roll(&mut self, lo: i32, hi: i32) -> i32 {
        dice::rng(self.rng, lo, hi)
    }

    /// Uniform float roll.
    pub fn roll_float(&mut self, lo: f64, hi: f64) -> f64 {
        dice::rng_float(self.rng, lo, hi)
    }

    /// `true` with probability `1 / chance`.
    pub fn one_in(&mut self, chance: u32) -> bool {
        dice::one_in(self.rng, chance)
    }

    /// Sum of `count` rolls of a `sides`-sided die.
    pub fn dice(&mut self, count: u32, sides: i32) -> i32 {
        dice::dice(self.rng, count, sides)
    }

    /// Random sign.
    pub fn random_sign(&mut self) -> i32 {
        dice::random_sign(self.rng)
    }

    /// Show a message to the player.
    pub fn msg(&mut self, kind: MsgKind, text: impl Into<String>) {
        self.messages.add_msg(kind, text.into());
    }

    /// Emit a sound.
    pub fn sound(&mut self, p: IVec3, volume: i32, kind: SoundKind, description: &str) {
        self.messages.sound(p, volume, kind, description);
    }

    /// Queue a collision outcome for another vehicle.
    pub fn push_impact(&mut self, impact: VehicleImpact) {
        self.impacts.push(impact);
    }

    /// Collision outcomes queued so far, oldest first.
    #[must_use]
    pub fn impacts(&self) -> &[VehicleImpact] {
        &self.impacts
    }

    /// Drain the queued collision outcomes.
    pub fn take_impacts(&mut self) -> Vec<VehicleImpact> {
        std::mem::take(&mut self.impacts)
    }
}
