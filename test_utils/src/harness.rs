//! A sandbox world that lends its collaborators to vehicle operations.

use glam::IVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trundle::creature::{CreatureId, CreatureKind};
use trundle::fleet::Surroundings;
use trundle::sandbox::{Critter, MessageLog, Roster, TileMap};
use trundle::traps::TrapRegistry;
use trundle::vehicle::{PartFlag, Vehicle};
use trundle::world::{NoVehicles, VehicleLookup, World};
use trundle::Tuning;

/// Seed used when a test does not pick one.
pub const DEFAULT_SEED: u64 = 0x7275_6e64;

/// Owns everything a [`World`] borrows.
pub struct Harness {
    /// Tile map.
    pub map: TileMap,
    /// Creature roster.
    pub roster: Roster,
    /// Recorded messages and sounds.
    pub log: MessageLog,
    /// Seeded random source.
    pub rng: ChaCha8Rng,
    /// Handling constants.
    pub tuning: Tuning,
    /// Trap definitions.
    pub traps: TrapRegistry,
}

impl Harness {
    /// Single-level `width` by `height` sandbox with the built-in traps.
    ///
    /// # Examples
    /// ```
    /// use test_utils::Harness;
    /// let mut harness = Harness::new(10, 10);
    /// let world = harness.world();
    /// assert!(world.impacts().is_empty());
    /// ```
    pub fn new(width: i32, height: i32) -> Self {
        Self::from_map(TileMap::new(width, height))
    }

    /// Sandbox spanning z-levels `min_z..=max_z`.
    pub fn with_levels(width: i32, height: i32, min_z: i32, max_z: i32) -> Self {
        Self::from_map(TileMap::with_levels(width, height, min_z, max_z))
    }

    /// Sandbox around an existing map.
    pub fn from_map(map: TileMap) -> Self {
        Self {
            map,
            roster: Roster::new(),
            log: MessageLog::new(),
            rng: ChaCha8Rng::seed_from_u64(DEFAULT_SEED),
            tuning: Tuning::default(),
            traps: TrapRegistry::builtin().clone(),
        }
    }

    /// Reseed the random source.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// World with no other vehicles in it.
    pub fn world(&mut self) -> World<'_> {
        self.world_with(&NoVehicles)
    }

    /// World in which `vehicles` are visible.
    pub fn world_with<'a>(&'a mut self, vehicles: &'a dyn VehicleLookup) -> World<'a> {
        World::new(
            &mut self.map,
            &mut self.roster,
            &mut self.log,
            &mut self.rng,
            &self.tuning,
            &self.traps,
            vehicles,
        )
    }

    /// Collaborators for driving a [`trundle::Fleet`].
    pub fn surroundings(&mut self) -> Surroundings<'_> {
        Surroundings {
            map: &mut self.map,
            creatures: &mut self.roster,
            messages: &mut self.log,
            rng: &mut self.rng,
            tuning: &self.tuning,
            traps: &self.traps,
        }
    }

    /// Register the tiles `vehicle` covers and seat its riders.
    pub fn place(&mut self, vehicle: &Vehicle) {
        let mut world = self.world();
        vehicle.sync_footprint(&mut world);
    }

    /// Spawn the player and seat them at the vehicle's controls.
    ///
    /// # Panics
    /// Panics if the vehicle has no seat with controls.
    pub fn seat_player(&mut self, vehicle: &mut Vehicle) -> CreatureId {
        self.seat_driver(vehicle, CreatureKind::Player)
    }

    /// Spawn a character of `kind` and seat them at the vehicle's controls.
    ///
    /// # Panics
    /// Panics if the vehicle has no free seat with controls.
    pub fn seat_driver(&mut self, vehicle: &mut Vehicle, kind: CreatureKind) -> CreatureId {
        let name = if kind == CreatureKind::Player { "you" } else { "Ada" };
        let who = self.roster.spawn(Critter::human(name, kind, vehicle.pos));
        let seat = vehicle
            .parts_with(PartFlag::Seat)
            .find(|&seat| vehicle.part_with_feature(seat, PartFlag::Controls, true).is_some())
            .expect("vehicle has a driver's seat");
        assert!(vehicle.board(seat, who, &mut self.roster), "seat was free");
        who
    }

    /// Spawn a creature standing at `p`.
    pub fn spawn(&mut self, critter: Critter) -> CreatureId {
        self.roster.spawn(critter)
    }

    /// Spawn an adult human bystander at `p`.
    pub fn bystander(&mut self, p: IVec3) -> CreatureId {
        self.roster.spawn(Critter::human("bystander", CreatureKind::Npc, p))
    }

    /// Whether any recorded message contains `needle`.
    pub fn said(&self, needle: &str) -> bool {
        self.log.contains(needle)
    }
}
