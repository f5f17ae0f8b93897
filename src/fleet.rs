//! Turn scheduling for every vehicle on the map.
//!
//! Each turn every vehicle is granted its movement budget, then the vehicle
//! with the most budget left takes a step, over and over, until nobody can
//! afford one. Only the acting vehicle is borrowed mutably; the rest are
//! visible to it through [`VehicleLookup`](crate::world::VehicleLookup) and
//! collisions with them are applied once the step is over.

use hashbrown::HashMap;
use log::{debug, info, warn};
use rand::RngCore;

use crate::config::Tuning;
use crate::creature::Creatures;
use crate::map::GameMap;
use crate::messages::MessageSink;
use crate::movement::{ActOutcome, RemovalReason};
use crate::traps::TrapRegistry;
use crate::vehicle::{Vehicle, VehicleId};
use crate::world::{VehicleLookup, World};

/// Everything a turn needs apart from the vehicles themselves.
pub struct Surroundings<'a> {
    /// Tile map.
    pub map: &'a mut dyn GameMap,
    /// Creature roster.
    pub creatures: &'a mut dyn Creatures,
    /// Player notifications.
    pub messages: &'a mut dyn MessageSink,
    /// Random source.
    pub rng: &'a mut dyn RngCore,
    /// Handling constants.
    pub tuning: &'a Tuning,
    /// Trap definitions.
    pub traps: &'a TrapRegistry,
}

impl Surroundings<'_> {
    /// Lend the collaborators to a vehicle operation that can see
    /// `vehicles`.
    pub fn world<'b>(&'b mut self, vehicles: &'b dyn VehicleLookup) -> World<'b> {
        World::new(
            &mut *self.map,
            &mut *self.creatures,
            &mut *self.messages,
            &mut *self.rng,
            self.tuning,
            self.traps,
            vehicles,
        )
    }
}

/// Vehicles that left the map during a turn.
pub type Removals = Vec<(VehicleId, RemovalReason)>;

/// Owner of every vehicle on the map.
#[derive(Debug, Default)]
pub struct Fleet {
    vehicles: HashMap<VehicleId, Vehicle>,
}

impl Fleet {
    /// Create an empty fleet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vehicle and register the tiles it covers.
    ///
    /// Returns the vehicle previously stored under the same id.
    pub fn spawn(&mut self, vehicle: Vehicle, env: &mut Surroundings<'_>) -> Option<Vehicle> {
        let id = vehicle.id;
        {
            let mut world = env.world(&self.vehicles);
            vehicle.sync_footprint(&mut world);
        }
        self.vehicles.insert(id, vehicle)
    }

    /// Vehicle with `id`.
    #[must_use]
    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    /// Mutable access to the vehicle with `id`.
    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(&id)
    }

    /// Take a vehicle out of the fleet and off the map.
    pub fn remove(&mut self, id: VehicleId, env: &mut Surroundings<'_>) -> Option<Vehicle> {
        let vehicle = self.vehicles.remove(&id)?;
        env.map.clear_vehicle_footprint(id);
        Some(vehicle)
    }

    /// Number of vehicles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the fleet is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicle ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<VehicleId> {
        let mut ids: Vec<VehicleId> = self.vehicles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Run `op` on vehicle `id` with every other vehicle visible, then apply
    /// any collisions it queued.
    pub fn with_vehicle<R>(
        &mut self,
        id: VehicleId,
        env: &mut Surroundings<'_>,
        op: impl FnOnce(&mut Vehicle, &mut World<'_>) -> R,
    ) -> Option<R> {
        let mut vehicle = self.vehicles.remove(&id)?;
        let (result, impacts) = {
            let mut world = env.world(&self.vehicles);
            let result = op(&mut vehicle, &mut world);
            (result, world.take_impacts())
        };
        for impact in impacts {
            let Some(mut target) = self.vehicles.remove(&impact.target) else {
                warn!("impact queued for missing vehicle {}", impact.target.into_inner());
                continue;
            };
            {
                let mut world = env.world(&self.vehicles);
                target.apply_impact(&impact, &mut world);
            }
            self.vehicles.insert(target.id, target);
        }
        self.vehicles.insert(id, vehicle);
        Some(result)
    }

    /// Run one game turn.
    ///
    /// Returns the vehicles that were removed, in the order they left.
    pub fn turn(&mut self, env: &mut Surroundings<'_>) -> Removals {
        for id in self.ids() {
            self.with_vehicle(id, env, |vehicle, world| vehicle.gain_moves(world));
        }

        let mut removed = Removals::new();
        let mut steps = 0;
        while steps < env.tuning.max_fleet_steps {
            let Some(id) = self.next_to_act() else {
                break;
            };
            steps += 1;
            let outcome = self.with_vehicle(id, env, |vehicle, world| vehicle.act_on_map(world));
            if let Some(ActOutcome::Removed(reason)) = outcome {
                info!("vehicle {} removed: {reason:?}", id.into_inner());
                if let Some(mut gone) = self.vehicles.remove(&id) {
                    gone.unboard_all(env.creatures);
                }
                env.map.clear_vehicle_footprint(id);
                removed.push((id, reason));
            }
        }
        if steps >= env.tuning.max_fleet_steps {
            debug!("fleet turn stopped after {steps} steps");
        }

        for id in self.ids() {
            let changed = self
                .vehicles
                .get_mut(&id)
                .is_some_and(Vehicle::cleanup_removed_parts);
            if !changed {
                continue;
            }
            if self.vehicles.get(&id).is_some_and(Vehicle::is_wrecked) {
                self.vehicles.remove(&id);
                env.map.clear_vehicle_footprint(id);
                removed.push((id, RemovalReason::Wrecked));
            } else {
                self.with_vehicle(id, env, |vehicle, world| vehicle.sync_footprint(world));
            }
        }
        removed
    }

    /// Vehicle with the most turn budget left, or failing that one that is
    /// falling or changing altitude.
    fn next_to_act(&self) -> Option<VehicleId> {
        let mut best: Option<(VehicleId, f64)> = None;
        for id in self.ids() {
            let Some(vehicle) = self.vehicles.get(&id) else {
                continue;
            };
            if vehicle.of_turn <= 0.0 {
                continue;
            }
            if best.is_none_or(|(_, of_turn)| vehicle.of_turn > of_turn) {
                best = Some((id, vehicle.of_turn));
            }
        }
        if let Some((id, _)) = best {
            return Some(id);
        }
        self.ids().into_iter().find(|id| {
            self.vehicles.get(id).is_some_and(|vehicle| {
                vehicle.is_falling() || (vehicle.is_rotorcraft() && vehicle.requested_z_change != 0)
            })
        })
    }
}

impl VehicleLookup for Fleet {
    fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }
}
