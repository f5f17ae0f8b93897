//! Engines, fuel and the side effects of running them.

use log::debug;

use crate::map::FieldKind;
use crate::messages::{MsgKind, SoundKind};
use crate::world::World;

use super::{FuelType, PartFlag, Vehicle};

/// Load above which a combustion engine smokes, in tenths of a percent.
const SMOKE_LOAD: i32 = 800;
/// Highest strain that still counts towards engine wear.
const MAX_STRAIN: i32 = 25;

impl Vehicle {
    /// Working engine parts.
    pub fn engines(&self) -> impl Iterator<Item = usize> + '_ {
        self.parts_with(PartFlag::Engine)
            .filter(move |&e| !self.parts[e].is_broken())
    }

    /// Fuel units left of `fuel`.
    #[must_use]
    pub fn fuel_left(&self, fuel: FuelType) -> f64 {
        self.fuel.get(&fuel).copied().unwrap_or(0.0)
    }

    /// Add `amount` units of `fuel`.
    pub fn refuel(&mut self, fuel: FuelType, amount: f64) {
        *self.fuel.entry(fuel).or_insert(0.0) += amount.max(0.0);
    }

    /// Whether a working engine runs on `fuel`.
    #[must_use]
    pub fn has_engine_type(&self, fuel: FuelType) -> bool {
        self.engines()
            .any(|e| self.parts[e].info().fuel_type == Some(fuel))
    }

    /// Whether engine `e` has what it needs to run.
    ///
    /// Pedals need someone at the controls, a harness needs an animal in it
    /// and everything else needs fuel on board.
    #[must_use]
    pub fn is_engine_fueled(&self, e: usize) -> bool {
        let Some(part) = self.parts.get(e) else {
            return false;
        };
        match part.info().fuel_type {
            None => false,
            Some(FuelType::Muscle) => self
                .riders()
                .iter()
                .any(|&(seat, _)| self.part_with_feature(seat, PartFlag::Controls, true).is_some()),
            Some(FuelType::Animal) => part.occupant.is_some(),
            Some(fuel) => self.fuel_left(fuel) > 0.0,
        }
    }

    /// Burn fuel for one turn at `load` tenths of a percent of full power.
    pub fn consume_fuel(&mut self, load: i32) {
        let demand: Vec<(FuelType, f64)> = self
            .engines()
            .filter(|&e| self.is_engine_fueled(e))
            .filter_map(|e| {
                let info = self.parts[e].info();
                let fuel = info.fuel_type?;
                (!fuel.is_biological())
                    .then_some((fuel, info.fuel_per_turn * f64::from(load) / 1000.0))
            })
            .collect();
        for (fuel, amount) in demand {
            let left = self.fuel_left(fuel);
            self.fuel.insert(fuel, (left - amount).max(0.0));
        }
    }

    /// Engine noise for `load`, and exhaust smoke from hard-working or
    /// damaged combustion engines.
    pub fn noise_and_smoke(&self, load: i32, world: &mut World<'_>) {
        let mut noise = 0.0;
        let load_fraction = f64::from(load.clamp(0, 1000)) / 1000.0;
        for e in self.engines().filter(|&e| self.is_engine_fueled(e)) {
            let part = &self.parts[e];
            let info = part.info();
            let combustion = matches!(info.fuel_type, Some(FuelType::Gasoline | FuelType::Diesel));
            let factor = match info.fuel_type {
                Some(FuelType::Gasoline | FuelType::Diesel) => 1.0,
                Some(FuelType::Battery) => 0.1,
                _ => 0.0,
            };
            noise += factor * (f64::from(info.power_w) / 1000.0).sqrt() * (1.0 + 3.0 * load_fraction);
            let worn = part.hp * 2 < info.durability;
            if combustion && (load >= SMOKE_LOAD || worn) {
                world.map.add_field(self.global_part_pos(e), FieldKind::Smoke, 1, 10);
            }
        }
        let volume = crate::numeric::round_to_i32(noise);
        debug!("{} engine noise {volume} at load {load}", self.name);
        if volume <= 0 {
            return;
        }
        let description = match volume {
            0..=4 => "hmm",
            5..=14 => "hummm!",
            15..=29 => "whirrr!",
            30..=59 => "vroom!",
            60..=89 => "VROOM!",
            _ => "VRRROOOOOM!",
        };
        world.sound(self.pos, volume, SoundKind::Movement, description);
    }

    /// Wear on engine `e` from running under `strain`.
    ///
    /// Biological engines never wear.
    pub fn do_engine_damage(&mut self, e: usize, strain: i32, world: &mut World<'_>) {
        let strain = strain.min(MAX_STRAIN);
        let Some(part) = self.parts.get(e) else {
            return;
        };
        if part.info().fuel_type.is_some_and(FuelType::is_biological) || !self.is_engine_fueled(e) {
            return;
        }
        if strain <= 0 || world.roll(1, 100) >= strain {
            return;
        }
        let dmg = world.roll(strain * 2, strain * 4);
        self.damage_direct(e, dmg, world);
        let text = if world.one_in(2) {
            "Your engine emits a high pitched whine."
        } else {
            "Your engine emits a loud grinding sound."
        };
        world.msg(MsgKind::Bad, text);
    }
}
