//! Part definitions and installed part state.
//!
//! [`PartInfo`] is static catalogue data shared between every installed copy
//! of a part through an [`Arc`]. [`VehiclePart`] is the per-vehicle state:
//! mount position, precalculated offsets, hit points and occupant.

use std::path::Path;
use std::sync::Arc;

use glam::{IVec2, IVec3};
use hashbrown::HashMap;
use log::error;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::{parse_json, read_file, ConfigError};
use crate::creature::CreatureId;
use crate::map::TerrainFlag;

/// Feature flags a part may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartFlag {
    /// Touches the ground and provides traction.
    Wheel,
    /// A wheel that runs on rail track.
    Rail,
    /// Converts fuel into motive power.
    Engine,
    /// Absorbs impacts before the structure underneath.
    Armor,
    /// Steering wheel, handlebars or similar.
    Controls,
    /// Somewhere to sit.
    Seat,
    /// Keeps the rider in the seat during a crash.
    Seatbelt,
    /// Seat that needs active balance, like a bicycle saddle.
    SeatRequiresBalance,
    /// A creature can occupy the tile.
    Boardable,
    /// Sticks out past the frame and passes over short terrain.
    Protrusion,
    /// Cuts whatever it hits.
    Sharp,
    /// Provides buoyancy.
    Floats,
    /// Turns the vehicle.
    Steerable,
    /// Keeps a single-wheeled vehicle upright.
    Stable,
}

/// Where on a tile a part is installed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartLocation {
    /// The frame; every tile of a vehicle has exactly one.
    Structure,
    /// Plating bolted over the frame.
    Armor,
    /// Anything else.
    #[default]
    Other,
}

/// Fuel an engine runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    /// Petrol for combustion engines.
    Gasoline,
    /// Diesel for combustion engines.
    Diesel,
    /// Electric motors; they reverse at full power.
    Battery,
    /// Pedals and cranks worked by the driver.
    Muscle,
    /// Harnessed draught animals.
    Animal,
}

impl FuelType {
    /// Whether the fuel is the body of a living creature.
    #[must_use]
    pub const fn is_biological(self) -> bool {
        matches!(self, Self::Muscle | Self::Animal)
    }
}

/// Extra movement cost a wheel suffers on terrain lacking `flag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMod {
    /// Terrain flag the wheel is designed for.
    pub flag: TerrainFlag,
    /// Movement cost added elsewhere.
    pub penalty: i32,
}

fn full_damage() -> i32 {
    100
}

/// Catalogue entry describing a kind of vehicle part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartInfo {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Installation slot.
    #[serde(default)]
    pub location: PartLocation,
    /// Mass in kilograms.
    pub mass_kg: f64,
    /// Hit points when undamaged.
    pub durability: i32,
    /// Feature flags.
    #[serde(default)]
    pub flags: Vec<PartFlag>,
    /// Collision damage modifier in percent.
    #[serde(default = "full_damage")]
    pub dmg_mod: i32,
    /// Density of the part material in g/cm³ scaled like terrain bash values.
    #[serde(default)]
    pub density: f64,
    /// Tyre width in inches.
    #[serde(default)]
    pub wheel_width: i32,
    /// Tyre diameter in inches.
    #[serde(default)]
    pub wheel_diameter: i32,
    /// Rolling resistance coefficient of a wheel.
    #[serde(default)]
    pub rolling_resistance: f64,
    /// Terrain penalties for wheels.
    #[serde(default)]
    pub wheel_terrain_mod: Vec<TerrainMod>,
    /// Engine output in watts.
    #[serde(default)]
    pub power_w: i32,
    /// Fuel consumed by an engine.
    #[serde(default)]
    pub fuel_type: Option<FuelType>,
    /// Fuel units burnt per turn at full load.
    #[serde(default)]
    pub fuel_per_turn: f64,
    /// Rotor diameter in metres; zero for everything but rotors.
    #[serde(default)]
    pub rotor_diameter: f64,
    /// Mass this part keeps afloat, in kilograms.
    #[serde(default)]
    pub buoyancy_kg: f64,
    /// Drag added while rolling, in vmiph per turn.
    #[serde(default)]
    pub drag: i32,
}

impl PartInfo {
    /// Whether the part carries `flag`.
    #[must_use]
    pub fn has_flag(&self, flag: PartFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Contact area of a wheel in square inches.
    #[must_use]
    pub const fn wheel_area(&self) -> i32 {
        self.wheel_width * self.wheel_diameter
    }

    /// Whether the part is a rotor.
    #[must_use]
    pub fn is_rotor(&self) -> bool {
        self.rotor_diameter > 0.0
    }
}

/// Part definitions indexed by id.
#[derive(Clone, Debug, Default)]
pub struct PartCatalog {
    parts: HashMap<String, Arc<PartInfo>>,
}

static BUILTIN: Lazy<PartCatalog> = Lazy::new(|| {
    PartCatalog::from_json_str(include_str!("../../data/parts.json")).unwrap_or_else(|err| {
        error!("built-in part data is invalid: {err}");
        PartCatalog::default()
    })
});

impl PartCatalog {
    /// Parts shipped with the crate.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Parse a JSON array of part definitions.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for duplicate ids or impossible values.
    ///
    /// # Examples
    /// ```
    /// use trundle::vehicle::PartCatalog;
    /// let catalog = PartCatalog::from_json_str(
    ///     r#"[{ "id": "frame", "name": "frame", "location": "structure",
    ///          "mass_kg": 50.0, "durability": 400 }]"#,
    /// ).unwrap();
    /// assert_eq!(catalog.get("frame").unwrap().durability, 400);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let defs: Vec<PartInfo> = parse_json(text, "parts")?;
        let mut parts = HashMap::with_capacity(defs.len());
        for def in defs {
            if def.durability <= 0 || !def.mass_kg.is_finite() || def.mass_kg < 0.0 {
                return Err(ConfigError::invalid(
                    "parts",
                    format!("{} needs positive durability and mass", def.id),
                ));
            }
            if def.dmg_mod < 0 {
                return Err(ConfigError::invalid(
                    "parts",
                    format!("{} has a negative damage modifier", def.id),
                ));
            }
            if parts.contains_key(&def.id) {
                return Err(ConfigError::invalid(
                    "parts",
                    format!("duplicate part id {}", def.id),
                ));
            }
            parts.insert(def.id.clone(), Arc::new(def));
        }
        Ok(Self { parts })
    }

    /// Load part definitions from a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_file(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Definition for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<PartInfo>> {
        self.parts.get(id).cloned()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// A part installed on a vehicle.
#[derive(Clone, Debug, PartialEq)]
pub struct VehiclePart {
    info: Arc<PartInfo>,
    /// Position in the vehicle's own grid; x runs forward and y to the right.
    pub mount: IVec2,
    /// Offsets from the pivot for the current (0) and proposed (1) facing.
    pub precalc: [IVec3; 2],
    /// Remaining hit points.
    pub hp: i32,
    /// Destroyed this turn and waiting for cleanup.
    pub removed: bool,
    /// Rider or harnessed animal.
    pub occupant: Option<CreatureId>,
    /// Accumulated gore.
    pub blood: i32,
}

impl VehiclePart {
    /// Install a fresh copy of `info` at `mount`.
    #[must_use]
    pub fn new(info: Arc<PartInfo>, mount: IVec2) -> Self {
        let hp = info.durability;
        let offset = mount.extend(0);
        Self {
            info,
            mount,
            precalc: [offset, offset],
            hp,
            removed: false,
            occupant: None,
            blood: 0,
        }
    }

    /// Static definition of the part.
    #[must_use]
    pub fn info(&self) -> &PartInfo {
        &self.info
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Whether the definition carries `flag`.
    #[must_use]
    pub fn has_flag(&self, flag: PartFlag) -> bool {
        self.info.has_flag(flag)
    }

    /// Whether the part has no hit points left.
    #[must_use]
    pub const fn is_broken(&self) -> bool {
        self.hp <= 0
    }

    /// Whether the part is present and working.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !self.removed && !self.is_broken()
    }

    /// Whether this is the frame of its tile.
    #[must_use]
    pub fn is_structure(&self) -> bool {
        self.info.location == PartLocation::Structure
    }

    /// Whether this is a wheel, working or not.
    #[must_use]
    pub fn is_wheel(&self) -> bool {
        self.has_flag(PartFlag::Wheel)
    }

    /// Contact area of a wheel in square inches.
    #[must_use]
    pub fn wheel_area(&self) -> i32 {
        self.info.wheel_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_core_parts() {
        let catalog = PartCatalog::builtin();
        for id in ["frame", "wheel", "seat", "engine_v6", "controls"] {
            assert!(catalog.get(id).is_some(), "missing {id}");
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = r#"[
            { "id": "a", "name": "a", "mass_kg": 1.0, "durability": 1 },
            { "id": "a", "name": "a", "mass_kg": 1.0, "durability": 1 }
        ]"#;
        assert!(matches!(
            PartCatalog::from_json_str(text),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn fresh_parts_start_undamaged() {
        let info = PartCatalog::builtin().get("wheel").unwrap();
        let part = VehiclePart::new(info.clone(), IVec2::new(1, -1));
        assert_eq!(part.hp, info.durability);
        assert_eq!(part.precalc[0], IVec3::new(1, -1, 0));
        assert!(part.is_wheel());
        assert!(part.wheel_area() > 0);
    }
}
