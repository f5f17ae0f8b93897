//! Trap definitions and their effect on vehicles.
//!
//! Traps are loaded from JSON into a [`TrapRegistry`], which maps each string
//! id onto a dense [`TrapId`]. References between traps (a trap that turns into
//! another once triggered) are resolved by [`TrapRegistry::finalize`] after all
//! definitions are known. The registry is read-only afterwards and is passed
//! by reference to the movement code.

use hashbrown::HashMap;
use log::error;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::config::{parse_json, read_file, ConfigError};

/// Dense handle into a [`TrapRegistry`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrapId(pub u16);

impl TrapId {
    /// The empty trap present on every tile without a real one.
    pub const NULL: Self = Self(0);

    /// Whether this is [`Self::NULL`].
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Item dropped when a vehicle triggers a trap.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SpawnEntry {
    /// Exactly one item of this kind.
    Always(String),
    /// An item kind with a count or chance; fractions are rolled.
    Weighted {
        /// Item kind.
        id: String,
        /// Expected count.
        chance: f64,
    },
}

impl SpawnEntry {
    /// Item kind and expected count.
    #[must_use]
    pub fn item(&self) -> (&str, f64) {
        match self {
            Self::Always(id) => (id, 1.0),
            Self::Weighted { id, chance } => (id, *chance),
        }
    }
}

fn default_chance() -> i32 {
    100
}

/// How a trap reacts to being driven over.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleTrapData {
    /// Remove the trap once triggered.
    #[serde(default)]
    pub remove_trap: bool,
    /// Explode instead of hitting the wheel.
    #[serde(default)]
    pub do_explosion: bool,
    /// Vehicles pass over this trap untouched.
    #[serde(default)]
    pub is_falling: bool,
    /// Percent chance of triggering.
    #[serde(default = "default_chance")]
    pub chance: i32,
    /// Wheel damage or explosion power.
    #[serde(default)]
    pub damage: i32,
    /// Shrapnel of the explosion.
    #[serde(default)]
    pub shrapnel: i32,
    /// Volume of the trigger sound; zero is silent.
    #[serde(default)]
    pub sound_volume: i32,
    /// Description of the trigger sound.
    #[serde(default)]
    pub sound: String,
    /// Items left behind.
    #[serde(default)]
    pub spawn_items: Vec<SpawnEntry>,
    /// Trap that replaces this one once triggered.
    #[serde(default)]
    pub set_trap: Option<String>,
}

impl Default for VehicleTrapData {
    fn default() -> Self {
        Self {
            remove_trap: false,
            do_explosion: false,
            is_falling: false,
            chance: default_chance(),
            damage: 0,
            shrapnel: 0,
            sound_volume: 0,
            sound: String::new(),
            spawn_items: Vec::new(),
            set_trap: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TrapDef {
    id: String,
    name: String,
    #[serde(default)]
    vehicle_data: Option<VehicleTrapData>,
}

/// A loaded trap.
#[derive(Clone, Debug, PartialEq)]
pub struct Trap {
    /// String id from the data file.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Reaction to vehicles; the default never does anything visible.
    pub vehicle: VehicleTrapData,
    /// Resolved replacement trap.
    pub replacement: Option<TrapId>,
}

/// All known traps indexed by [`TrapId`].
#[derive(Clone, Debug)]
pub struct TrapRegistry {
    traps: Vec<Trap>,
    by_id: HashMap<String, TrapId>,
}

const NULL_TRAP_ID: &str = "tr_null";

static BUILTIN: Lazy<TrapRegistry> = Lazy::new(|| {
    TrapRegistry::from_json_str(include_str!("../data/traps.json")).unwrap_or_else(|err| {
        error!("built-in trap data is invalid: {err}");
        TrapRegistry::empty()
    })
});

impl TrapRegistry {
    /// Registry holding only the null trap.
    #[must_use]
    pub fn empty() -> Self {
        let null = Trap {
            id: NULL_TRAP_ID.to_owned(),
            name: "nothing".to_owned(),
            vehicle: VehicleTrapData::default(),
            replacement: None,
        };
        let mut by_id = HashMap::new();
        by_id.insert(NULL_TRAP_ID.to_owned(), TrapId::NULL);
        Self {
            traps: vec![null],
            by_id,
        }
    }

    /// Traps shipped with the crate.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Parse a JSON array of trap definitions and finalise it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed documents and
    /// [`ConfigError::Invalid`] for duplicate ids, too many traps or
    /// replacements naming unknown traps.
    ///
    /// # Examples
    /// ```
    /// use trundle::traps::TrapRegistry;
    /// let registry = TrapRegistry::from_json_str(
    ///     r#"[{ "id": "tr_glass", "name": "glass",
    ///          "vehicle_data": { "damage": 5, "remove_trap": true } }]"#,
    /// ).unwrap();
    /// let glass = registry.find("tr_glass").unwrap();
    /// assert_eq!(registry.get(glass).vehicle.damage, 5);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let defs: Vec<TrapDef> = parse_json(text, "traps")?;
        let mut registry = Self::empty();
        for def in defs {
            registry.insert(def)?;
        }
        registry.finalize()?;
        Ok(registry)
    }

    /// Load and finalise trap definitions from a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::from_json_str`].
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = read_file(path.as_ref())?;
        Self::from_json_str(&text)
    }

    fn insert(&mut self, def: TrapDef) -> Result<(), ConfigError> {
        if self.by_id.contains_key(&def.id) {
            return Err(ConfigError::invalid(
                "traps",
                format!("duplicate trap id {}", def.id),
            ));
        }
        let index = u16::try_from(self.traps.len())
            .map_err(|_| ConfigError::invalid("traps", "too many traps"))?;
        let mut vehicle = def.vehicle_data.unwrap_or_default();
        if vehicle.set_trap.is_some() {
            vehicle.remove_trap = false;
        }
        self.by_id.insert(def.id.clone(), TrapId(index));
        self.traps.push(Trap {
            id: def.id,
            name: def.name,
            vehicle,
            replacement: None,
        });
        Ok(())
    }

    /// Resolve trap-to-trap references.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first unknown reference.
    pub fn finalize(&mut self) -> Result<(), ConfigError> {
        for index in 0..self.traps.len() {
            let Some(name) = self.traps[index].vehicle.set_trap.clone() else {
                continue;
            };
            let target = self.find(&name).ok_or_else(|| {
                ConfigError::invalid(
                    "traps",
                    format!("{} turns into unknown trap {name}", self.traps[index].id),
                )
            })?;
            self.traps[index].replacement = Some(target);
        }
        Ok(())
    }

    /// Look up a trap by its string id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<TrapId> {
        self.by_id.get(id).copied()
    }

    /// Trap for `id`; unknown ids resolve to the null trap.
    #[must_use]
    pub fn get(&self, id: TrapId) -> &Trap {
        self.traps
            .get(usize::from(id.0))
            .unwrap_or(&self.traps[0])
    }

    /// Number of traps including the null trap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.traps.len()
    }

    /// Whether only the null trap is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traps.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_resolves_replacements() {
        let registry = TrapRegistry::builtin();
        assert!(!registry.is_empty());
        let beartrap = registry.find("tr_beartrap").unwrap();
        assert!(registry.get(beartrap).vehicle.remove_trap);
    }

    #[test]
    fn unknown_replacement_is_invalid() {
        let text = r#"[{ "id": "tr_a", "name": "a", "vehicle_data": { "set_trap": "tr_b" } }]"#;
        assert!(matches!(
            TrapRegistry::from_json_str(text),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn replacement_keeps_the_trap_in_place() {
        let text = r#"[
            { "id": "tr_a", "name": "a", "vehicle_data": { "set_trap": "tr_b", "remove_trap": true } },
            { "id": "tr_b", "name": "b" }
        ]"#;
        let registry = TrapRegistry::from_json_str(text).unwrap();
        let a = registry.get(registry.find("tr_a").unwrap());
        assert!(!a.vehicle.remove_trap);
        assert_eq!(a.replacement, registry.find("tr_b"));
    }

    #[test]
    fn out_of_range_ids_fall_back_to_null() {
        let registry = TrapRegistry::empty();
        assert_eq!(registry.get(TrapId(42)).id, NULL_TRAP_ID);
    }
}
