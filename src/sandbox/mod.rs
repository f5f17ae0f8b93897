//! In-memory collaborators for running vehicles without a game around them.
//!
//! [`TileMap`], [`Roster`] and [`MessageLog`] implement the map, creature and
//! message traits with plain collections. They back the demo binary and the
//! test harness; a real game supplies its own implementations.

mod message_log;
pub mod prefabs;
mod roster;
mod tile_map;

pub use message_log::{MessageLog, Sound};
pub use roster::{Critter, Roster};
pub use tile_map::{Field, Furniture, Terrain, TileMap};
