#![cfg_attr(docsrs, feature(doc_cfg))]
//! Tile-based vehicle movement and collision.
//!
//! Vehicles made of parts drive, skid, fall, float and fly across a tile
//! map, colliding with terrain, creatures and each other. The surrounding
//! game is reached through the [`map::GameMap`], [`creature::Creatures`] and
//! [`messages::MessageSink`] traits; [`sandbox`] provides in-memory versions
//! of all three.
pub mod config;
pub mod constants;
pub mod creature;
pub mod dice;
pub mod fleet;
pub mod logging;
pub mod map;
pub mod messages;
pub mod movement;
pub mod numeric;
pub mod sandbox;
pub mod tileray;
pub mod traps;
pub mod units;
pub mod vector_math;
pub mod vehicle;
pub mod world;

pub use config::{ConfigError, Tuning};
pub use fleet::{Fleet, Surroundings};
pub use logging::init as init_logging;
pub use movement::{ActOutcome, RemovalReason};
pub use vehicle::{Vehicle, VehicleId};
pub use world::World;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use trundle::prelude::*;
    //! ```

    pub use crate::config::Tuning;
    pub use crate::creature::{CreatureId, Creatures};
    pub use crate::fleet::{Fleet, Surroundings};
    pub use crate::map::GameMap;
    pub use crate::messages::{MessageSink, MsgKind};
    pub use crate::movement::{ActOutcome, RemovalReason};
    pub use crate::traps::TrapRegistry;
    pub use crate::vehicle::{Vehicle, VehicleId};
    pub use crate::world::{NoVehicles, World};
}
