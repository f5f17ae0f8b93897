//! Utility helpers for tests.
//!
//! [`Harness`] owns a sandbox map, roster, message log and seeded random
//! source and lends them out as a [`trundle::World`]. The free functions
//! build the prefab vehicles at a position and in motion.

mod harness;

use glam::IVec3;
use mockall::mock;
use trundle::messages::{MessageSink, MsgKind, SoundKind};
use trundle::sandbox::prefabs;
use trundle::vehicle::{Vehicle, VehicleId};

pub use harness::{Harness, DEFAULT_SEED};

mock! {
    /// Message sink with expectations.
    pub Sink {}

    impl MessageSink for Sink {
        fn add_msg(&mut self, kind: MsgKind, text: String);
        fn sound(&mut self, p: IVec3, volume: i32, kind: SoundKind, description: &str);
    }
}

/// The prefab car at `(x, y, 0)` with id 1.
///
/// # Panics
/// Panics if the built-in part catalogue is broken.
///
/// # Examples
/// ```
/// let car = test_utils::car(4, 5);
/// assert_eq!(car.pos, glam::IVec3::new(4, 5, 0));
/// ```
pub fn car(x: i32, y: i32) -> Vehicle {
    prefabs::car(VehicleId(1), IVec3::new(x, y, 0)).expect("built-in car")
}

/// The prefab bicycle at `(x, y, 0)` with id 1.
///
/// # Panics
/// Panics if the built-in part catalogue is broken.
pub fn bicycle(x: i32, y: i32) -> Vehicle {
    prefabs::bicycle(VehicleId(1), IVec3::new(x, y, 0)).expect("built-in bicycle")
}

/// The prefab rail cart at `(x, y, 0)` with id 1.
///
/// # Panics
/// Panics if the built-in part catalogue is broken.
pub fn rail_cart(x: i32, y: i32) -> Vehicle {
    prefabs::rail_cart(VehicleId(1), IVec3::new(x, y, 0)).expect("built-in rail cart")
}

/// The prefab boat at `(x, y, 0)` with id 1.
///
/// # Panics
/// Panics if the built-in part catalogue is broken.
pub fn boat(x: i32, y: i32) -> Vehicle {
    prefabs::boat(VehicleId(1), IVec3::new(x, y, 0)).expect("built-in boat")
}

/// The prefab helicopter at `p` with id 1.
///
/// # Panics
/// Panics if the built-in part catalogue is broken.
pub fn helicopter(p: IVec3) -> Vehicle {
    prefabs::helicopter(VehicleId(1), p).expect("built-in helicopter")
}

/// `vehicle` with its engine running, moving at `velocity` along its facing.
pub fn moving(mut vehicle: Vehicle, velocity: i32) -> Vehicle {
    vehicle.engine_on = true;
    vehicle.velocity = velocity;
    vehicle
}

/// `vehicle` renumbered to `id`.
pub fn with_id(mut vehicle: Vehicle, id: u32) -> Vehicle {
    vehicle.id = VehicleId(id);
    vehicle
}
