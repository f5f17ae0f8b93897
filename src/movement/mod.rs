//! Per-turn vehicle movement.
//!
//! The submodules extend [`Vehicle`](crate::vehicle::Vehicle) with the
//! operations a turn is made of: drag and traction queries, throttle and
//! steering, collision resolution against terrain, creatures and other
//! vehicles, rail following, ramps between z-levels, occupant shake and
//! traps. [`Vehicle::act_on_map`](crate::vehicle::Vehicle::act_on_map) ties
//! them together for a single step.

mod act;
mod collision;
mod control;
mod displace;
mod drag;
mod occupants;
mod rails;
mod ramps;
mod thrust;
mod traction;
mod trap;

pub use collision::{get_collision_factor, Collision, CollisionKind};
pub use control::Steering;
pub use rails::{is_on_rails, process_movement_on_rails, RailAction};
pub use traction::vehicle_wheel_traction;

/// Why a vehicle left the simulation during its step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    /// The vehicle drove off the loaded region.
    OutOfBounds,
    /// A summoned vehicle ran out of time.
    Despawned,
    /// The vehicle floated without buoyancy and went under.
    Sank,
    /// Every part was destroyed.
    Wrecked,
}

/// Result of [`Vehicle::act_on_map`](crate::vehicle::Vehicle::act_on_map).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActOutcome {
    /// The vehicle is still on the map.
    Continue,
    /// The vehicle must be dropped by its owner.
    Removed(RemovalReason),
}

impl ActOutcome {
    /// Whether the vehicle was removed.
    #[must_use]
    pub const fn is_removed(self) -> bool {
        matches!(self, Self::Removed(_))
    }
}
