//! Ready-made vehicles built from the built-in part catalogue.
//!
//! Mount x grows towards the front of the vehicle and y towards its right
//! side; a vehicle facing east has its front at the highest x.

use glam::{IVec2, IVec3};

use crate::config::ConfigError;
use crate::vehicle::{FuelType, PartCatalog, Vehicle, VehicleId};

/// Fuel put in every prefab tank.
const FULL_TANK: f64 = 10_000.0;

fn m(x: i32, y: i32) -> IVec2 {
    IVec2::new(x, y)
}

fn build(id: VehicleId, name: &str, pos: IVec3, layout: &[(IVec2, &str)]) -> Result<Vehicle, ConfigError> {
    Vehicle::from_layout(id, name, pos, PartCatalog::builtin(), layout)
}

/// Three-by-two car with a V6, steerable front wheels and one seat.
///
/// # Errors
/// Fails only if the built-in part catalogue lacks a part used here.
///
/// # Examples
/// ```
/// use trundle::sandbox::prefabs;
/// use trundle::vehicle::VehicleId;
/// let car = prefabs::car(VehicleId(1), glam::IVec3::ZERO).unwrap();
/// assert!(car.valid_wheel_config());
/// assert!(car.max_velocity(true) > 0);
/// ```
pub fn car(id: VehicleId, pos: IVec3) -> Result<Vehicle, ConfigError> {
    let mut car = build(
        id,
        "car",
        pos,
        &[
            (m(0, 0), "frame"),
            (m(0, 0), "seat"),
            (m(0, 0), "controls"),
            (m(1, 0), "frame"),
            (m(1, 0), "wheel_steerable"),
            (m(1, 0), "engine_v6"),
            (m(1, 1), "frame"),
            (m(1, 1), "wheel_steerable"),
            (m(0, 1), "frame"),
            (m(-1, 0), "frame"),
            (m(-1, 0), "wheel"),
            (m(-1, 1), "frame"),
            (m(-1, 1), "wheel"),
        ],
    )?;
    car.refuel(FuelType::Gasoline, FULL_TANK);
    Ok(car)
}

/// Two-tile pedal bicycle.
///
/// # Errors
/// Fails only if the built-in part catalogue lacks a part used here.
pub fn bicycle(id: VehicleId, pos: IVec3) -> Result<Vehicle, ConfigError> {
    build(
        id,
        "bicycle",
        pos,
        &[
            (m(0, 0), "frame_light"),
            (m(0, 0), "saddle"),
            (m(0, 0), "handlebars"),
            (m(0, 0), "pedals"),
            (m(0, 0), "wheel_bicycle"),
            (m(1, 0), "frame_light"),
            (m(1, 0), "wheel_bicycle"),
        ],
    )
}

/// Electric rail cart with rail wheels on rows 0 and 1.
///
/// # Errors
/// Fails only if the built-in part catalogue lacks a part used here.
pub fn rail_cart(id: VehicleId, pos: IVec3) -> Result<Vehicle, ConfigError> {
    let mut cart = build(
        id,
        "rail cart",
        pos,
        &[
            (m(0, 0), "frame"),
            (m(0, 0), "seat"),
            (m(0, 0), "controls"),
            (m(0, 1), "frame"),
            (m(0, 1), "motor_electric"),
            (m(1, 0), "frame"),
            (m(1, 0), "wheel_rail"),
            (m(1, 1), "frame"),
            (m(1, 1), "wheel_rail"),
            (m(-1, 0), "frame"),
            (m(-1, 0), "wheel_rail"),
            (m(-1, 1), "frame"),
            (m(-1, 1), "wheel_rail"),
        ],
    )?;
    cart.refuel(FuelType::Battery, FULL_TANK);
    Ok(cart)
}

/// Two-tile electric boat.
///
/// # Errors
/// Fails only if the built-in part catalogue lacks a part used here.
pub fn boat(id: VehicleId, pos: IVec3) -> Result<Vehicle, ConfigError> {
    let mut boat = build(
        id,
        "boat",
        pos,
        &[
            (m(0, 0), "hull"),
            (m(0, 0), "seat"),
            (m(0, 0), "controls"),
            (m(-1, 0), "hull"),
            (m(-1, 0), "motor_electric"),
        ],
    )?;
    boat.refuel(FuelType::Battery, FULL_TANK);
    Ok(boat)
}

/// Two-by-two helicopter with one rotor and a turboshaft.
///
/// # Errors
/// Fails only if the built-in part catalogue lacks a part used here.
pub fn helicopter(id: VehicleId, pos: IVec3) -> Result<Vehicle, ConfigError> {
    let mut heli = build(
        id,
        "helicopter",
        pos,
        &[
            (m(0, 0), "frame"),
            (m(0, 0), "seat"),
            (m(0, 0), "controls"),
            (m(0, 0), "rotor"),
            (m(1, 0), "frame"),
            (m(1, 0), "engine_turbine"),
            (m(0, 1), "frame"),
            (m(1, 1), "frame"),
        ],
    )?;
    heli.refuel(FuelType::Gasoline, FULL_TANK);
    Ok(heli)
}

/// Four-wheeled wagon drawn by an animal in the harness at the front.
///
/// # Errors
/// Fails only if the built-in part catalogue lacks a part used here.
pub fn wagon(id: VehicleId, pos: IVec3) -> Result<Vehicle, ConfigError> {
    build(
        id,
        "wagon",
        pos,
        &[
            (m(0, 0), "frame"),
            (m(0, 0), "seat"),
            (m(0, 0), "controls"),
            (m(0, 0), "wheel"),
            (m(0, 1), "frame"),
            (m(0, 1), "wheel"),
            (m(-1, 0), "frame"),
            (m(-1, 0), "wheel"),
            (m(-1, 1), "frame"),
            (m(-1, 1), "wheel"),
            (m(1, 0), "frame"),
            (m(1, 0), "harness"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type Prefab = fn(VehicleId, IVec3) -> Result<Vehicle, ConfigError>;

    #[rstest]
    #[case::car(car as Prefab)]
    #[case::bicycle(bicycle as Prefab)]
    #[case::rail_cart(rail_cart as Prefab)]
    #[case::boat(boat as Prefab)]
    #[case::helicopter(helicopter as Prefab)]
    #[case::wagon(wagon as Prefab)]
    fn prefabs_build(#[case] prefab: Prefab) {
        let vehicle = prefab(VehicleId(7), IVec3::new(3, 4, 0)).expect("prefab");
        assert_eq!(vehicle.id, VehicleId(7));
        assert!(!vehicle.is_wrecked());
    }

    #[test]
    fn car_weighs_what_its_parts_do() {
        let car = car(VehicleId(1), IVec3::ZERO).expect("car");
        approx::assert_relative_eq!(car.total_mass_kg(), 554.0);
        assert_eq!(car.wheels().count(), 4);
        assert_eq!(car.engines().count(), 1);
    }

    #[test]
    fn special_vehicles_have_their_talents() {
        assert!(rail_cart(VehicleId(1), IVec3::ZERO).expect("cart").can_use_rails());
        assert!(boat(VehicleId(2), IVec3::ZERO).expect("boat").can_float());
        assert!(helicopter(VehicleId(3), IVec3::ZERO).expect("heli").is_rotorcraft());
    }
}
