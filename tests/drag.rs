//! Per-turn slowdown from drag and brakes.

use hashbrown::HashMap;
use rstest::rstest;
use test_utils::{car, helicopter, moving, with_id, Harness};
use trundle::vehicle::{Support, Vehicle, VehicleId};

fn slowdown(vehicle: &Vehicle, velocity: i32) -> i32 {
    let mut harness = Harness::new(30, 30);
    let world = harness.world();
    vehicle.slowdown(&world, velocity)
}

#[rstest]
fn slowdown_never_drops_below_one() {
    let mut heli = helicopter(glam::IVec3::new(5, 5, 0));
    heli.engine_on = true;
    heli.support = Support::Flying;
    for velocity in [0, 1, 10, 100] {
        assert!(slowdown(&heli, velocity) >= 1);
    }
}

#[rstest]
fn slowdown_grows_with_speed() {
    let car = moving(car(5, 5), 1000);
    let mut last = 0;
    for velocity in (0..=9000).step_by(250) {
        let now = slowdown(&car, velocity);
        assert!(now >= 1);
        assert!(now >= last, "{now} at {velocity} after {last}");
        last = now;
    }
}

#[rstest]
fn slowdown_is_the_same_in_reverse() {
    let car = moving(car(5, 5), -1000);
    assert_eq!(slowdown(&car, -3000), slowdown(&car, 3000));
}

#[rstest]
fn the_parking_brake_holds_a_car_with_its_engine_off() {
    let running = moving(car(5, 5), 2000);
    let mut parked = running.clone();
    parked.engine_on = false;
    assert_eq!(slowdown(&parked, 2000) - slowdown(&running, 2000), 1500);
}

#[rstest]
fn falling_vehicles_ignore_the_parking_brake() {
    let mut dropped = car(5, 5);
    dropped.support = Support::Falling;
    let mut running = moving(car(5, 5), 2000);
    running.support = Support::Falling;
    assert_eq!(slowdown(&dropped, 2000), slowdown(&running, 2000));
}

fn towing_slowdown(tow_back: bool) -> (i32, i32) {
    let mut tractor = moving(car(5, 5), 2000);
    tractor.tow = Some(VehicleId(2));
    let mut trailer = with_id(car(2, 5), 2);
    trailer.towed = true;
    if tow_back {
        trailer.tow = Some(VehicleId(1));
    }
    let mut others = HashMap::new();
    others.insert(trailer.id, trailer);
    let mut harness = Harness::new(30, 30);
    let world = harness.world_with(&others);
    let alone = moving(car(5, 5), 2000).slowdown(&world, 2000);
    (alone, tractor.slowdown(&world, 2000))
}

#[rstest]
fn towed_vehicles_add_their_drag() {
    let (alone, towing) = towing_slowdown(false);
    assert!(towing > alone + 1500, "{towing} vs {alone}");
}

#[rstest]
fn tow_cycles_count_each_vehicle_once() {
    assert_eq!(towing_slowdown(true), towing_slowdown(false));
}
