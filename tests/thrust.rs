//! Throttle, brakes, cruise control and steering.

use approx::assert_relative_eq;
use glam::{IVec2, IVec3};
use rstest::{fixture, rstest};
use test_utils::{car, moving, Harness, MockSink};
use trundle::messages::MsgKind;
use trundle::vehicle::{FuelType, PartCatalog, Vehicle, VehicleId};
use trundle::world::{NoVehicles, World};

#[fixture]
fn driven() -> (Harness, Vehicle) {
    let mut harness = Harness::new(40, 20);
    let mut car = moving(car(5, 5), 0);
    harness.seat_player(&mut car);
    (harness, car)
}

fn thrust(harness: &mut Harness, car: &mut Vehicle, thd: i32) {
    let mut world = harness.world();
    car.thrust(&mut world, thd, 0);
}

#[rstest]
fn a_standing_start_gains_one_turn_of_acceleration(driven: (Harness, Vehicle)) {
    let (mut harness, mut car) = driven;
    let accel = car.current_acceleration(true);
    assert!(accel > 0);

    thrust(&mut harness, &mut car, 1);

    assert_eq!(car.velocity, accel.min(car.max_velocity(true)));
    assert!(car.fuel_left(FuelType::Gasoline) < 10_000.0);
}

#[rstest]
fn forward_thrust_stops_at_top_speed(driven: (Harness, Vehicle)) {
    let (mut harness, mut car) = driven;
    let top = car.max_velocity(true);
    car.velocity = top - 1;
    thrust(&mut harness, &mut car, 1);
    assert_eq!(car.velocity, top);

    car.velocity = top + 500;
    thrust(&mut harness, &mut car, 1);
    assert_eq!(car.velocity, top + 500);
}

#[rstest]
fn reversing_without_a_motor_is_weaker(driven: (Harness, Vehicle)) {
    let (mut harness, mut car) = driven;
    let accel = f64::from(car.current_acceleration(true));
    let expected = (-(accel * 0.6).trunc()).max(f64::from(car.max_reverse_velocity(true)));

    thrust(&mut harness, &mut car, -1);

    assert_relative_eq!(f64::from(car.velocity), expected);
    assert!(car.velocity < 0);
}

#[rstest]
fn reverse_thrust_stops_at_reverse_top_speed(driven: (Harness, Vehicle)) {
    let (mut harness, mut car) = driven;
    let limit = car.max_reverse_velocity(true);
    car.velocity = limit + 1;
    thrust(&mut harness, &mut car, -1);
    assert_eq!(car.velocity, limit);
}

#[rstest]
#[case(300)]
#[case(3000)]
#[case(7000)]
fn braking_slows_without_reversing(driven: (Harness, Vehicle), #[case] velocity: i32) {
    let (mut harness, mut car) = driven;
    car.velocity = velocity;
    thrust(&mut harness, &mut car, -1);
    assert!(car.velocity >= 0);
    assert!(car.velocity < velocity);
}

#[rstest]
fn cruise_control_never_overshoots(driven: (Harness, Vehicle)) {
    let (mut harness, mut car) = driven;
    car.cruise_on = true;
    car.cruise_velocity = 1000;
    for _ in 0..5 {
        thrust(&mut harness, &mut car, 1);
        assert!(car.velocity > 0 && car.velocity <= 1000, "{}", car.velocity);
    }
    assert_eq!(car.velocity, 1000);
}

#[rstest]
fn cruise_targets_snap_to_the_step_and_safe_speed() {
    let mut car = car(5, 5);
    let safe = car.safe_velocity(true);
    let top = car.max_velocity(true);
    for _ in 0..100 {
        car.cruise_thrust(1000);
        assert!(car.cruise_velocity <= top);
    }
    assert_eq!(car.cruise_velocity, top);

    car.cruise_velocity = safe - 10;
    car.cruise_thrust(1000);
    assert_eq!(car.cruise_velocity, safe);

    for _ in 0..100 {
        car.cruise_thrust(-1000);
        assert!(car.cruise_velocity >= car.max_reverse_velocity(true));
    }
    assert_eq!(car.cruise_velocity, car.max_reverse_velocity(true));
}

#[rstest]
fn a_dead_engine_is_reported_to_the_driver(driven: (Harness, Vehicle)) {
    let (mut harness, mut car) = driven;
    car.engine_on = false;
    car.cruise_velocity = 2000;
    let mut sink = MockSink::new();
    sink.expect_add_msg()
        .withf(|kind, text| *kind == MsgKind::Neutral && text == "The car's engine isn't on!")
        .times(1)
        .return_const(());
    sink.expect_sound().never();
    {
        let mut world = World::new(
            &mut harness.map,
            &mut harness.roster,
            &mut sink,
            &mut harness.rng,
            &harness.tuning,
            &harness.traps,
            &NoVehicles,
        );
        car.thrust(&mut world, 1, 0);
    }
    assert_eq!(car.velocity, 0);
    assert_eq!(car.cruise_velocity, 0);
    assert_relative_eq!(car.fuel_left(FuelType::Gasoline), 10_000.0);
}

#[rstest]
fn refusals_are_silent_without_the_player() {
    let mut harness = Harness::new(40, 20);
    let mut car = car(5, 5);
    let mut sink = MockSink::new();
    sink.expect_add_msg().never();
    sink.expect_sound().never();
    {
        let mut world = World::new(
            &mut harness.map,
            &mut harness.roster,
            &mut sink,
            &mut harness.rng,
            &harness.tuning,
            &harness.traps,
            &NoVehicles,
        );
        car.thrust(&mut world, 1, 0);
    }
    assert_eq!(car.velocity, 0);
}

#[rstest]
fn too_few_wheels_cannot_move() {
    let mut harness = Harness::new(40, 20);
    let mut sled = Vehicle::from_layout(
        VehicleId(1),
        "sled",
        IVec3::new(5, 5, 0),
        PartCatalog::builtin(),
        &[
            (IVec2::ZERO, "frame"),
            (IVec2::ZERO, "seat"),
            (IVec2::ZERO, "controls"),
            (IVec2::X, "frame"),
            (IVec2::X, "engine_v6"),
        ],
    )
    .expect("sled");
    sled.refuel(FuelType::Gasoline, 100.0);
    sled.engine_on = true;
    harness.seat_player(&mut sled);

    thrust(&mut harness, &mut sled, 1);

    assert_eq!(sled.velocity, 0);
    assert!(harness.said("The sled doesn't have enough wheels to move!"));
}

#[rstest]
#[case(20.0, 15.0)]
#[case(-20.0, 345.0)]
#[case(7.0, 0.0)]
#[case(8.0, 15.0)]
fn steering_snaps_to_fifteen_degrees(#[case] degrees: f64, #[case] target: f64) {
    let mut harness = Harness::new(40, 20);
    let mut car = moving(car(5, 5), 1000);
    let world = harness.world();
    car.turn(&world, degrees);
    assert_relative_eq!(car.turn_dir, target);
}

#[rstest]
fn reversing_mirrors_the_wheel_unless_configured() {
    let mut harness = Harness::new(40, 20);
    let mut car = moving(car(5, 5), -1000);
    {
        let world = harness.world();
        car.turn(&world, 15.0);
    }
    assert_relative_eq!(car.turn_dir, 345.0);

    harness.tuning.reverse_steering = true;
    let mut car = moving(test_utils::car(5, 5), -1000);
    let world = harness.world();
    car.turn(&world, 15.0);
    assert_relative_eq!(car.turn_dir, 15.0);
}

#[rstest]
fn stopping_realigns_the_movement(driven: (Harness, Vehicle)) {
    let (mut harness, mut car) = driven;
    car.velocity = 2500;
    car.skidding = true;
    car.movement.init(90.0);
    car.of_turn_carry = 0.4;
    {
        let mut world = harness.world();
        car.stop(&mut world, true);
    }
    assert_eq!(car.velocity, 0);
    assert!(!car.skidding);
    assert_relative_eq!(car.movement.dir(), car.face.dir());
    assert_relative_eq!(car.of_turn_carry, 0.0);
}
