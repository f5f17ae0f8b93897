//! Fuel use, engine noise and engine wear.

use approx::assert_relative_eq;
use rstest::rstest;
use test_utils::{bicycle, car, Harness};
use trundle::map::FieldKind;
use trundle::vehicle::FuelType;

#[rstest]
#[case::idle(0, 10_000.0)]
#[case::half(500, 9_998.0)]
#[case::flat_out(1000, 9_996.0)]
fn fuel_burns_in_proportion_to_load(#[case] load: i32, #[case] left: f64) {
    let mut car = car(5, 5);
    car.consume_fuel(load);
    assert_relative_eq!(car.fuel_left(FuelType::Gasoline), left, epsilon = 1e-9);
}

#[test]
fn an_empty_tank_stays_empty() {
    let mut car = car(5, 5);
    car.fuel.insert(FuelType::Gasoline, 1.0);
    car.consume_fuel(1000);
    assert_relative_eq!(car.fuel_left(FuelType::Gasoline), 0.0);
    assert!(!car.is_engine_fueled(car.engines().next().expect("engine")));
}

#[rstest]
#[case::idling(0, 8, "hummm!", false)]
#[case::flat_out(1000, 31, "vroom!", true)]
fn engines_make_noise_and_smoke(
    #[case] load: i32,
    #[case] volume: i32,
    #[case] description: &str,
    #[case] smokes: bool,
) {
    let mut harness = Harness::new(20, 20);
    let car = car(5, 5);
    {
        let mut world = harness.world();
        car.noise_and_smoke(load, &mut world);
    }

    let sounds = harness.log.sounds();
    assert_eq!(sounds.len(), 1);
    assert_eq!(sounds[0].volume, volume);
    assert_eq!(sounds[0].description, description);
    assert_eq!(sounds[0].pos, car.pos);

    let exhaust = car.global_part_pos(car.engines().next().expect("engine"));
    let smoking = harness
        .map
        .fields_at(exhaust)
        .iter()
        .any(|field| field.kind == FieldKind::Smoke);
    assert_eq!(smoking, smokes);
}

#[test]
fn pedal_power_is_silent() {
    let mut harness = Harness::new(20, 20);
    let mut bike = bicycle(5, 5);
    harness.seat_player(&mut bike);
    {
        let mut world = harness.world();
        bike.noise_and_smoke(1000, &mut world);
    }
    assert!(harness.log.sounds().is_empty());
}

#[test]
fn strained_engines_wear_out() {
    let mut harness = Harness::new(20, 20);
    let mut car = car(5, 5);
    let engine = car.engines().next().expect("engine");

    for _ in 0..100 {
        if car.parts[engine].hp < 400 {
            break;
        }
        let mut world = harness.world();
        car.do_engine_damage(engine, 40, &mut world);
    }

    let hp = car.parts[engine].hp;
    assert!((300..=350).contains(&hp), "one hit of 50 to 100, got {hp}");
    assert!(harness.said("Your engine emits a"));
}

#[test]
fn muscles_and_easy_running_never_wear() {
    let mut harness = Harness::new(20, 20);
    let mut bike = bicycle(5, 5);
    harness.seat_player(&mut bike);
    let pedals = bike.engines().next().expect("pedals");
    let mut car = car(5, 5);
    let engine = car.engines().next().expect("engine");

    for _ in 0..100 {
        let mut world = harness.world();
        bike.do_engine_damage(pedals, 25, &mut world);
        car.do_engine_damage(engine, 0, &mut world);
    }

    assert_eq!(bike.parts[pedals].hp, bike.parts[pedals].info().durability);
    assert_eq!(car.parts[engine].hp, 400);
    assert!(harness.log.messages().is_empty());
}
