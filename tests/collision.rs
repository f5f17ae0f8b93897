//! Collisions with terrain, furniture, creatures and other vehicles.

use glam::IVec3;
use hashbrown::HashMap;
use rstest::rstest;
use test_utils::{car, moving, with_id, Harness};
use trundle::movement::{Collision, CollisionKind};
use trundle::creature::Creatures;
use trundle::sandbox::{Critter, Furniture, Terrain};
use trundle::vehicle::{Vehicle, VehicleId};
use trundle::world::{NoVehicles, VehicleLookup};

#[derive(Clone, Copy, Debug)]
enum Obstacle {
    Wall,
    Bench,
    Bystander,
}

/// Sets `obstacle` in the column the car enters when moving along `velocity`.
fn obstacle_course(obstacle: Obstacle, velocity: i32) -> (Harness, Vehicle) {
    let mut harness = Harness::new(20, 20);
    let car = moving(car(5, 5), velocity);
    let x = if velocity < 0 { 3 } else { 7 };
    match obstacle {
        Obstacle::Wall => harness
            .map
            .fill(IVec3::new(x, 0, 0), IVec3::new(x, 19, 0), Terrain::Wall),
        Obstacle::Bench => harness
            .map
            .set_furniture(IVec3::new(x, 5, 0), Furniture::new("bench", 5, 20)),
        Obstacle::Bystander => {
            harness.bystander(IVec3::new(x, 5, 0));
        }
    }
    (harness, car)
}

fn drive_into(harness: &mut Harness, car: &mut Vehicle, others: &dyn VehicleLookup) -> Vec<Collision> {
    let step = IVec3::new(car.velocity.signum(), 0, 0);
    let mut colls = Vec::new();
    let mut world = harness.world_with(others);
    car.collision(&mut world, &mut colls, step, false, false);
    colls
}

#[rstest]
fn a_wall_stops_the_car_dead() {
    let (mut harness, mut car) = obstacle_course(Obstacle::Wall, 4000);
    let colls = drive_into(&mut harness, &mut car, &NoVehicles);

    assert_eq!(car.velocity, 0);
    assert_eq!(colls.len(), 1);
    let hit = &colls[0];
    assert_eq!(hit.kind, CollisionKind::Other);
    assert_eq!(car.parts[hit.part].mount, glam::IVec2::new(1, 0));
    assert!(hit.imp > 0.0);
    assert!((hit.imp - hit.object_damage).abs() <= harness.tuning.momentum_tolerance / 10.0);
    assert!(harness.log.heard("smash!"));
}

#[rstest]
fn a_bench_breaks_and_the_car_keeps_going() {
    let (mut harness, mut car) = obstacle_course(Obstacle::Bench, 2000);
    let colls = drive_into(&mut harness, &mut car, &NoVehicles);

    assert_eq!(colls.len(), 1);
    assert_eq!(colls[0].kind, CollisionKind::Bashable);
    assert!(colls[0].object_damage >= 20.0);
    assert!(harness.map.furniture(IVec3::new(7, 5, 0)).is_none());
    assert!(car.velocity > 0 && car.velocity < 2000, "{}", car.velocity);
}

#[rstest]
fn a_bystander_is_run_down() {
    let (mut harness, mut car) = obstacle_course(Obstacle::Bystander, 3000);
    harness.seat_player(&mut car);
    let colls = drive_into(&mut harness, &mut car, &NoVehicles);

    assert_eq!(colls.len(), 1);
    let CollisionKind::Body(victim) = colls[0].kind else {
        panic!("expected a body, got {:?}", colls[0].kind);
    };
    let victim = harness.roster.get(victim).expect("bystander");
    assert!(victim.hp < victim.hp_max);
    assert!(victim.is_dead() || victim.pos != IVec3::new(7, 5, 0));
    assert!((colls[0].imp - colls[0].object_damage).abs() <= harness.tuning.momentum_tolerance / 10.0);
    assert!(car.velocity > 0 && car.velocity < 3000);
    assert!(harness.said("Your car's frame rams into bystander"));
}

#[rstest]
fn riders_are_not_run_over_by_their_own_car() {
    let mut harness = Harness::new(20, 20);
    let mut car = moving(car(5, 5), 2000);
    harness.seat_player(&mut car);
    let colls = drive_into(&mut harness, &mut car, &NoVehicles);
    assert!(colls.is_empty());
    assert_eq!(car.velocity, 2000);
}

#[rstest]
fn standing_still_only_detects() {
    let (mut harness, mut car) = obstacle_course(Obstacle::Wall, 0);
    let mut colls = Vec::new();
    {
        let mut world = harness.world();
        assert!(car.collision(&mut world, &mut colls, IVec3::X, false, false));
    }
    assert_eq!(colls.len(), 1);
    assert!(colls[0].imp.abs() < f64::EPSILON);
    assert!(harness.log.sounds().is_empty());
}

#[rstest]
fn collisions_never_reverse_the_car(
    #[values(Obstacle::Wall, Obstacle::Bench, Obstacle::Bystander)] obstacle: Obstacle,
    #[values(-3000, -500, 300, 1000, 2500, 6000)] velocity: i32,
) {
    let (mut harness, mut car) = obstacle_course(obstacle, velocity);
    drive_into(&mut harness, &mut car, &NoVehicles);
    assert!(
        car.velocity == 0 || car.velocity.signum() == velocity.signum(),
        "{obstacle:?} at {velocity} left {}",
        car.velocity
    );
}

#[rstest]
fn rear_ending_a_parked_car_shoves_it_forward() {
    let mut harness = Harness::new(20, 20);
    let mut car = moving(car(5, 5), 2000);
    let parked = with_id(test_utils::car(8, 5), 2);
    harness.place(&parked);
    let mut others = HashMap::new();
    others.insert(parked.id, parked);

    let colls = drive_into(&mut harness, &mut car, &others);
    assert_eq!(colls.len(), 2);
    assert!(colls
        .iter()
        .all(|c| matches!(c.kind, CollisionKind::Vehicle { target, .. } if target == VehicleId(2))));

    let mut world = harness.world_with(&others);
    let damage = car.vehicle_vehicle_collision(&mut world, VehicleId(2), &colls);
    assert!(damage > 0.0);
    assert!(car.velocity > 0 && car.velocity < 2000, "{}", car.velocity);

    let impacts = world.take_impacts();
    assert_eq!(impacts.len(), 1);
    let impact = &impacts[0];
    assert_eq!(impact.target, VehicleId(2));
    assert_eq!(impact.parts.len(), 2);
    assert!(impact.velocity > car.velocity);
    assert!(impact.of_turn > car.of_turn);
    drop(world);

    let mut parked = others.remove(&VehicleId(2)).expect("parked car");
    let mut world = harness.world();
    parked.apply_impact(impact, &mut world);
    assert_eq!(parked.velocity, impact.velocity);
    assert!(harness.said("collides with car's"));
}

#[rstest]
fn a_still_check_of_the_floor_ends_a_fall() {
    let mut harness = Harness::with_levels(20, 20, -1, 0);
    let mut car = car(5, 5);
    car.set_falling(true);
    car.vertical_velocity = 0;
    let mut colls = Vec::new();
    {
        let mut world = harness.world();
        car.collision(&mut world, &mut colls, IVec3::NEG_Z, true, false);
    }
    assert!(!car.is_falling());
    assert_eq!(car.vertical_velocity, 0);
}

/// The car at `(5, 5)` heading east into a fish at `fish`, with bystanders
/// standing on `crowd`.
fn swim_through(fish: IVec3, crowd: &[IVec3]) -> IVec3 {
    let mut harness = Harness::new(40, 40);
    harness.map.set_terrain(fish, Terrain::ShallowWater);
    let fish = harness.spawn(Critter::animal("fish", fish, 5.0, 100));
    for &p in crowd {
        harness.bystander(p);
    }
    let mut car = moving(car(5, 5), 1000);
    let mut colls = Vec::new();
    {
        let mut world = harness.world();
        car.collision(&mut world, &mut colls, IVec3::X, false, false);
    }
    assert!(colls.is_empty());
    assert_eq!(car.velocity, 1000);
    harness.roster.position(fish)
}

#[rstest]
#[case::open_water(IVec3::new(7, 6, 0), &[], IVec3::new(9, 4, 0))]
#[case::first_spot_taken(IVec3::new(7, 5, 0), &[IVec3::new(9, 3, 0)], IVec3::new(11, 1, 0))]
fn swimmers_are_pushed_aside_ahead_and_left(
    #[case] fish: IVec3,
    #[case] crowd: &[IVec3],
    #[case] expected: IVec3,
) {
    assert_eq!(swim_through(fish, crowd), expected);
}

#[rstest]
fn a_hemmed_in_swimmer_stays_put() {
    let fish = IVec3::new(7, 5, 0);
    let crowd: Vec<IVec3> = (1..=10).map(|k| fish + IVec3::new(2 * k, -2 * k, 0)).collect();
    assert_eq!(swim_through(fish, &crowd), fish);
}
