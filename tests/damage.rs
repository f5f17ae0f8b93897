//! Part damage, destruction and cleanup.

use glam::IVec2;
use rstest::{fixture, rstest};
use test_utils::{car, Harness};
use trundle::creature::Creatures;
use trundle::vehicle::{PartCatalog, PartFlag, Vehicle, VehiclePart};

#[fixture]
fn parked() -> (Harness, Vehicle) {
    let mut harness = Harness::new(20, 20);
    let car = car(5, 5);
    harness.place(&car);
    (harness, car)
}

fn front_wheel(car: &Vehicle) -> usize {
    let front = car.part_at(IVec2::new(1, 0)).expect("front frame");
    car.part_with_feature(front, PartFlag::Wheel, true).expect("front wheel")
}

#[rstest]
fn losing_a_frame_takes_its_tile_with_it(parked: (Harness, Vehicle)) {
    let (mut harness, mut car) = parked;
    let front = car.part_at(IVec2::new(1, 0)).expect("front frame");
    let on_tile: Vec<usize> = car.parts_on_mount(front).collect();
    assert_eq!(on_tile.len(), 3);

    let leftover = {
        let mut world = harness.world();
        car.damage_direct(front, 450, &mut world)
    };

    assert_eq!(leftover, 50);
    assert!(on_tile.iter().all(|&p| car.parts[p].removed));
    assert_eq!(car.engines().count(), 0);
    assert!(car.cleanup_removed_parts());
    assert_eq!(car.parts.len(), 10);
    assert!(!car.cleanup_removed_parts());
    assert!(car.part_at(IVec2::new(1, 0)).is_none());
}

#[rstest]
fn a_destroyed_seat_frame_throws_out_the_driver(parked: (Harness, Vehicle)) {
    let (mut harness, mut car) = parked;
    let player = harness.seat_player(&mut car);
    let frame = car.part_at(IVec2::ZERO).expect("driver's frame");

    {
        let mut world = harness.world();
        car.damage_direct(frame, 400, &mut world);
    }

    assert!(harness.said("The car's frame is destroyed!"));
    assert!(!harness.roster.in_vehicle(player));
    assert!(car.riders().is_empty());
}

#[rstest]
#[case::glancing(15, 200)]
#[case::threshold(20, 180)]
#[case::solid(75, 125)]
fn light_blows_glance_off(parked: (Harness, Vehicle), #[case] dmg: i32, #[case] hp: i32) {
    let (mut harness, mut car) = parked;
    let wheel = front_wheel(&car);
    {
        let mut world = harness.world();
        car.damage(wheel, dmg, &mut world);
    }
    assert_eq!(car.parts[wheel].hp, hp);
}

#[rstest]
fn armour_takes_the_hit_first(parked: (Harness, Vehicle)) {
    let (mut harness, mut car) = parked;
    let plate = PartCatalog::builtin().get("armor_plate").expect("built-in armour");
    car.parts.push(VehiclePart::new(plate, IVec2::new(1, 0)));
    car.refresh_mounts();
    let armour = car.parts.len() - 1;
    let wheel = front_wheel(&car);

    {
        let mut world = harness.world();
        car.damage(wheel, 100, &mut world);
    }

    assert_eq!(car.parts[wheel].hp, 200);
    assert_eq!(car.parts[armour].hp, 500);
}

#[rstest]
fn shock_fades_with_distance(parked: (Harness, Vehicle)) {
    let (mut harness, mut car) = parked;
    let impact = IVec2::new(1, 0);
    let front = car.part_at(impact).expect("front frame");
    let middle = car.part_at(IVec2::ZERO).expect("middle frame");
    let rear = car.part_at(IVec2::new(-1, 0)).expect("rear frame");

    {
        let mut world = harness.world();
        car.damage_all(100, 100, impact, &mut world);
    }

    assert_eq!(car.parts[front].hp, 400);
    assert_eq!(car.parts[middle].hp, 375);
    assert_eq!(car.parts[rear].hp, 389);
}

#[rstest]
fn removing_everything_wrecks_the_car(parked: (Harness, Vehicle)) {
    let (mut harness, mut car) = parked;
    assert!(!car.is_wrecked());
    for p in 0..car.parts.len() {
        car.remove_part(p, &mut harness.roster);
    }
    assert!(car.is_wrecked());
}
