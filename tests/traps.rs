//! Wheels rolling over traps.

use glam::{IVec2, IVec3};
use rstest::{fixture, rstest};
use test_utils::{car, Harness};
use trundle::map::GameMap;
use trundle::traps::TrapId;
use trundle::vehicle::{PartFlag, Vehicle};

struct Setup {
    harness: Harness,
    car: Vehicle,
    front: usize,
    wheel: usize,
    at: IVec3,
}

#[fixture]
fn setup() -> Setup {
    let car = car(5, 5);
    let front = car.part_at(IVec2::new(1, 0)).expect("front frame");
    let wheel = car
        .part_with_feature(front, PartFlag::Wheel, true)
        .expect("front wheel");
    let at = car.global_part_pos(front);
    Setup {
        harness: Harness::new(20, 20),
        car,
        front,
        wheel,
        at,
    }
}

fn arm(harness: &mut Harness, at: IVec3, id: &str) -> TrapId {
    let trap = harness.traps.find(id).expect("built-in trap");
    harness.map.set_trap(at, trap);
    trap
}

fn run_over(setup: &mut Setup, part: usize) {
    let mut world = setup.harness.world();
    setup.car.handle_trap(&mut world, setup.at, part);
}

#[rstest]
fn caltrops_chew_the_wheel_and_stay(mut setup: Setup) {
    let caltrops = arm(&mut setup.harness, setup.at, "tr_caltrops");
    let front = setup.front;
    run_over(&mut setup, front);

    assert_eq!(setup.car.parts[setup.wheel].hp, 160);
    assert_eq!(setup.harness.map.trap_at(setup.at), caltrops);
    assert!(setup.harness.log.heard("tink!"));
}

#[rstest]
fn landmines_explode_and_vanish(mut setup: Setup) {
    arm(&mut setup.harness, setup.at, "tr_landmine");
    let front = setup.front;
    run_over(&mut setup, front);

    assert_eq!(setup.harness.map.explosions(), &[(setup.at, 18, 12)]);
    assert!(setup.harness.map.trap_at(setup.at).is_null());
    assert_eq!(setup.car.parts[setup.wheel].hp, 200);
}

#[rstest]
fn bear_traps_snap_shut_and_leave_their_parts(mut setup: Setup) {
    arm(&mut setup.harness, setup.at, "tr_beartrap");
    let front = setup.front;
    run_over(&mut setup, front);

    assert!(setup.car.parts[setup.wheel].is_broken());
    assert!(setup.harness.map.trap_at(setup.at).is_null());
    assert_eq!(setup.harness.map.items_at(setup.at), &[("beartrap".to_owned(), 1)]);
    assert!(setup.harness.log.heard("SNAP!"));
}

#[rstest]
fn shotgun_traps_rearm_with_one_barrel_left(mut setup: Setup) {
    arm(&mut setup.harness, setup.at, "tr_shotgun_2");
    let front = setup.front;
    run_over(&mut setup, front);

    let one_barrel = setup.harness.traps.find("tr_shotgun_1").expect("second stage");
    assert_eq!(setup.harness.map.trap_at(setup.at), one_barrel);
}

#[rstest]
fn tiles_without_a_wheel_ignore_the_trap(mut setup: Setup) {
    let caltrops = arm(&mut setup.harness, setup.at, "tr_caltrops");
    let side = setup.car.part_at(IVec2::new(0, 1)).expect("side frame");
    run_over(&mut setup, side);

    assert!(setup.harness.log.sounds().is_empty());
    assert_eq!(setup.harness.map.trap_at(setup.at), caltrops);
}

#[rstest]
fn pits_are_left_to_falling(mut setup: Setup) {
    let pit = arm(&mut setup.harness, setup.at, "tr_pit");
    let front = setup.front;
    run_over(&mut setup, front);

    assert_eq!(setup.car.parts[setup.wheel].hp, 200);
    assert_eq!(setup.harness.map.trap_at(setup.at), pit);
}

#[rstest]
fn the_player_spots_and_then_recognises_a_trap(mut setup: Setup) {
    setup.harness.seat_player(&mut setup.car);
    arm(&mut setup.harness, setup.at, "tr_caltrops");
    let front = setup.front;

    run_over(&mut setup, front);
    assert!(setup.harness.said("runs over something."));
    assert!(setup.harness.said("You've spotted a caltrops"));

    setup.harness.log.clear();
    run_over(&mut setup, front);
    assert!(setup.harness.said("runs over caltrops."));
    assert!(!setup.harness.said("You've spotted"));
}
