//! Turn scheduling across several vehicles.

use glam::IVec3;
use test_utils::{car, moving, with_id, Harness};
use trundle::creature::Creatures;
use trundle::vehicle::VehicleId;
use trundle::{Fleet, RemovalReason};

#[test]
fn spawning_registers_the_footprint() {
    let mut harness = Harness::new(40, 20);
    let mut fleet = Fleet::new();
    assert!(fleet.is_empty());
    {
        let mut env = harness.surroundings();
        fleet.spawn(with_id(car(20, 5), 3), &mut env);
        fleet.spawn(with_id(car(5, 5), 1), &mut env);
    }

    assert_eq!(fleet.len(), 2);
    assert_eq!(fleet.ids(), vec![VehicleId(1), VehicleId(3)]);
    assert_eq!(harness.map.footprint(VehicleId(1)).len(), 6);
    assert_eq!(harness.map.footprint(VehicleId(3)).len(), 6);

    let gone = {
        let mut env = harness.surroundings();
        fleet.remove(VehicleId(3), &mut env)
    };
    assert_eq!(gone.map(|v| v.pos), Some(IVec3::new(20, 5, 0)));
    assert!(harness.map.footprint(VehicleId(3)).is_empty());
    assert!(fleet.get(VehicleId(3)).is_none());
}

#[test]
fn a_turn_moves_every_vehicle() {
    let mut harness = Harness::new(100, 20);
    let mut fleet = Fleet::new();
    let removed = {
        let mut env = harness.surroundings();
        fleet.spawn(moving(car(5, 5), 2000), &mut env);
        fleet.spawn(with_id(car(5, 12), 2), &mut env);
        fleet.turn(&mut env)
    };

    assert!(removed.is_empty());
    let runner = fleet.get(VehicleId(1)).expect("moving car");
    assert!(runner.pos.x > 5);
    assert!(runner.velocity < 2000);
    let parked = fleet.get(VehicleId(2)).expect("parked car");
    assert_eq!(parked.pos, IVec3::new(5, 12, 0));
    assert_eq!(harness.map.footprint(VehicleId(1)).len(), 6);
}

#[test]
fn vehicles_off_the_map_leave_the_fleet() {
    let mut harness = Harness::new(20, 20);
    let mut fleet = Fleet::new();
    let mut stray = car(50, 5);
    let player = harness.seat_player(&mut stray);
    let removed = {
        let mut env = harness.surroundings();
        fleet.spawn(stray, &mut env);
        fleet.turn(&mut env)
    };

    assert_eq!(removed, vec![(VehicleId(1), RemovalReason::OutOfBounds)]);
    assert!(fleet.is_empty());
    assert!(!harness.roster.in_vehicle(player));
}

#[test]
fn summoned_vehicles_are_dropped_when_time_runs_out() {
    let mut harness = Harness::new(20, 20);
    let mut fleet = Fleet::new();
    let mut summoned = car(5, 5);
    summoned.summon_timer = Some(1);
    let removed = {
        let mut env = harness.surroundings();
        fleet.spawn(summoned, &mut env);
        fleet.turn(&mut env)
    };

    assert_eq!(removed, vec![(VehicleId(1), RemovalReason::Despawned)]);
    assert!(harness.map.footprint(VehicleId(1)).is_empty());
}

#[test]
fn a_rear_end_shunts_the_parked_car() {
    let mut harness = Harness::new(60, 20);
    let mut fleet = Fleet::new();
    {
        let mut env = harness.surroundings();
        fleet.spawn(moving(car(5, 5), 3000), &mut env);
        fleet.spawn(with_id(car(12, 5), 2), &mut env);
        for _ in 0..3 {
            fleet.turn(&mut env);
        }
    }

    let rammer = fleet.get(VehicleId(1)).expect("rammer");
    let parked = fleet.get(VehicleId(2)).expect("parked car");
    assert!(rammer.velocity < 3000);
    assert!(parked.velocity > 0 || parked.pos.x > 12);
    assert!(rammer.pos.x < parked.pos.x);
}
