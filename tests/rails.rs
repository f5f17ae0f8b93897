//! Running on track.

use glam::IVec3;
use rstest::{fixture, rstest};
use test_utils::{car, moving, rail_cart, Harness};
use trundle::movement::{is_on_rails, process_movement_on_rails, RailAction};
use trundle::sandbox::Terrain;

#[fixture]
fn railway() -> Harness {
    let mut harness = Harness::new(40, 20);
    harness
        .map
        .fill(IVec3::new(0, 8, 0), IVec3::new(39, 9, 0), Terrain::Rail);
    harness
}

#[rstest]
fn a_cart_square_on_the_track_is_on_rails(railway: Harness) {
    let cart = moving(rail_cart(5, 8), 1000);
    assert!(is_on_rails(&railway.map, &cart));
    assert_eq!(process_movement_on_rails(&railway.map, &cart), RailAction::None);
}

#[rstest]
#[case(30.0)]
#[case(100.0)]
fn a_skewed_cart_is_off_the_rails(railway: Harness, #[case] facing: f64) {
    let mut cart = rail_cart(5, 8);
    cart.set_facing(facing);
    assert!(!is_on_rails(&railway.map, &cart));
}

#[rstest]
fn rails_need_track_and_rail_wheels(railway: Harness) {
    assert!(!is_on_rails(&Harness::new(40, 20).map, &rail_cart(5, 8)));
    assert!(!is_on_rails(&railway.map, &car(5, 8)));
}

#[rstest]
fn a_cart_facing_off_track_turns_back_onto_it(railway: Harness) {
    let mut cart = moving(rail_cart(5, 8), 1000);
    cart.set_facing(10.0);
    assert_eq!(process_movement_on_rails(&railway.map, &cart), RailAction::Turn(0.0));
}

#[rstest]
fn track_ending_ahead_still_counts_when_track_lies_behind() {
    let mut harness = Harness::new(40, 20);
    harness
        .map
        .fill(IVec3::new(0, 8, 0), IVec3::new(6, 9, 0), Terrain::Rail);
    let cart = moving(rail_cart(5, 8), 1000);
    assert!(is_on_rails(&harness.map, &cart));
}

#[rstest]
fn carts_follow_the_line_without_skidding(mut railway: Harness) {
    let mut cart = moving(rail_cart(3, 8), 1500);
    railway.place(&cart);
    for _ in 0..5 {
        let mut world = railway.world();
        cart.gain_moves(&mut world);
        for _ in 0..20 {
            if cart.of_turn <= 0.0 {
                break;
            }
            assert!(!cart.act_on_map(&mut world).is_removed());
        }
    }
    assert!(cart.pos.x > 10, "cart stopped at {}", cart.pos);
    assert_eq!(cart.pos.y, 8);
    assert!(!cart.skidding);
    assert!(cart.face.dir().abs() < f64::EPSILON);
}

/// Inclusive `(x0, y0, x1, y1)` boxes of track.
type Layout = &'static [(i32, i32, i32, i32)];

/// Plain double-width line along rows 8 and 9.
const STRAIGHT: Layout = &[(0, 8, 39, 9)];
/// Track ending at x = 5 with a diagonal spur each way.
const FORK: Layout = &[(0, 8, 5, 9), (6, 7, 6, 8), (7, 6, 7, 7), (6, 9, 6, 10), (7, 10, 7, 10)];
/// Track ending at x = 5, carrying on one row up, with a spur to the right.
const JOG_LEFT: Layout = &[(0, 8, 5, 9), (6, 7, 39, 8), (6, 9, 6, 10), (7, 10, 7, 10)];
/// Track ending at x = 5 and carrying on one row down.
const JOG_RIGHT: Layout = &[(0, 8, 5, 9), (6, 9, 39, 10)];
/// Straight line with a parallel line one row down from x = 6.
const DOUBLE_RIGHT: Layout = &[(5, 8, 39, 9), (6, 10, 39, 10)];

fn track(layout: Layout) -> Harness {
    let mut harness = Harness::new(40, 20);
    for &(x0, y0, x1, y1) in layout {
        harness
            .map
            .fill(IVec3::new(x0, y0, 0), IVec3::new(x1, y1, 0), Terrain::Rail);
    }
    harness
}

#[rstest]
#[case::straight_ahead(STRAIGHT, 0.0, RailAction::None)]
#[case::no_track_to_the_right(STRAIGHT, 90.0, RailAction::None)]
#[case::no_track_to_the_left(STRAIGHT, 270.0, RailAction::None)]
#[case::left_before_right(FORK, 0.0, RailAction::Turn(315.0))]
#[case::right_on_request(FORK, 90.0, RailAction::Turn(45.0))]
#[case::left_on_request(FORK, 270.0, RailAction::Turn(315.0))]
#[case::left_shift_before_right_turn(JOG_LEFT, 0.0, RailAction::Shift(IVec3::new(1, -1, 0)))]
#[case::right_turn_on_request(JOG_LEFT, 90.0, RailAction::Turn(45.0))]
#[case::right_turn_when_left_is_bare(JOG_RIGHT, 0.0, RailAction::Turn(45.0))]
#[case::left_request_falls_through_to_right(JOG_RIGHT, 270.0, RailAction::Turn(45.0))]
#[case::straight_before_right_shift(DOUBLE_RIGHT, 0.0, RailAction::None)]
#[case::right_shift_on_request(DOUBLE_RIGHT, 90.0, RailAction::Shift(IVec3::new(1, 1, 0)))]
#[case::left_request_keeps_straight(DOUBLE_RIGHT, 270.0, RailAction::None)]
fn track_layout_picks_the_move(#[case] layout: Layout, #[case] turn_dir: f64, #[case] expected: RailAction) {
    let harness = track(layout);
    let mut cart = moving(rail_cart(5, 8), 1000);
    cart.turn_dir = turn_dir;
    assert!(is_on_rails(&harness.map, &cart));
    assert_eq!(process_movement_on_rails(&harness.map, &cart), expected);
}

#[rstest]
#[case::left_skew(&[(5, 5, 5, 5), (6, 6, 6, 6), (7, 7, 7, 7), (5, 6, 5, 6), (6, 7, 6, 7), (7, 8, 7, 8)], true)]
#[case::right_skew(&[(5, 5, 5, 5), (6, 6, 6, 6), (7, 7, 7, 7), (4, 5, 4, 5), (5, 6, 5, 6), (6, 7, 6, 7)], true)]
#[case::single_line(&[(5, 5, 5, 5), (6, 6, 6, 6), (7, 7, 7, 7)], false)]
fn diagonal_track_fits_either_skew(#[case] layout: Layout, #[case] on_rails: bool) {
    let harness = track(layout);
    let mut cart = moving(rail_cart(5, 5), 1000);
    cart.set_facing(45.0);
    cart.turn_dir = 45.0;
    assert_eq!(is_on_rails(&harness.map, &cart), on_rails);
    if on_rails {
        assert_eq!(process_movement_on_rails(&harness.map, &cart), RailAction::None);
    }
}
