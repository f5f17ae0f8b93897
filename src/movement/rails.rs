//! Rail following.
//!
//! A rail-capable vehicle is on rails when it faces a multiple of 45° and the
//! tiles under each of its rail wheel rows carry track for three tiles ahead
//! or behind. While on rails the vehicle picks a heading or a sideways shift
//! from the track layout instead of skidding freely.
//!
//! Diagonal facings cannot map the rail profile onto the grid unambiguously,
//! so both possible skews are tried and either is accepted.

use glam::{IVec2, IVec3};

use crate::constants::RAIL_ANGLE_STEP;
use crate::map::{GameMap, TerrainFlag};
use crate::numeric::round_to_i32;
use crate::tileray::TileRay;
use crate::vector_math::{normalize_degrees, rotate_quarter_turns, same_heading};
use crate::vehicle::Vehicle;

/// Tiles of track checked per rail row.
const SCAN_STEPS: i32 = 3;

/// What the track asks of the vehicle this turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RailAction {
    /// Keep going as planned.
    None,
    /// Turn to this heading.
    Turn(f64),
    /// Sidestep onto a parallel track.
    Shift(IVec3),
}

fn scan_rows(map: &dyn GameMap, veh: &Vehicle, start: IVec3, plus_y: IVec2, scan: IVec2) -> bool {
    veh.rail_profile().into_iter().all(|row| {
        let origin = start + (plus_y * row).extend(0);
        (0..SCAN_STEPS).all(|step| map.has_flag(TerrainFlag::Rail, origin + (scan * step).extend(0)))
    })
}

fn diagonal_rotations(delta: IVec2) -> i32 {
    match (delta.x, delta.y) {
        (1, -1) => 0,
        (1, 1) => 1,
        (-1, 1) => 2,
        _ => 3,
    }
}

/// Scan for track along `dir`, optionally shifted one row sideways.
///
/// Returns the offset from the vehicle position the scan started at.
fn scan_at_shift(
    map: &dyn GameMap,
    veh: &Vehicle,
    velocity_sign: i32,
    dir: f64,
    shift_sign: i32,
) -> Option<IVec3> {
    let mut ray = TileRay::new(dir);
    ray.advance(1);
    let delta = ray.last_delta();
    let scan = delta * velocity_sign;
    if delta.x != 0 && delta.y != 0 {
        let turns = diagonal_rotations(delta);
        let step_left = rotate_quarter_turns(IVec2::new(0, -1), turns);
        let step_right = rotate_quarter_turns(IVec2::new(1, 0), turns);
        let plus_y_left = rotate_quarter_turns(IVec2::new(1, 0), turns);
        let plus_y_right = rotate_quarter_turns(IVec2::new(0, 1), turns);
        let shift = match shift_sign.signum() {
            1 => step_right * velocity_sign,
            -1 => step_left * velocity_sign,
            _ => IVec2::ZERO,
        };
        let start = veh.pos + shift.extend(0);
        (scan_rows(map, veh, start, plus_y_left, scan) || scan_rows(map, veh, start, plus_y_right, scan))
            .then_some(shift.extend(0))
    } else {
        let plus_y = rotate_quarter_turns(delta, 1);
        let shift = if shift_sign == 0 {
            IVec2::ZERO
        } else {
            scan + plus_y * shift_sign
        };
        scan_rows(map, veh, veh.pos + shift.extend(0), plus_y, scan).then_some(shift.extend(0))
    }
}

/// Facing rounded to whole degrees, and that value snapped down to 45°.
fn snapped_facing(veh: &Vehicle) -> (i32, i32) {
    let degrees = round_to_i32(veh.face.dir());
    (degrees, degrees / RAIL_ANGLE_STEP * RAIL_ANGLE_STEP)
}

/// Whether the vehicle runs on track right now.
///
/// # Examples
/// ```
/// use trundle::movement::is_on_rails;
/// use trundle::sandbox::{prefabs, TileMap};
/// use trundle::vehicle::VehicleId;
/// let map = TileMap::new(20, 20);
/// let car = prefabs::car(VehicleId(1), glam::IVec3::new(5, 5, 0)).unwrap();
/// assert!(!is_on_rails(&map, &car));
/// ```
#[must_use]
pub fn is_on_rails(map: &dyn GameMap, veh: &Vehicle) -> bool {
    if !veh.can_use_rails() {
        return false;
    }
    let (degrees, snapped) = snapped_facing(veh);
    if degrees != snapped {
        return false;
    }
    let straight = f64::from(snapped);
    scan_at_shift(map, veh, 1, straight, 0).is_some() || scan_at_shift(map, veh, -1, straight, 0).is_some()
}

/// Decide how the track steers the vehicle this turn.
///
/// A derailed vehicle only gets back on when track lies straight ahead. On
/// track, automatic travel prefers straight, then left, then right; an
/// explicit steering request prefers its own side, then straight, then the
/// other side. Turns are preferred over shifts on each side.
#[must_use]
pub fn process_movement_on_rails(map: &dyn GameMap, veh: &Vehicle) -> RailAction {
    let (degrees, snapped) = snapped_facing(veh);
    let straight = normalize_degrees(f64::from(snapped));
    let left = normalize_degrees(straight - f64::from(RAIL_ANGLE_STEP));
    let right = normalize_degrees(straight + f64::from(RAIL_ANGLE_STEP));
    let vel_sign = if veh.velocity > 0 { 1 } else { -1 };

    let can_straight = scan_at_shift(map, veh, vel_sign, straight, 0).is_some();
    let can_left = scan_at_shift(map, veh, vel_sign, left, 0).is_some();
    let can_right = scan_at_shift(map, veh, vel_sign, right, 0).is_some();
    let can_back = scan_at_shift(map, veh, -vel_sign, straight, 0).is_some();
    let shift_right = scan_at_shift(map, veh, vel_sign, straight, vel_sign);
    let shift_left = scan_at_shift(map, veh, vel_sign, straight, -vel_sign);

    let on_rails = degrees == snapped && (can_straight || can_back);
    if !on_rails {
        return if can_straight {
            RailAction::Turn(straight)
        } else {
            RailAction::None
        };
    }

    let straight_option = can_straight.then_some(RailAction::None);
    let left_options = [
        can_left.then_some(RailAction::Turn(left)),
        shift_left.map(RailAction::Shift),
    ];
    let right_options = [
        can_right.then_some(RailAction::Turn(right)),
        shift_right.map(RailAction::Shift),
    ];
    let preference: Vec<Option<RailAction>> = if same_heading(veh.face.dir(), veh.turn_dir) {
        std::iter::once(straight_option)
            .chain(left_options)
            .chain(right_options)
            .collect()
    } else if normalize_degrees(veh.turn_dir - veh.face.dir()) < 180.0 {
        right_options
            .into_iter()
            .chain(std::iter::once(straight_option))
            .chain(left_options)
            .collect()
    } else {
        left_options
            .into_iter()
            .chain(std::iter::once(straight_option))
            .chain(right_options)
            .collect()
    };
    preference.into_iter().flatten().next().unwrap_or(RailAction::None)
}
