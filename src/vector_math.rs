//! Angle and vector helpers.
//! Headings are measured in degrees clockwise from the positive x axis, with
//! the y axis pointing south, matching the tile grid.
use glam::{DVec2, IVec2};

/// Wrap an angle into `[0, 360)`.
///
/// # Examples
/// ```
/// use trundle::vector_math::normalize_degrees;
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(720.0), 0.0);
/// ```
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Round an angle to the nearest multiple of `step` degrees.
///
/// # Examples
/// ```
/// use trundle::vector_math::round_to_multiple;
/// assert_eq!(round_to_multiple(22.0, 15.0), 15.0);
/// assert_eq!(round_to_multiple(23.0, 15.0), 30.0);
/// ```
#[must_use]
pub fn round_to_multiple(angle: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return angle;
    }
    (angle / step).round() * step
}

/// Whether two headings point the same way.
///
/// # Examples
/// ```
/// use trundle::vector_math::same_heading;
/// assert!(same_heading(-90.0, 270.0));
/// assert!(!same_heading(0.0, 15.0));
/// ```
#[must_use]
pub fn same_heading(a: f64, b: f64) -> bool {
    (normalize_degrees(a) - normalize_degrees(b)).abs() < 1e-9
}

/// Unit vector pointing along `angle` degrees.
///
/// # Examples
/// ```
/// use trundle::vector_math::angle_to_vec;
/// let south = angle_to_vec(90.0);
/// assert!(south.x.abs() < 1e-9);
/// assert!((south.y - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn angle_to_vec(angle: f64) -> DVec2 {
    let radians = angle.to_radians();
    DVec2::new(radians.cos(), radians.sin())
}

/// Heading of a vector in degrees, normalised to `[0, 360)`.
///
/// The zero vector has heading zero.
#[must_use]
pub fn vec_to_angle(vector: DVec2) -> f64 {
    if vector == DVec2::ZERO || !vector.is_finite() {
        return 0.0;
    }
    normalize_degrees(vector.y.atan2(vector.x).to_degrees())
}

/// Rotate a grid offset by `turns` quarter turns clockwise.
///
/// # Examples
/// ```
/// use glam::IVec2;
/// use trundle::vector_math::rotate_quarter_turns;
/// assert_eq!(rotate_quarter_turns(IVec2::new(0, -1), 1), IVec2::new(1, 0));
/// assert_eq!(rotate_quarter_turns(IVec2::new(1, 0), 2), IVec2::new(-1, 0));
/// ```
#[must_use]
pub fn rotate_quarter_turns(offset: IVec2, turns: i32) -> IVec2 {
    match turns.rem_euclid(4) {
        1 => IVec2::new(-offset.y, offset.x),
        2 => IVec2::new(-offset.x, -offset.y),
        3 => IVec2::new(offset.y, -offset.x),
        _ => offset,
    }
}

/// Chebyshev distance between two grid points.
#[must_use]
pub fn square_distance(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// Compass name of the direction from the origin towards `delta`.
///
/// Returns `None` for the zero offset.
///
/// # Examples
/// ```
/// use glam::IVec2;
/// use trundle::vector_math::direction_name;
/// assert_eq!(direction_name(IVec2::new(0, -3)), Some("north"));
/// assert_eq!(direction_name(IVec2::new(4, 5)), Some("southeast"));
/// assert_eq!(direction_name(IVec2::ZERO), None);
/// ```
#[must_use]
pub fn direction_name(delta: IVec2) -> Option<&'static str> {
    const NAMES: [&str; 8] = [
        "east",
        "southeast",
        "south",
        "southwest",
        "west",
        "northwest",
        "north",
        "northeast",
    ];
    if delta == IVec2::ZERO {
        return None;
    }
    let octant = crate::numeric::round_to_i32(vec_to_angle(delta.as_dvec2()) / 45.0).rem_euclid(8);
    usize::try_from(octant).ok().and_then(|i| NAMES.get(i).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::east(DVec2::new(1.0, 0.0), 0.0)]
    #[case::south(DVec2::new(0.0, 2.0), 90.0)]
    #[case::north_west(DVec2::new(-1.0, -1.0), 225.0)]
    fn heading_of_vectors(#[case] vector: DVec2, #[case] expected: f64) {
        assert_relative_eq!(vec_to_angle(vector), expected, epsilon = 1e-9);
    }

    #[test]
    fn rotation_is_clockwise_on_a_south_facing_grid() {
        let north = IVec2::new(0, -1);
        let east = rotate_quarter_turns(north, 1);
        let south = rotate_quarter_turns(east, 1);
        assert_eq!(east, IVec2::new(1, 0));
        assert_eq!(south, IVec2::new(0, 1));
        assert_eq!(rotate_quarter_turns(north, -1), IVec2::new(-1, 0));
    }
}
