//! Discrete stepping along a heading on the tile grid.
//!
//! A [`TileRay`] walks tiles along an arbitrary angle using an integer
//! Bresenham-style accumulator. The accumulator persists between calls to
//! [`TileRay::advance`], so repeatedly stepping a 30° ray alternates between
//! straight and diagonal moves rather than always rounding the same way.
//!
//! Headings follow the grid convention: 0° is east and 90° is south.
//!
//! ```text
//!        | 270          orthogonal left (-)
//!  180   |     0          ^
//!    ----+----> X    -------> forward
//!        |                v
//!        v 90         orthogonal right (+)
//!        Y
//! ```

use glam::IVec2;

use crate::numeric::round_to_i32;
use crate::vector_math::{angle_to_vec, normalize_degrees, vec_to_angle};

/// Ray cast from the origin along a heading.
#[derive(Clone, Debug, PartialEq)]
pub struct TileRay {
    direction: f64,
    delta: IVec2,
    abs_delta: IVec2,
    leftover: i32,
    last: IVec2,
    steps: i32,
}

impl Default for TileRay {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl TileRay {
    /// Create a ray pointing along `direction` degrees.
    ///
    /// # Examples
    /// ```
    /// use trundle::tileray::TileRay;
    /// let mut ray = TileRay::new(90.0);
    /// ray.advance(1);
    /// assert_eq!((ray.dx(), ray.dy()), (0, 1));
    /// ```
    #[must_use]
    pub fn new(direction: f64) -> Self {
        let mut ray = Self {
            direction: 0.0,
            delta: IVec2::ZERO,
            abs_delta: IVec2::ZERO,
            leftover: 0,
            last: IVec2::ZERO,
            steps: 0,
        };
        ray.init(direction);
        ray
    }

    /// Create a ray through the grid offset `delta`.
    #[must_use]
    pub fn from_delta(delta: IVec2) -> Self {
        Self {
            direction: vec_to_angle(delta.as_dvec2()),
            delta,
            abs_delta: delta.abs(),
            leftover: 0,
            last: IVec2::ZERO,
            steps: 0,
        }
    }

    /// Reset the ray to point along `direction` degrees.
    pub fn init(&mut self, direction: f64) {
        self.direction = normalize_degrees(direction);
        let unit = angle_to_vec(self.direction) * 100.0;
        self.delta = IVec2::new(round_to_i32(unit.x), round_to_i32(unit.y));
        self.abs_delta = self.delta.abs();
        self.leftover = 0;
        self.last = IVec2::ZERO;
        self.steps = 0;
    }

    /// Heading of the ray in degrees, within `[0, 360)`.
    #[must_use]
    pub const fn dir(&self) -> f64 {
        self.direction
    }

    /// X offset produced by the last call to [`Self::advance`].
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.last.x
    }

    /// Y offset produced by the last call to [`Self::advance`].
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.last.y
    }

    /// Offset produced by the last call to [`Self::advance`].
    #[must_use]
    pub const fn last_delta(&self) -> IVec2 {
        self.last
    }

    /// Number of tiles covered by the last advance.
    #[must_use]
    pub const fn steps(&self) -> i32 {
        self.steps
    }

    /// Whether the ray travels further along y than along x.
    #[must_use]
    pub const fn mostly_vertical(&self) -> bool {
        self.abs_delta.x <= self.abs_delta.y
    }

    /// Advance `num` tiles along the ray; negative values walk backwards.
    ///
    /// The major axis moves exactly `|num|` tiles while the minor axis moves
    /// whenever the accumulated remainder crosses a full tile.
    pub fn advance(&mut self, num: i32) {
        self.last = IVec2::ZERO;
        self.steps = num.abs();
        if num == 0 {
            return;
        }
        let vertical = self.mostly_vertical();
        let (major, minor) = if vertical {
            (self.abs_delta.y, self.abs_delta.x)
        } else {
            (self.abs_delta.x, self.abs_delta.y)
        };
        let mut minor_steps = 0;
        for _ in 0..self.steps {
            self.leftover += minor;
            if major > 0 && self.leftover >= major {
                minor_steps += 1;
                self.leftover -= major;
            }
        }
        let mut moved = if vertical {
            IVec2::new(minor_steps, self.steps)
        } else {
            IVec2::new(self.steps, minor_steps)
        };
        moved *= self.delta.signum();
        if num < 0 {
            moved = -moved;
        }
        self.last = moved;
    }

    /// X offset of a point `od` tiles to the right of the ray.
    #[must_use]
    pub fn ortho_dx(&self, od: i32) -> i32 {
        self.ortho(od).x
    }

    /// Y offset of a point `od` tiles to the right of the ray.
    #[must_use]
    pub fn ortho_dy(&self, od: i32) -> i32 {
        self.ortho(od).y
    }

    fn ortho(&self, od: i32) -> IVec2 {
        let mut side = Self::new(self.direction + 90.0);
        side.advance(od);
        side.last
    }
}

/// Map a vehicle mount offset onto a grid offset for a heading.
///
/// The mount's x axis runs forward along `direction` and its y axis runs to the
/// right, both measured relative to `pivot`.
///
/// # Examples
/// ```
/// use glam::IVec2;
/// use trundle::tileray::coord_translate;
/// // Facing south, a part one tile ahead sits one tile further south.
/// assert_eq!(coord_translate(90.0, IVec2::ZERO, IVec2::new(1, 0)), IVec2::new(0, 1));
/// // Facing south, the right-hand side is west.
/// assert_eq!(coord_translate(90.0, IVec2::ZERO, IVec2::new(0, 1)), IVec2::new(-1, 0));
/// ```
#[must_use]
pub fn coord_translate(direction: f64, pivot: IVec2, mount: IVec2) -> IVec2 {
    let mut ray = TileRay::new(direction);
    ray.advance(mount.x - pivot.x);
    let side = mount.y - pivot.y;
    IVec2::new(ray.dx() + ray.ortho_dx(side), ray.dy() + ray.ortho_dy(side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::east(0.0, IVec2::new(1, 0))]
    #[case::south_east(45.0, IVec2::new(1, 1))]
    #[case::south(90.0, IVec2::new(0, 1))]
    #[case::west(180.0, IVec2::new(-1, 0))]
    #[case::north_west(225.0, IVec2::new(-1, -1))]
    #[case::north(270.0, IVec2::new(0, -1))]
    fn single_step(#[case] direction: f64, #[case] expected: IVec2) {
        let mut ray = TileRay::new(direction);
        ray.advance(1);
        assert_eq!(ray.last_delta(), expected);
    }

    #[test]
    fn shallow_rays_alternate_minor_axis_steps() {
        let mut ray = TileRay::new(30.0);
        let mut total = IVec2::ZERO;
        for _ in 0..6 {
            ray.advance(1);
            assert_eq!(ray.dx(), 1);
            total += ray.last_delta();
        }
        assert_eq!(total, IVec2::new(6, 3));
    }

    #[test]
    fn negative_advance_walks_backwards() {
        let mut ray = TileRay::new(0.0);
        ray.advance(-2);
        assert_eq!(ray.last_delta(), IVec2::new(-2, 0));
        assert_eq!(ray.steps(), 2);
    }

    #[test]
    fn translation_preserves_mounts_when_facing_east() {
        let mount = IVec2::new(-2, 1);
        assert_eq!(coord_translate(0.0, IVec2::ZERO, mount), mount);
    }
}
