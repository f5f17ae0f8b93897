//! Conversions between the internal velocity unit and SI units.
//!
//! Vehicle speeds are stored as signed integers in hundredths of a mile per
//! hour ("vmiph"). Physics is computed in metres per second and converted back
//! at the boundary. Collision impulses in N·s map linearly onto damage points.

use crate::constants::{DAMAGE_TO_IMPULSE, MI_TO_VMI, MPS_TO_MIPH, VELOCITY_CONSTANT};
use crate::numeric::round_to_i32;

/// Convert metres per second into vmiph, rounding to the nearest unit.
///
/// # Examples
/// ```
/// use trundle::units::mps_to_vmiph;
/// assert_eq!(mps_to_vmiph(1.0), 224);
/// assert_eq!(mps_to_vmiph(-10.0), -2237);
/// ```
#[must_use]
pub fn mps_to_vmiph(mps: f64) -> i32 {
    round_to_i32(mps * MPS_TO_MIPH * MI_TO_VMI)
}

/// Convert vmiph into metres per second.
///
/// # Examples
/// ```
/// use trundle::units::vmiph_to_mps;
/// assert!((vmiph_to_mps(4000) - 17.8816).abs() < 1e-9);
/// ```
#[must_use]
pub fn vmiph_to_mps(vmiph: i32) -> f64 {
    f64::from(vmiph) * VELOCITY_CONSTANT
}

/// Convert centimetres per second into vmiph.
///
/// One cm/s is 0.0223694 mph, which is 2.23694 vmiph.
#[must_use]
pub fn cmps_to_vmiph(cmps: i32) -> i32 {
    round_to_i32(f64::from(cmps) * MPS_TO_MIPH)
}

/// Convert vmiph into centimetres per second.
#[must_use]
pub fn vmiph_to_cmps(vmiph: i32) -> i32 {
    round_to_i32(f64::from(vmiph) / MPS_TO_MIPH)
}

/// Convert a collision impulse in N·s into damage points.
///
/// # Examples
/// ```
/// use trundle::units::{damage_to_impulse, impulse_to_damage};
/// assert_eq!(impulse_to_damage(120.0), 12.0);
/// assert_eq!(damage_to_impulse(impulse_to_damage(37.5)), 37.5);
/// ```
#[must_use]
pub fn impulse_to_damage(impulse: f64) -> f64 {
    impulse / DAMAGE_TO_IMPULSE
}

/// Convert damage points back into the impulse that would cause them.
#[must_use]
pub fn damage_to_impulse(damage: f64) -> f64 {
    damage * DAMAGE_TO_IMPULSE
}
