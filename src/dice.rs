//! Random rolls used by the movement systems.
//!
//! All helpers take `&mut dyn RngCore` so callers can hand in any generator.
//! The sandbox and tests use a seeded [`rand_chacha::ChaCha8Rng`] for
//! reproducible runs.

use rand::{Rng, RngCore};

/// Uniform integer in the inclusive range between `lo` and `hi`.
///
/// The bounds may be given in either order.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use trundle::dice::rng;
/// let mut source = ChaCha8Rng::seed_from_u64(7);
/// let roll = rng(&mut source, 1, 6);
/// assert!((1..=6).contains(&roll));
/// assert_eq!(rng(&mut source, 3, 3), 3);
/// ```
pub fn rng(source: &mut dyn RngCore, lo: i32, hi: i32) -> i32 {
    let (low, high) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    source.gen_range(low..=high)
}

/// Uniform float in the half-open range between `lo` and `hi`.
pub fn rng_float(source: &mut dyn RngCore, lo: f64, hi: f64) -> f64 {
    let (low, high) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if (high - low).abs() < f64::EPSILON {
        return low;
    }
    source.gen_range(low..high)
}

/// `true` with probability `1 / chance`; a chance of 0 or 1 always succeeds.
pub fn one_in(source: &mut dyn RngCore, chance: u32) -> bool {
    chance <= 1 || source.gen_range(0..chance) == 0
}

/// Sum of `count` rolls of a `sides`-sided die.
pub fn dice(source: &mut dyn RngCore, count: u32, sides: i32) -> i32 {
    if sides < 1 {
        return 0;
    }
    (0..count).map(|_| source.gen_range(1..=sides)).sum()
}

/// Round `value` down or up at random, weighted by its fractional part.
///
/// `roll_remainder(2.25)` yields 3 a quarter of the time and 2 otherwise.
pub fn roll_remainder(source: &mut dyn RngCore, value: f64) -> u32 {
    if !(value.is_finite() && value > 0.0) {
        return 0;
    }
    let whole = value.trunc();
    let extra = u32::from(source.gen_bool((value - whole).clamp(0.0, 1.0)));
    crate::numeric::trunc_to_u32(whole) + extra
}

/// Random sign, `1` or `-1` with equal odds.
pub fn random_sign(source: &mut dyn RngCore) -> i32 {
    if one_in(source, 2) {
        1
    } else {
        -1
    }
}
